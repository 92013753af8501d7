//! Clipboard module
//!
//! Narrow write-only access to the system clipboard, so the presenter can be
//! exercised without a desktop session.

use cli_clipboard::{ClipboardContext, ClipboardProvider};

use crate::shared::error::{AppError, AppResult};

pub trait ClipboardWriter: Send + Sync {
    fn write_text(&self, text: &str) -> AppResult<()>;
}

/// System-level clipboard via `cli-clipboard`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn write_text(&self, text: &str) -> AppResult<()> {
        ClipboardContext::new()
            .and_then(|mut ctx| ctx.set_contents(text.to_string()))
            .map_err(|e| AppError::Clipboard(format!("Failed to write to clipboard: {}", e)))
    }
}
