//! Result presenter
//!
//! Side effects over the last successful translation. Nothing here touches
//! orchestrator state.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::core::clipboard::ClipboardWriter;
use crate::shared::error::{AppError, AppResult};

use super::types::TranslationResult;

/// Give up finding a free export name after this many suffixes
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// What the user is told after a copy attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyAck {
    Copied,
    /// The platform refused; reported softly, never as a failure state
    Unavailable,
}

impl CopyAck {
    pub fn message(&self) -> &'static str {
        match self {
            CopyAck::Copied => "Translation copied to clipboard!",
            CopyAck::Unavailable => "Could not access the clipboard.",
        }
    }
}

/// A plain-text download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub contents: String,
}

impl ExportArtifact {
    /// Write into `dir` without overwriting anything
    ///
    /// If the timestamped name is taken, `-1`, `-2`, ... is appended to the stem.
    pub async fn write_to(&self, dir: &Path) -> AppResult<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;

        let (stem, ext) = match self.file_name.rsplit_once('.') {
            Some((stem, ext)) => (stem, format!(".{}", ext)),
            None => (self.file_name.as_str(), String::new()),
        };

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                self.file_name.clone()
            } else {
                format!("{}-{}{}", stem, attempt, ext)
            };
            let path = dir.join(&name);

            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            file.write_all(self.contents.as_bytes()).await?;
            file.flush().await?;

            info!(path = %path.display(), "Exported translation");
            return Ok(path);
        }

        Err(AppError::Io(format!(
            "No free export name for {} in {}",
            self.file_name,
            dir.display()
        )))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPresenter {
    result: TranslationResult,
}

impl ResultPresenter {
    pub fn new(result: TranslationResult) -> Self {
        Self { result }
    }

    pub fn result(&self) -> &TranslationResult {
        &self.result
    }

    pub fn translated_text(&self) -> &str {
        &self.result.translated_text
    }

    pub fn copy_to_clipboard(&self, clipboard: &dyn ClipboardWriter) -> CopyAck {
        match clipboard.write_text(&self.result.translated_text) {
            Ok(()) => CopyAck::Copied,
            Err(e) => {
                warn!("Clipboard write refused: {}", e);
                CopyAck::Unavailable
            }
        }
    }

    /// `translated_<unix millis>.txt`, body is the translation verbatim
    pub fn export_as_file(&self) -> ExportArtifact {
        ExportArtifact {
            file_name: format!("translated_{}.txt", Utc::now().timestamp_millis()),
            contents: self.result.translated_text.clone(),
        }
    }
}
