//! English to Kannada translator client
//!
//! Two independent orchestrators, one for raw text and one for uploaded
//! documents, each validating input, talking to the translation backend and
//! tracking the request lifecycle for whatever renders it.

pub mod core;
pub mod shared;

use std::sync::Arc;

use tracing::info;

use crate::core::features::translator::{
    FileOrchestrator, TextOrchestrator, TranslationBackend, TranslatorService,
};
use crate::shared::error::AppResult;
use crate::shared::settings::AppSettings;

/// Both orchestrators mounted side by side
///
/// They share the HTTP client and nothing else.
pub struct TranslatorApp {
    pub settings: AppSettings,
    pub text: TextOrchestrator,
    pub file: FileOrchestrator,
}

impl TranslatorApp {
    pub fn new(settings: AppSettings) -> AppResult<Self> {
        let service = TranslatorService::new(&settings.api)?;
        info!(base_url = %service.base_url(), "Translator backend configured");
        Ok(Self::with_backend(settings, Arc::new(service)))
    }

    pub fn with_backend(settings: AppSettings, backend: Arc<dyn TranslationBackend>) -> Self {
        Self {
            text: TextOrchestrator::from_settings(Arc::clone(&backend), &settings),
            file: FileOrchestrator::from_settings(backend, &settings),
            settings,
        }
    }
}
