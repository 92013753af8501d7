use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::shared::error::{AppError, AppResult};

/// Largest upload accepted client-side (10 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Lowercase, without the leading dot
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["txt", "pdf", "docx", "doc"];

/// Used when the backend declines without saying why
pub const BACKEND_FALLBACK_MESSAGE: &str = "Translation failed";

pub type TranslatorResult<T> = Result<T, AppError>;

/// Which of the two orchestrators an instance is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestratorKind {
    Text,
    File,
}

impl OrchestratorKind {
    /// Message shown when no usable response came back
    pub fn transport_fallback(&self) -> &'static str {
        match self {
            OrchestratorKind::Text => "Failed to translate. Please try again.",
            OrchestratorKind::File => "Failed to translate file. Please try again.",
        }
    }
}

/// A file handed over by the host's file picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FileSelection {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> AppResult<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::Validation(format!("Not a file path: {}", path.display())))?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self { file_name, bytes })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Raw input for one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationRequest {
    Text {
        source_text: String,
    },
    File {
        file_handle: Vec<u8>,
        file_name: String,
        file_size_bytes: u64,
        file_extension: String,
    },
}

impl TranslationRequest {
    pub fn text(source_text: impl Into<String>) -> Self {
        TranslationRequest::Text {
            source_text: source_text.into(),
        }
    }

    pub fn file(selection: FileSelection) -> Self {
        let file_extension = extension_of(&selection.file_name);
        let file_size_bytes = selection.size();
        TranslationRequest::File {
            file_handle: selection.bytes,
            file_name: selection.file_name,
            file_size_bytes,
            file_extension,
        }
    }
}

/// Text after the last `.`, lowercased; empty when there is no dot
pub fn extension_of(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Input that passed validation; only the validator constructs it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInput(pub(super) TranslationRequest);

impl ValidatedInput {
    pub fn request(&self) -> &TranslationRequest {
        &self.0
    }

    pub fn into_request(self) -> TranslationRequest {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter some text to translate")]
    EmptyInput,

    #[error("Please select a file to translate")]
    NoFileSelected,

    #[error("Invalid file type. Please upload .txt, .pdf, or .docx files.")]
    UnsupportedType,

    #[error("File size exceeds 10MB limit.")]
    FileTooLarge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationResult {
    pub translated_text: String,
    pub source_file_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum OrchestratorState {
    Idle,
    Validating,
    InFlight,
    Succeeded(TranslationResult),
    Failed(String),
}

impl OrchestratorState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, OrchestratorState::InFlight)
    }

    pub fn result(&self) -> Option<&TranslationResult> {
        match self {
            OrchestratorState::Succeeded(result) => Some(result),
            _ => None,
        }
    }
}

/// No usable response: connection fault, non-2xx, unreadable body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport failure: {detail}")]
pub struct TransportError {
    pub detail: String,
    /// `error` field of a non-2xx body, when one was sent
    pub server_message: Option<String>,
}

impl TransportError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            server_message: None,
        }
    }

    pub fn with_server_message(mut self, message: Option<String>) -> Self {
        self.server_message = message.filter(|m| !m.trim().is_empty());
        self
    }
}

/// Why a submission ended in `Failed`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationFailure {
    #[error("backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl TranslationFailure {
    /// The single line the presentation layer sees
    pub fn user_message(&self, kind: OrchestratorKind) -> String {
        match self {
            TranslationFailure::Backend(message) => message.clone(),
            TranslationFailure::Transport(err) => err
                .server_message
                .clone()
                .unwrap_or_else(|| kind.transport_fallback().to_string()),
        }
    }
}

/// What a call to `submit()` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent
    Rejected(ValidationError),
    /// A request was already in flight; nothing was sent
    Busy,
    /// The response was applied; carries the resulting state
    Completed(OrchestratorState),
    /// The response arrived after `clear()` or a newer submit and was dropped
    Discarded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_after_last_dot() {
        assert_eq!(extension_of("archive.tar.PDF"), "pdf");
        assert_eq!(extension_of("notes.txt"), "txt");
        assert_eq!(extension_of("README"), "");
        assert_eq!(extension_of("pdf"), "");
        assert_eq!(extension_of("trailing."), "");
    }

    #[test]
    fn test_file_request_derives_size_and_extension() {
        let req = TranslationRequest::file(FileSelection::new("Report.DOCX", vec![0u8; 42]));
        match req {
            TranslationRequest::File { file_size_bytes, file_extension, file_name, .. } => {
                assert_eq!(file_size_bytes, 42);
                assert_eq!(file_extension, "docx");
                assert_eq!(file_name, "Report.DOCX");
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_transport_message_prefers_server_error() {
        let failure = TranslationFailure::from(
            TransportError::new("500 Internal Server Error")
                .with_server_message(Some("model offline".to_string())),
        );
        assert_eq!(failure.user_message(OrchestratorKind::Text), "model offline");
    }

    #[test]
    fn test_transport_message_falls_back_per_kind() {
        let failure = TranslationFailure::from(TransportError::new("connection refused"));
        assert_eq!(
            failure.user_message(OrchestratorKind::File),
            "Failed to translate file. Please try again."
        );
        let blank = TransportError::new("x").with_server_message(Some("  ".to_string()));
        assert!(blank.server_message.is_none());
    }

    #[test]
    fn test_state_serializes_tagged() {
        let state = OrchestratorState::Failed("corrupt file".to_string());
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["detail"], "corrupt file");
    }

    #[tokio::test]
    async fn test_file_selection_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello there").unwrap();

        let selection = FileSelection::from_path(&path).await.unwrap();
        assert_eq!(selection.file_name, "notes.txt");
        assert_eq!(selection.size(), 11);
    }
}
