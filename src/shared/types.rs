//! Wire payloads exchanged with the translation backend.
//!
//! Field names follow the backend's camelCase JSON.

use serde::{Deserialize, Serialize};

pub const TRANSLATE_PATH: &str = "/api/translate";
pub const UPLOAD_TRANSLATE_PATH: &str = "/api/upload-translate";

/// Multipart part name the upload endpoint reads the document from
pub const UPLOAD_PART_NAME: &str = "file";

/// Body of `POST /api/translate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateTextBody {
    pub text: String,
}

/// Response of `POST /api/translate`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateTextResponse {
    #[serde(default)]
    pub success: bool,
    pub translated_text: Option<String>,
    pub error: Option<String>,
}

/// Response of `POST /api/upload-translate`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTranslateResponse {
    #[serde(default)]
    pub success: bool,
    pub translated_content: Option<String>,
    pub original_file_name: Option<String>,
    pub error: Option<String>,
}

/// Error-only view of a body, used for non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}

/// Both endpoints normalised to one shape
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BackendReply {
    pub success: bool,
    pub translated: Option<String>,
    pub original_file_name: Option<String>,
    pub error: Option<String>,
}

impl From<TranslateTextResponse> for BackendReply {
    fn from(raw: TranslateTextResponse) -> Self {
        Self {
            success: raw.success,
            translated: raw.translated_text,
            original_file_name: None,
            error: raw.error,
        }
    }
}

impl From<UploadTranslateResponse> for BackendReply {
    fn from(raw: UploadTranslateResponse) -> Self {
        Self {
            success: raw.success,
            translated: raw.translated_content,
            original_file_name: raw.original_file_name,
            error: raw.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_response_camel_case() {
        let raw: TranslateTextResponse =
            serde_json::from_str(r#"{"success":true,"translatedText":"ಹಲೋ"}"#).unwrap();
        let reply = BackendReply::from(raw);
        assert!(reply.success);
        assert_eq!(reply.translated.as_deref(), Some("ಹಲೋ"));
        assert!(reply.error.is_none());
    }

    #[test]
    fn test_upload_response_keeps_file_name() {
        let raw: UploadTranslateResponse = serde_json::from_str(
            r#"{"success":true,"translatedContent":"ಪಠ್ಯ","originalFileName":"notes.txt"}"#,
        )
        .unwrap();
        let reply = BackendReply::from(raw);
        assert_eq!(reply.translated.as_deref(), Some("ಪಠ್ಯ"));
        assert_eq!(reply.original_file_name.as_deref(), Some("notes.txt"));
    }

    #[test]
    fn test_missing_success_defaults_false() {
        let raw: TranslateTextResponse = serde_json::from_str(r#"{"error":"boom"}"#).unwrap();
        assert!(!raw.success);
        assert_eq!(raw.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_text_body_shape() {
        let body = TranslateTextBody { text: "Hello".to_string() };
        assert_eq!(serde_json::to_value(&body).unwrap(), serde_json::json!({ "text": "Hello" }));
    }
}
