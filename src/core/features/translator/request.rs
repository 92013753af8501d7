//! Request builder
//!
//! Turns validated input into the payload for the matching endpoint. The file
//! body is sent as-is; nothing is encoded or compressed here.

use crate::shared::types::{TranslateTextBody, TRANSLATE_PATH, UPLOAD_TRANSLATE_PATH};

use super::types::{TranslationRequest, ValidatedInput};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireRequest {
    /// JSON body posted to `/api/translate`
    Json(TranslateTextBody),
    /// Single multipart part named `file`, posted to `/api/upload-translate`
    Multipart { file_name: String, bytes: Vec<u8> },
}

impl WireRequest {
    pub fn path(&self) -> &'static str {
        match self {
            WireRequest::Json(_) => TRANSLATE_PATH,
            WireRequest::Multipart { .. } => UPLOAD_TRANSLATE_PATH,
        }
    }
}

pub fn build(input: ValidatedInput) -> WireRequest {
    match input.into_request() {
        TranslationRequest::Text { source_text } => {
            WireRequest::Json(TranslateTextBody { text: source_text })
        }
        TranslationRequest::File {
            file_handle,
            file_name,
            ..
        } => WireRequest::Multipart {
            file_name,
            bytes: file_handle,
        },
    }
}
