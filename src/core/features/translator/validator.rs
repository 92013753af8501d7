//! Input validation
//!
//! Runs before any network call. Text must be non-blank; files must carry an
//! allowed extension and fit the upload limit. Extension is checked first and
//! only the first failure is reported.

use super::types::{
    TranslationRequest, ValidatedInput, ValidationError, ALLOWED_EXTENSIONS, MAX_UPLOAD_BYTES,
};

pub fn validate(input: TranslationRequest) -> Result<ValidatedInput, ValidationError> {
    match &input {
        TranslationRequest::Text { source_text } => validate_text(source_text)?,
        TranslationRequest::File {
            file_extension,
            file_size_bytes,
            ..
        } => validate_file(file_extension, *file_size_bytes)?,
    }
    Ok(ValidatedInput(input))
}

pub fn validate_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    Ok(())
}

/// `extension` is expected without the dot; case does not matter
pub fn validate_file(extension: &str, size_bytes: u64) -> Result<(), ValidationError> {
    let extension = extension.to_ascii_lowercase();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ValidationError::UnsupportedType);
    }
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(ValidationError::FileTooLarge);
    }
    Ok(())
}
