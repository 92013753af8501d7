use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, warn};

use crate::shared::error::AppError;
use crate::shared::settings::ApiSettings;
use crate::shared::types::{
    BackendReply, ErrorBody, TranslateTextResponse, UploadTranslateResponse, UPLOAD_PART_NAME,
};

use super::request::WireRequest;
use super::types::{TransportError, TranslatorResult};

/// The network boundary an orchestrator talks to
///
/// `Ok` means a 2xx with a readable body, whatever its `success` flag says.
/// Everything else is a `TransportError`.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    async fn send(&self, request: WireRequest) -> Result<BackendReply, TransportError>;
}

pub struct TranslatorService {
    http: Client,
    base_url: String,
}

impl TranslatorService {
    pub fn new(settings: &ApiSettings) -> TranslatorResult<Self> {
        let mut builder = Client::builder().user_agent(settings.user_agent.as_str());
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| AppError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TranslationBackend for TranslatorService {
    async fn send(&self, request: WireRequest) -> Result<BackendReply, TransportError> {
        let url = format!("{}{}", self.base_url, request.path());
        let is_upload = matches!(request, WireRequest::Multipart { .. });

        let builder = match request {
            WireRequest::Json(body) => {
                debug!(%url, bytes = body.text.len(), "POST text translation");
                self.http.post(&url).json(&body)
            }
            WireRequest::Multipart { file_name, bytes } => {
                debug!(%url, %file_name, size = bytes.len(), "POST file translation");
                let part = Part::bytes(bytes).file_name(file_name);
                self.http
                    .post(&url)
                    .multipart(Form::new().part(UPLOAD_PART_NAME, part))
            }
        };

        let response = builder.send().await.map_err(|e| {
            warn!("Translation request failed: {}", e);
            TransportError::new(e.to_string())
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!("Failed to read translation response: {}", e);
            TransportError::new(e.to_string())
        })?;

        if !status.is_success() {
            warn!(%status, "Translation API returned error status");
            let server_message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error);
            return Err(TransportError::new(format!("HTTP {}", status))
                .with_server_message(server_message));
        }

        let reply = if is_upload {
            serde_json::from_str::<UploadTranslateResponse>(&body).map(BackendReply::from)
        } else {
            serde_json::from_str::<TranslateTextResponse>(&body).map(BackendReply::from)
        };

        reply.map_err(|e| {
            warn!("Failed to parse translation response: {}", e);
            TransportError::new(format!("Unreadable response body: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let settings = ApiSettings {
            base_url: "http://translate.local/".to_string(),
            ..ApiSettings::default()
        };
        let service = TranslatorService::new(&settings).unwrap();
        assert_eq!(service.base_url(), "http://translate.local");
    }
}
