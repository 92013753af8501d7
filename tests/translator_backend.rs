//! Orchestrators driven against a mock translation backend

use mockito::Matcher;
use serde_json::json;
use translator_orchestrator::core::features::translator::{
    FileSelection, OrchestratorState, SubmitOutcome, TranslationResult, ValidationError,
};
use translator_orchestrator::shared::settings::{ApiSettings, AppSettings};
use translator_orchestrator::TranslatorApp;

fn app_for(base_url: String) -> TranslatorApp {
    let settings = AppSettings {
        api: ApiSettings {
            base_url,
            ..ApiSettings::default()
        },
        ..AppSettings::default()
    };
    TranslatorApp::new(settings).unwrap()
}

fn failed(message: &str) -> SubmitOutcome {
    SubmitOutcome::Completed(OrchestratorState::Failed(message.to_string()))
}

#[tokio::test]
async fn test_text_translation_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/translate")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({ "text": "Hello" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"translatedText":"ಹಲೋ"}"#)
        .expect(1)
        .create_async()
        .await;

    let app = app_for(server.url());
    app.text.set_text("Hello");
    let outcome = app.text.submit().await;

    mock.assert_async().await;
    assert_eq!(
        outcome,
        SubmitOutcome::Completed(OrchestratorState::Succeeded(TranslationResult {
            translated_text: "ಹಲೋ".to_string(),
            source_file_name: None,
        }))
    );
    assert_eq!(app.text.presenter().unwrap().translated_text(), "ಹಲೋ");
    assert!(app.text.success_pulse());
}

#[tokio::test]
async fn test_empty_text_never_reaches_backend() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/translate")
        .expect(0)
        .create_async()
        .await;

    let app = app_for(server.url());
    app.text.set_text("");
    let outcome = app.text.submit().await;

    mock.assert_async().await;
    assert_eq!(outcome, SubmitOutcome::Rejected(ValidationError::EmptyInput));
    assert_eq!(app.text.state(), OrchestratorState::Idle);
}

#[tokio::test]
async fn test_file_upload_sends_single_file_part() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/upload-translate")
        .match_header("content-type", Matcher::Regex("^multipart/form-data".to_string()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="notes.txt""#.to_string()),
            Matcher::Regex("good morning".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"translatedContent":"ಶುಭೋದಯ","originalFileName":"notes.txt"}"#)
        .expect(1)
        .create_async()
        .await;

    let app = app_for(server.url());
    app.file
        .select_file(FileSelection::new("notes.txt", b"good morning".to_vec()))
        .unwrap();
    let outcome = app.file.submit().await;

    mock.assert_async().await;
    assert_eq!(
        outcome,
        SubmitOutcome::Completed(OrchestratorState::Succeeded(TranslationResult {
            translated_text: "ಶುಭೋದಯ".to_string(),
            source_file_name: Some("notes.txt".to_string()),
        }))
    );
}

#[tokio::test]
async fn test_file_backend_error_surfaced() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/upload-translate")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":false,"error":"corrupt file"}"#)
        .create_async()
        .await;

    let app = app_for(server.url());
    app.file
        .select_file(FileSelection::new("notes.txt", vec![b'a'; 50]))
        .unwrap();

    assert_eq!(app.file.submit().await, failed("corrupt file"));
    assert_eq!(app.file.error_message().as_deref(), Some("corrupt file"));
}

#[tokio::test]
async fn test_error_status_prefers_body_message() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/translate")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"Translation service unavailable"}"#)
        .create_async()
        .await;

    let app = app_for(server.url());
    app.text.set_text("Hello");

    assert_eq!(app.text.submit().await, failed("Translation service unavailable"));
}

#[tokio::test]
async fn test_error_status_without_body_uses_fallback() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/upload-translate")
        .with_status(502)
        .create_async()
        .await;

    let app = app_for(server.url());
    app.file
        .select_file(FileSelection::new("scan.pdf", vec![1, 2, 3]))
        .unwrap();

    assert_eq!(
        app.file.submit().await,
        failed("Failed to translate file. Please try again.")
    );
}

#[tokio::test]
async fn test_unreadable_body_is_transport_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/translate")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let app = app_for(server.url());
    app.text.set_text("Hello");

    assert_eq!(app.text.submit().await, failed("Failed to translate. Please try again."));
}

#[tokio::test]
async fn test_connection_refused_then_clear() {
    // Nothing listens on port 1
    let app = app_for("http://127.0.0.1:1".to_string());
    app.text.set_text("Hello");

    assert_eq!(app.text.submit().await, failed("Failed to translate. Please try again."));

    app.text.clear();
    assert_eq!(app.text.state(), OrchestratorState::Idle);
    assert!(app.text.error_message().is_none());
}

#[tokio::test]
async fn test_orchestrators_do_not_share_state() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/translate")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"translatedText":"ಹಲೋ"}"#)
        .create_async()
        .await;

    let app = app_for(server.url());
    app.text.set_text("Hello");
    app.text.submit().await;

    assert!(app.text.result().is_some());
    assert_eq!(app.file.state(), OrchestratorState::Idle);
    assert!(app.file.result().is_none());
}
