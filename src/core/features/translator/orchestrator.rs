//! Request lifecycle manager
//!
//! One orchestrator owns one interaction with the backend:
//! `Idle -> Validating -> InFlight -> Succeeded | Failed`, back to `Idle` on
//! `clear()`, or into `InFlight` again on the next `submit()`.
//!
//! The handle is cheap to clone. State lives behind a mutex that is never held
//! across an await, so `clear()` and `snapshot()` keep working while a request
//! is outstanding. Every submit mints a generation token; a response is only
//! applied if its token is still current, which makes responses that land
//! after `clear()` (or after a newer submit) inert.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use unicode_segmentation::UnicodeSegmentation;

use crate::shared::emit::{emit_event, EventBus};
use crate::shared::events::AppEvent;
use crate::shared::settings::AppSettings;
use crate::shared::types::BackendReply;

use super::presenter::ResultPresenter;
use super::request;
use super::service::TranslationBackend;
use super::types::{
    FileSelection, OrchestratorKind, OrchestratorState, SubmitOutcome, TransportError,
    TranslationFailure, TranslationRequest, TranslationResult, ValidationError,
    BACKEND_FALLBACK_MESSAGE,
};
use super::validator;

const DEFAULT_SUCCESS_PULSE: Duration = Duration::from_millis(3000);

/// The input an orchestrator collects before submitting
pub trait Draft: Default + Send + 'static {
    const KIND: OrchestratorKind;

    fn to_request(&self) -> Result<TranslationRequest, ValidationError>;

    /// Whether the submit trigger should be offered, ignoring `loading`
    fn is_ready(&self) -> bool;

    fn input_chars(&self) -> usize;

    fn selected_file(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextDraft {
    text: String,
}

impl Draft for TextDraft {
    const KIND: OrchestratorKind = OrchestratorKind::Text;

    fn to_request(&self) -> Result<TranslationRequest, ValidationError> {
        Ok(TranslationRequest::text(self.text.clone()))
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn input_chars(&self) -> usize {
        self.text.graphemes(true).count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FileDraft {
    selection: Option<FileSelection>,
}

impl Draft for FileDraft {
    const KIND: OrchestratorKind = OrchestratorKind::File;

    fn to_request(&self) -> Result<TranslationRequest, ValidationError> {
        self.selection
            .clone()
            .map(TranslationRequest::file)
            .ok_or(ValidationError::NoFileSelected)
    }

    fn is_ready(&self) -> bool {
        self.selection.is_some()
    }

    fn input_chars(&self) -> usize {
        0
    }

    fn selected_file(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.file_name.as_str())
    }
}

pub type TextOrchestrator = Orchestrator<TextDraft>;
pub type FileOrchestrator = Orchestrator<FileDraft>;

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationSnapshot {
    pub kind: OrchestratorKind,
    pub state: OrchestratorState,
    pub error: Option<String>,
    pub result: Option<TranslationResult>,
    pub loading: bool,
    pub submit_enabled: bool,
    pub success_pulse: bool,
    pub input_chars: usize,
    pub output_chars: usize,
    pub selected_file: Option<String>,
}

struct Inner<D> {
    state: OrchestratorState,
    validation_error: Option<ValidationError>,
    draft: D,
    generation: u64,
    pulse_active: bool,
    pulse_task: Option<JoinHandle<()>>,
}

impl<D: Draft> Inner<D> {
    fn new() -> Self {
        Self {
            state: OrchestratorState::Idle,
            validation_error: None,
            draft: D::default(),
            generation: 0,
            pulse_active: false,
            pulse_task: None,
        }
    }
}

pub struct Orchestrator<D: Draft> {
    backend: Arc<dyn TranslationBackend>,
    events: EventBus,
    pulse_duration: Duration,
    inner: Arc<Mutex<Inner<D>>>,
}

impl<D: Draft> Clone for Orchestrator<D> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            events: self.events.clone(),
            pulse_duration: self.pulse_duration,
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Returns an orchestrator to `Idle` if its `submit()` future is dropped
/// while the request is still outstanding
struct InFlightGuard<'a, D: Draft> {
    orchestrator: &'a Orchestrator<D>,
    token: u64,
    armed: bool,
}

impl<D: Draft> Drop for InFlightGuard<'_, D> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.orchestrator.lock();
        if inner.generation == self.token && inner.state.is_in_flight() {
            info!(kind = ?D::KIND, generation = self.token, "Submit abandoned by caller");
            inner.generation += 1;
            self.orchestrator.set_state(&mut inner, OrchestratorState::Idle);
        }
    }
}

fn lock_inner<D>(inner: &Mutex<Inner<D>>) -> MutexGuard<'_, Inner<D>> {
    match inner.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!("Orchestrator mutex poisoned, recovering");
            poisoned.into_inner()
        }
    }
}

impl<D: Draft> Orchestrator<D> {
    pub fn new(backend: Arc<dyn TranslationBackend>) -> Self {
        Self {
            backend,
            events: EventBus::new(),
            pulse_duration: DEFAULT_SUCCESS_PULSE,
            inner: Arc::new(Mutex::new(Inner::new())),
        }
    }

    pub fn from_settings(backend: Arc<dyn TranslationBackend>, settings: &AppSettings) -> Self {
        Self::new(backend).with_pulse_duration(settings.success_pulse())
    }

    pub fn with_pulse_duration(mut self, duration: Duration) -> Self {
        self.pulse_duration = duration;
        self
    }

    pub fn kind(&self) -> OrchestratorKind {
        D::KIND
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.events.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, Inner<D>> {
        lock_inner(&self.inner)
    }

    fn set_state(&self, inner: &mut Inner<D>, state: OrchestratorState) {
        inner.state = state.clone();
        emit_event(&self.events, AppEvent::StateChanged { kind: D::KIND, state });
    }

    /// Validate the current draft and, if it passes, send it
    ///
    /// Returns `Busy` without doing anything while a request is in flight.
    pub async fn submit(&self) -> SubmitOutcome {
        let (token, wire, submitted_name) = {
            let mut inner = self.lock();
            if inner.state.is_in_flight() {
                debug!(kind = ?D::KIND, "Submit ignored, request already in flight");
                return SubmitOutcome::Busy;
            }

            self.set_state(&mut inner, OrchestratorState::Validating);
            let validated = inner.draft.to_request().and_then(validator::validate);
            let validated = match validated {
                Ok(validated) => validated,
                Err(err) => {
                    info!(kind = ?D::KIND, "Validation failed: {}", err);
                    inner.validation_error = Some(err);
                    emit_event(&self.events, AppEvent::ValidationFailed {
                        kind: D::KIND,
                        message: err.to_string(),
                    });
                    self.cancel_pulse(&mut inner);
                    self.set_state(&mut inner, OrchestratorState::Idle);
                    return SubmitOutcome::Rejected(err);
                }
            };

            let submitted_name = match validated.request() {
                TranslationRequest::File { file_name, .. } => Some(file_name.clone()),
                TranslationRequest::Text { .. } => None,
            };

            inner.generation += 1;
            inner.validation_error = None;
            self.cancel_pulse(&mut inner);
            self.set_state(&mut inner, OrchestratorState::InFlight);
            (inner.generation, request::build(validated), submitted_name)
        };

        debug!(kind = ?D::KIND, generation = token, "Request in flight");
        let mut guard = InFlightGuard { orchestrator: self, token, armed: true };
        let reply = self.backend.send(wire).await;
        guard.armed = false;

        let mut inner = self.lock();
        if inner.generation != token {
            info!(
                kind = ?D::KIND,
                generation = token,
                current = inner.generation,
                "Discarding stale response"
            );
            return SubmitOutcome::Discarded;
        }

        let next = match interpret(reply, submitted_name) {
            Ok(result) => {
                info!(
                    kind = ?D::KIND,
                    chars = result.translated_text.graphemes(true).count(),
                    "Translation succeeded"
                );
                OrchestratorState::Succeeded(result)
            }
            Err(failure) => {
                warn!(kind = ?D::KIND, "Translation failed: {}", failure);
                OrchestratorState::Failed(failure.user_message(D::KIND))
            }
        };

        self.set_state(&mut inner, next.clone());
        if matches!(next, OrchestratorState::Succeeded(_)) {
            self.start_pulse(&mut inner);
        }
        SubmitOutcome::Completed(next)
    }

    /// Back to `Idle`; drops result, error, pulse and draft
    ///
    /// Does not cancel an outstanding request, but its response will be
    /// discarded.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.validation_error = None;
        inner.draft = D::default();
        self.cancel_pulse(&mut inner);
        self.set_state(&mut inner, OrchestratorState::Idle);
    }

    pub fn state(&self) -> OrchestratorState {
        self.lock().state.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state.is_in_flight()
    }

    pub fn success_pulse(&self) -> bool {
        self.lock().pulse_active
    }

    /// Validation error if one is pending, otherwise the failure message
    pub fn error_message(&self) -> Option<String> {
        let inner = self.lock();
        error_message(&inner)
    }

    pub fn result(&self) -> Option<TranslationResult> {
        self.lock().state.result().cloned()
    }

    /// Copy/export access, only while `Succeeded`
    pub fn presenter(&self) -> Option<ResultPresenter> {
        self.result().map(ResultPresenter::new)
    }

    pub fn snapshot(&self) -> PresentationSnapshot {
        let inner = self.lock();
        let result = inner.state.result().cloned();
        let loading = inner.state.is_in_flight();
        PresentationSnapshot {
            kind: D::KIND,
            error: error_message(&inner),
            output_chars: result
                .as_ref()
                .map(|r| r.translated_text.graphemes(true).count())
                .unwrap_or(0),
            result,
            loading,
            submit_enabled: !loading && inner.draft.is_ready(),
            success_pulse: inner.pulse_active,
            input_chars: inner.draft.input_chars(),
            selected_file: inner.draft.selected_file().map(str::to_string),
            state: inner.state.clone(),
        }
    }

    fn start_pulse(&self, inner: &mut Inner<D>) {
        self.cancel_pulse(inner);
        inner.pulse_active = true;
        emit_event(&self.events, AppEvent::SuccessPulse { kind: D::KIND, active: true });

        let token = inner.generation;
        let shared = Arc::clone(&self.inner);
        let events = self.events.clone();
        let duration = self.pulse_duration;
        inner.pulse_task = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let mut inner = lock_inner(&shared);
            if inner.generation == token && inner.pulse_active {
                inner.pulse_active = false;
                inner.pulse_task = None;
                emit_event(&events, AppEvent::SuccessPulse { kind: D::KIND, active: false });
            }
        }));
    }

    fn cancel_pulse(&self, inner: &mut Inner<D>) {
        if let Some(task) = inner.pulse_task.take() {
            task.abort();
        }
        if inner.pulse_active {
            inner.pulse_active = false;
            emit_event(&self.events, AppEvent::SuccessPulse { kind: D::KIND, active: false });
        }
    }
}

impl Orchestrator<TextDraft> {
    pub fn set_text(&self, text: impl Into<String>) {
        self.lock().draft.text = text.into();
    }

    pub fn text(&self) -> String {
        self.lock().draft.text.clone()
    }
}

impl Orchestrator<FileDraft> {
    /// Validate a picked file right away
    ///
    /// A rejected pick surfaces the error and leaves no file selected; an
    /// accepted one clears any earlier validation error.
    pub fn select_file(&self, selection: FileSelection) -> Result<(), ValidationError> {
        let mut inner = self.lock();
        let extension = super::types::extension_of(&selection.file_name);
        match validator::validate_file(&extension, selection.size()) {
            Ok(()) => {
                debug!(file = %selection.file_name, size = selection.size(), "File selected");
                inner.draft.selection = Some(selection);
                inner.validation_error = None;
                Ok(())
            }
            Err(err) => {
                info!(file = %selection.file_name, "File rejected: {}", err);
                inner.draft.selection = None;
                inner.validation_error = Some(err);
                emit_event(&self.events, AppEvent::ValidationFailed {
                    kind: OrchestratorKind::File,
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    pub fn selected_file_name(&self) -> Option<String> {
        self.lock().draft.selected_file().map(str::to_string)
    }
}

fn error_message<D>(inner: &Inner<D>) -> Option<String> {
    if let Some(err) = inner.validation_error {
        return Some(err.to_string());
    }
    match &inner.state {
        OrchestratorState::Failed(message) => Some(message.clone()),
        _ => None,
    }
}

/// Map a backend reply onto success or one of the failure kinds
fn interpret(
    reply: Result<BackendReply, TransportError>,
    submitted_name: Option<String>,
) -> Result<TranslationResult, TranslationFailure> {
    let reply = reply?;
    let server_error = reply.error.filter(|e| !e.trim().is_empty());

    if reply.success && server_error.is_none() {
        return Ok(TranslationResult {
            translated_text: reply.translated.unwrap_or_default(),
            source_file_name: reply.original_file_name.or(submitted_name),
        });
    }

    Err(TranslationFailure::Backend(
        server_error.unwrap_or_else(|| BACKEND_FALLBACK_MESSAGE.to_string()),
    ))
}
