//! Translator feature
//!
//! Text and file translation against the remote backend. Each orchestrator
//! runs input through the validator, the request builder and the backend, and
//! exposes the outcome through a presenter.

pub mod orchestrator;
pub mod presenter;
pub mod request;
pub mod service;
pub mod types;
pub mod validator;

pub use orchestrator::{
    FileOrchestrator, Orchestrator, PresentationSnapshot, TextOrchestrator,
};
pub use presenter::{CopyAck, ExportArtifact, ResultPresenter};
pub use request::WireRequest;
pub use service::{TranslationBackend, TranslatorService};
pub use types::{
    FileSelection, OrchestratorKind, OrchestratorState, SubmitOutcome, TranslationRequest,
    TranslationResult, TransportError, ValidationError,
};
