use serde::Serialize;

use crate::core::features::translator::types::{OrchestratorKind, OrchestratorState};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload")] // Tagged enum for easier renderer parsing
pub enum AppEvent {
    #[serde(rename = "translator://state")]
    StateChanged {
        kind: OrchestratorKind,
        state: OrchestratorState,
    },

    #[serde(rename = "translator://validation")]
    ValidationFailed {
        kind: OrchestratorKind,
        message: String,
    },

    #[serde(rename = "translator://success-pulse")]
    SuccessPulse {
        kind: OrchestratorKind,
        active: bool,
    },
}
