//! Message types for the session actor

use tokio::sync::oneshot;

use super::state::SessionState;
use crate::domain::{KsaField, LearningPlan};
use crate::generation::FieldSuggestions;
use crate::llm::GenerationError;

/// Requests handled by the session actor
///
/// User intents come from handles; the tagged variants at the bottom are
/// posted back by the actor's own spawned tasks (debounce timer, suggestion
/// fetch, plan fetch) and carry the counter value current when they were
/// started, so stale completions can be discarded.
#[derive(Debug)]
pub enum SessionRequest {
    /// Set one form field's value
    EditField { field: KsaField, value: String },

    /// Toggle one mastery behavior checkbox
    SetBehavior { name: String, selected: bool },

    /// Replace the custom mastery criterion text
    SetCustom { text: String },

    /// Trigger plan generation (no-op unless the form is complete and idle)
    Generate,

    /// Reset the whole session to its initial defaults
    ClearAll,

    /// Snapshot the current state
    State { reply_tx: oneshot::Sender<SessionState> },

    /// End the actor loop
    Shutdown,

    /// A debounce window elapsed (internal)
    DebounceElapsed { seq: u64 },

    /// A suggestion fetch resolved (internal)
    SuggestionsReady {
        seq: u64,
        result: Result<FieldSuggestions, GenerationError>,
    },

    /// A plan fetch resolved (internal)
    PlanReady {
        epoch: u64,
        result: Result<LearningPlan, GenerationError>,
    },
}
