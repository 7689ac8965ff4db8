//! KSA Planner - learning-plan generation orchestrator
//!
//! Collects a job-task description and mastery criteria, auto-suggests the
//! Knowledge/Skills/Abilities fields from the task text via an external
//! generation service, and produces a structured three-phase learning plan
//! on demand. The interesting behavior is all orchestration: debounced,
//! cancellable suggestion timing; merge-without-clobber when suggestions
//! arrive; and a single-attempt request/response contract with the service.
//!
//! # Core Concepts
//!
//! - **Single state owner**: one session actor mutates the form state; the
//!   UI talks to it through a cloneable handle
//! - **Supersession over cancellation**: debounce windows and in-flight
//!   requests carry monotonic tags; stale completions are discarded
//! - **Graceful degradation**: suggestion failures are logged and swallowed,
//!   plan failures surface as a user-facing message and nothing else
//!
//! # Modules
//!
//! - [`domain`] - form input, mastery criteria, and plan data types
//! - [`generation`] - request builders and the typed generation client
//! - [`llm`] - TextGenerator trait and Gemini implementation
//! - [`session`] - the form orchestration state machine
//! - [`config`] - configuration types and loading

pub mod config;
pub mod domain;
pub mod generation;
pub mod llm;
pub mod session;

// Re-export commonly used types
pub use config::{Config, LlmConfig, SessionConfig};
pub use domain::{
    KsaField, KsaInput, LearningPath, LearningPhase, LearningPlan, MASTERY_BEHAVIORS, MasteryInput, SuggestedFields,
};
pub use generation::{FieldSuggestions, Generator};
pub use llm::{GeminiClient, GenerationError, GenerationRequest, TextGenerator, create_backend};
pub use session::{GenerationStatus, Session, SessionHandle, SessionRequest, SessionState};
