//! Form orchestration state machine
//!
//! A single actor task owns the session state (KSA input, mastery criteria,
//! suggestion flags, plan, error) and mutates it only in response to user
//! intents or resolved async results. Two independent flows run through it:
//!
//! - **Suggestions** (side channel): task edits restart a debounce window;
//!   when it elapses, blank fields are fetched from the generation service
//!   and merged in without clobbering anything the user typed meanwhile.
//! - **Plan generation** (primary): `Idle -> Generating -> Idle`, storing
//!   either a complete plan or a user-facing error.
//!
//! Debounce windows and in-flight requests are tagged with monotonic
//! counters; stale completions are discarded, so late responses can never
//! corrupt state changed since they were issued.

mod core;
mod handle;
mod messages;
mod state;

pub use core::Session;
pub use handle::SessionHandle;
pub use messages::SessionRequest;
pub use state::{GenerationStatus, SessionState};
