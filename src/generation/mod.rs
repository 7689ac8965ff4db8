//! Prompt construction and typed generation calls
//!
//! [`request`] builds the two request descriptors (field suggestions and
//! full plan); [`Generator`] sends them through the transport layer and
//! parses the structured responses into domain types.

mod generator;
pub mod request;

pub use generator::{FieldSuggestions, Generator};
