//! Generation-service transport layer
//!
//! A thin async boundary around the external text-generation API: one
//! request descriptor in, one raw JSON text out. Parsing into domain types
//! happens a layer up, in [`crate::generation`].

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod gemini;
mod types;

pub use client::TextGenerator;
pub use error::GenerationError;
pub use gemini::GeminiClient;
pub use types::GenerationRequest;

use crate::config::LlmConfig;

/// Create the generation backend from configuration
pub fn create_backend(config: &LlmConfig) -> Result<Arc<dyn TextGenerator>, GenerationError> {
    debug!(model = %config.model, "create_backend: called");
    Ok(Arc::new(GeminiClient::from_config(config)?))
}
