//! Generation request descriptor

use serde::Serialize;

/// Everything needed for one structured-generation call
///
/// The schema constrains the service to JSON output of the given shape;
/// the caller still validates the parsed result.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    /// Full prompt text
    pub prompt: String,

    /// Response schema in the service's schema dialect
    pub schema: serde_json::Value,

    /// Sampling temperature
    pub temperature: f32,

    /// Max tokens for the response
    pub max_tokens: u32,
}
