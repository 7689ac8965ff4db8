//! Generation error types

use thiserror::Error;

/// Errors that can occur during a generation call
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request blocked by the service: {0}")]
    Blocked(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenerationError {
    /// Whether the service refused the request on content-safety grounds
    pub fn is_blocked(&self) -> bool {
        matches!(self, GenerationError::Blocked(_))
    }

    /// Human-readable message suitable for surfacing to the user
    ///
    /// Transport and parse details are collapsed into a short description;
    /// block reasons pass through as-is.
    pub fn user_message(&self) -> String {
        match self {
            GenerationError::ApiError { status, .. } => {
                format!("The generation service returned an error (HTTP {status}). Please try again.")
            }
            GenerationError::Network(_) => "Could not reach the generation service. Please try again.".to_string(),
            GenerationError::InvalidResponse(msg) => {
                format!("The generation service returned an unusable response: {msg}")
            }
            GenerationError::Blocked(reason) => format!("The generation service declined this request: {reason}"),
            GenerationError::Json(_) => "Failed to parse the response from the generation service.".to_string(),
        }
    }
}
