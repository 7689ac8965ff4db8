//! TextGenerator trait definition

use async_trait::async_trait;

use super::{GenerationError, GenerationRequest};

/// Stateless structured-text generator - each call is independent
///
/// This is the core abstraction over the external generation service. Every
/// call issues exactly one outbound request: no caching, no deduplication,
/// no internal retry. Callers decide what a failure means (suggestion
/// fetches swallow it, plan generation surfaces it).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send a single generation request and return the raw JSON text
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}
