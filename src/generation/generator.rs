//! Typed generation client
//!
//! Wraps the transport backend with the two operations the orchestrator
//! needs: partial field suggestions and full plan synthesis. Each call is a
//! single attempt; this layer parses and validates the structured response
//! but leaves failure policy (swallow vs surface) to the caller.

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use super::request;
use crate::config::Config;
use crate::domain::{KsaField, KsaInput, LearningPlan, MasteryInput};
use crate::llm::{GenerationError, TextGenerator};

/// Suggestions returned for a subset of the KSA fields
///
/// The service may answer with any subset of the requested fields; absent
/// and empty values both mean "no suggestion".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FieldSuggestions {
    #[serde(default)]
    pub knowledge: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub abilities: Option<String>,
}

impl FieldSuggestions {
    /// The suggestion for a field, if present and non-blank
    pub fn get(&self, field: KsaField) -> Option<&str> {
        let value = match field {
            KsaField::Task => return None,
            KsaField::Knowledge => self.knowledge.as_deref(),
            KsaField::Skills => self.skills.as_deref(),
            KsaField::Abilities => self.abilities.as_deref(),
        };
        value.map(str::trim).filter(|v| !v.is_empty())
    }
}

/// Generation client for the two structured calls
pub struct Generator {
    backend: Arc<dyn TextGenerator>,
    suggestion_temperature: f32,
    plan_temperature: f32,
    max_tokens: u32,
}

impl Generator {
    /// Create a generator over the given backend, taking tuning from config
    pub fn new(backend: Arc<dyn TextGenerator>, config: &Config) -> Self {
        debug!(model = %config.llm.model, "Generator::new: called");
        Self {
            backend,
            suggestion_temperature: config.session.suggestion_temperature,
            plan_temperature: config.session.plan_temperature,
            max_tokens: config.llm.max_tokens,
        }
    }

    /// Fetch suggestions for the given blank fields
    ///
    /// Failures here are non-fatal to the session: the orchestrator logs
    /// them and leaves the fields empty.
    pub async fn request_suggestions(
        &self,
        task: &str,
        fields: &[KsaField],
    ) -> Result<FieldSuggestions, GenerationError> {
        debug!(field_count = %fields.len(), "request_suggestions: called");
        let request = request::suggestion_request(task, fields, self.suggestion_temperature, self.max_tokens);

        let text = self.backend.generate(request).await?;
        let suggestions: FieldSuggestions = serde_json::from_str(text.trim())?;

        debug!(
            has_knowledge = %suggestions.knowledge.is_some(),
            has_skills = %suggestions.skills.is_some(),
            has_abilities = %suggestions.abilities.is_some(),
            "request_suggestions: parsed"
        );
        Ok(suggestions)
    }

    /// Generate a complete learning plan
    ///
    /// The response must match the full plan shape: all three phases with
    /// title, description, and activities. Anything less is a schema
    /// mismatch, fatal to this attempt.
    pub async fn request_plan(&self, ksa: &KsaInput, mastery: &MasteryInput) -> Result<LearningPlan, GenerationError> {
        debug!("request_plan: called");
        let request = request::plan_request(ksa, mastery, self.plan_temperature, self.max_tokens);

        let text = self.backend.generate(request).await?;
        let plan: LearningPlan = serde_json::from_str(text.trim())
            .map_err(|e| GenerationError::InvalidResponse(format!("Plan did not match the expected shape: {e}")))?;

        debug!("request_plan: parsed");
        Ok(plan)
    }
}
