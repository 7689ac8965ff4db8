//! Gemini API client implementation
//!
//! Implements the TextGenerator trait against Google's Generative Language
//! API in structured-JSON mode: the request carries a response schema and
//! the reply is the model's JSON text, extracted from the first candidate.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{GenerationError, GenerationRequest, TextGenerator};
use crate::config::LlmConfig;

/// Gemini generateContent client
pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
}

impl GeminiClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config.
    pub fn from_config(config: &LlmConfig) -> Result<Self, GenerationError> {
        debug!(model = %config.model, "from_config: called");
        let api_key = config
            .get_api_key()
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(GenerationError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.clone(),
            http,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the generateContent request body
    ///
    /// `responseMimeType: application/json` plus the schema puts the model
    /// in constrained JSON mode.
    fn build_request_body(&self, request: &GenerationRequest) -> serde_json::Value {
        debug!(temperature = %request.temperature, "build_request_body: called");
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }],
            }],
            "generationConfig": {
                "temperature": request.temperature,
                "maxOutputTokens": request.max_tokens.min(self.max_tokens),
                "responseMimeType": "application/json",
                "responseSchema": request.schema,
            },
        })
    }

    /// Extract the generated JSON text from an API response
    fn parse_response(&self, api_response: GeminiResponse) -> Result<String, GenerationError> {
        debug!("parse_response: called");
        if let Some(feedback) = &api_response.prompt_feedback
            && let Some(reason) = &feedback.block_reason
        {
            debug!(%reason, "parse_response: prompt blocked");
            return Err(GenerationError::Blocked(reason.clone()));
        }

        let candidate = api_response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::InvalidResponse("Response contained no candidates".to_string()))?;

        if let Some(reason) = &candidate.finish_reason
            && reason == "SAFETY"
        {
            debug!("parse_response: candidate stopped for safety");
            return Err(GenerationError::Blocked(reason.clone()));
        }

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<Vec<_>>().join(""))
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerationError::InvalidResponse("Candidate contained no text".to_string()));
        }

        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        debug!(model = %self.model, "generate: called");
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        let body = self.build_request_body(&request);

        // Single attempt: suggestion and plan flows both own their failure
        // semantics, neither wants transport-level retries.
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", self.api_key.clone())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(GenerationError::Network)?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(%status, "generate: API error");
            return Err(GenerationError::ApiError { status, message: text });
        }

        debug!("generate: success");
        let api_response: GeminiResponse = response.json().await?;
        self.parse_response(api_response)
    }
}

// Gemini API response types

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}
