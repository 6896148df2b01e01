use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use smarttask_core::{SchemaViolation, SubtaskSchema};
use tracing::debug;

use super::{GeneratorError, StructuredGenerator};

/// Longest provider error body kept in a `GeneratorError::Provider` message.
const MAX_ERROR_BODY: usize = 512;

/// Structured generation through the Gemini `generateContent` API with a
/// JSON response schema.
pub struct GeminiGenerator {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiGenerator {
    pub fn new(api_key: &str, model: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn request_body(prompt: &str, schema: &SubtaskSchema) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }],
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema.to_provider_schema(),
            },
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn first_text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }
}

#[async_trait]
impl StructuredGenerator for GeminiGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model_hint(&self) -> Option<&str> {
        Some(&self.model)
    }

    async fn generate(&self, prompt: &str, schema: &SubtaskSchema) -> Result<Value, GeneratorError> {
        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(prompt, schema))
            .send()
            .await
            .map_err(|e| GeneratorError::Provider(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let mut body = resp.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(GeneratorError::Provider(format!(
                "provider returned {status}: {body}"
            )));
        }

        let envelope: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| GeneratorError::Provider(format!("decode response: {e}")))?;

        let text = envelope.first_text().ok_or_else(|| {
            GeneratorError::Provider(format!(
                "no candidate text (finish reason: {})",
                envelope.finish_reason().unwrap_or("unknown")
            ))
        })?;
        debug!(model = %self.model, bytes = text.len(), "gemini: received candidate");

        serde_json::from_str(&text).map_err(|e| {
            GeneratorError::SchemaViolation(SchemaViolation::single(
                "$",
                format!("output is not valid JSON: {e}"),
            ))
        })
    }
}
