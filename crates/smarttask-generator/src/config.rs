use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::backend::{GeminiGenerator, StructuredGenerator};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Provider settings for subtask generation.
#[derive(Clone)]
pub struct GeneratorConfig {
    /// Provider API key. Generation is unavailable without one.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Upper bound on a single provider call.
    pub timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeneratorConfig {
    /// The API key, if one is set and not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Build the provider backend, or `None` when no key is configured.
    pub fn build_backend(&self) -> Option<Arc<dyn StructuredGenerator>> {
        let key = self.api_key()?;
        let backend: Arc<dyn StructuredGenerator> =
            Arc::new(GeminiGenerator::new(key, &self.model, &self.base_url));
        Some(backend)
    }
}
