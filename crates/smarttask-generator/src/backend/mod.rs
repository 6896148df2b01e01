pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use serde_json::Value;
use smarttask_core::{SchemaViolation, SubtaskSchema};
use thiserror::Error;

pub use gemini::GeminiGenerator;
pub use mock::MockGenerator;

/// Failure signal from a structured generation backend.
#[derive(Debug, Clone, Error)]
pub enum GeneratorError {
    /// The model answered, but not in a shape that can be trusted.
    #[error("schema violation: {0}")]
    SchemaViolation(SchemaViolation),

    /// Transport, provider-side or decoding failure.
    #[error("provider error: {0}")]
    Provider(String),
}

/// A capability that turns a prompt into a JSON value shaped by a schema.
///
/// Backends send the schema to the model and parse what comes back. They
/// do not have to enforce the item bounds themselves: `SubtaskGenerator`
/// validates every returned value against the same schema.
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Optional model hint for logging.
    fn model_hint(&self) -> Option<&str> {
        None
    }

    async fn generate(&self, prompt: &str, schema: &SubtaskSchema) -> Result<Value, GeneratorError>;
}
