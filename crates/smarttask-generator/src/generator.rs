use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use smarttask_core::{GenerationError, SubtaskRequest, SubtaskResponse, SubtaskSchema};
use tracing::{debug, info, warn};

use crate::backend::{GeneratorError, StructuredGenerator};
use crate::config::GeneratorConfig;

/// Turns a task title and description into 3-5 suggested subtasks.
///
/// Each call is single-shot: validate, check the backend is configured,
/// build the prompt, call the backend once under a timeout, validate the
/// result. Nothing is retried and no state is shared between calls.
#[derive(Clone)]
pub struct SubtaskGenerator {
    backend: Option<Arc<dyn StructuredGenerator>>,
    schema: SubtaskSchema,
    timeout: Duration,
}

impl SubtaskGenerator {
    pub fn new(backend: Option<Arc<dyn StructuredGenerator>>, timeout: Duration) -> Self {
        Self {
            backend,
            schema: SubtaskSchema::default(),
            timeout,
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.build_backend(), config.timeout)
    }

    pub fn with_schema(mut self, schema: SubtaskSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub fn schema(&self) -> &SubtaskSchema {
        &self.schema
    }

    /// Validate a raw caller payload, then generate.
    pub async fn generate_from_payload(
        &self,
        payload: &Value,
    ) -> Result<SubtaskResponse, GenerationError> {
        let req = SubtaskRequest::from_payload(payload)?;
        self.generate(&req).await
    }

    pub async fn generate(&self, req: &SubtaskRequest) -> Result<SubtaskResponse, GenerationError> {
        let Some(backend) = self.backend.clone() else {
            warn!("subtask generation requested but no provider is configured");
            return Err(GenerationError::ProviderUnavailable);
        };

        let prompt = smarttask_prompts::build_prompt(req, &self.schema);
        let schema = self.schema;
        let backend_name = backend.name().to_string();
        let model = backend.model_hint().unwrap_or("default").to_string();
        debug!(backend = %backend_name, model = %model, "requesting subtasks");

        // Run the call on its own task so a panicking backend surfaces as a
        // JoinError instead of unwinding through the caller.
        let mut handle = tokio::spawn(async move { backend.generate(&prompt, &schema).await });
        let outcome = match tokio::time::timeout(self.timeout, &mut handle).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(join_err)) => {
                warn!(backend = %backend_name, "subtask backend task failed: {join_err}");
                return Err(GenerationError::ProviderFailure(format!(
                    "backend task failed: {join_err}"
                )));
            }
            Err(_) => {
                handle.abort();
                warn!(
                    backend = %backend_name,
                    "subtask generation timed out after {:?}",
                    self.timeout
                );
                return Err(GenerationError::ProviderFailure(format!(
                    "timed out after {:?}",
                    self.timeout
                )));
            }
        };

        let raw = match outcome {
            Ok(raw) => raw,
            Err(GeneratorError::SchemaViolation(v)) => {
                warn!(backend = %backend_name, "provider output rejected: {v}");
                return Err(GenerationError::SchemaViolation(v));
            }
            Err(GeneratorError::Provider(msg)) => {
                warn!(backend = %backend_name, "provider call failed: {msg}");
                return Err(GenerationError::ProviderFailure(msg));
            }
        };

        let resp = self.schema.validate(&raw).map_err(|v| {
            warn!(backend = %backend_name, "generated subtasks failed validation: {v}");
            GenerationError::SchemaViolation(v)
        })?;
        info!(
            backend = %backend_name,
            model = %model,
            count = resp.subtasks().len(),
            "generated subtasks"
        );
        Ok(resp)
    }
}
