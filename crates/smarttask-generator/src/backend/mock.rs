use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use smarttask_core::SubtaskSchema;

use super::{GeneratorError, StructuredGenerator};

/// A deterministic backend for tests. Returns a preconfigured value or
/// error and records every prompt it receives.
pub struct MockGenerator {
    outcome: Result<Value, GeneratorError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    /// Return `value` verbatim from every call.
    pub fn returning(value: Value) -> Self {
        Self {
            outcome: Ok(value),
            delay: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Return `{ "subtasks": items }` from every call.
    pub fn with_subtasks(items: &[&str]) -> Self {
        Self::returning(json!({ "subtasks": items }))
    }

    /// Fail every call with `err`.
    pub fn failing(err: GeneratorError) -> Self {
        Self {
            outcome: Err(err),
            delay: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl StructuredGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, prompt: &str, _schema: &SubtaskSchema) -> Result<Value, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.clone()
    }
}
