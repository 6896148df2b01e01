use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GenerationError;

/// Validated input to subtask generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtaskRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SubtaskRequest {
    /// Build a request from typed parts, applying the same rules as
    /// [`SubtaskRequest::from_payload`].
    pub fn new(title: &str, description: Option<&str>) -> Result<Self, GenerationError> {
        if title.is_empty() {
            return Err(GenerationError::MissingTitle);
        }
        Ok(Self {
            title: title.to_string(),
            description: description
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        })
    }

    /// Validate an arbitrary caller payload.
    ///
    /// `title` must be a non-empty string.
    /// `description` is kept only when it is a non-empty string; anything
    /// else is treated as absent.
    pub fn from_payload(payload: &Value) -> Result<Self, GenerationError> {
        let title = payload
            .get("title")
            .and_then(Value::as_str)
            .ok_or(GenerationError::MissingTitle)?;
        let description = payload.get("description").and_then(Value::as_str);
        Self::new(title, description)
    }
}

/// A generated list of subtasks that has passed the subtask schema.
///
/// Only [`crate::SubtaskSchema`] can build one, so holding a value means the
/// length and item invariants hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtaskResponse {
    subtasks: Vec<String>,
}

impl SubtaskResponse {
    pub(crate) fn from_validated(subtasks: Vec<String>) -> Self {
        Self { subtasks }
    }

    pub fn subtasks(&self) -> &[String] {
        &self.subtasks
    }

    pub fn into_subtasks(self) -> Vec<String> {
        self.subtasks
    }
}
