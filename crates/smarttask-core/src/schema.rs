use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::subtask::SubtaskResponse;

/// Name of the single field the model must return.
pub const SUBTASKS_FIELD: &str = "subtasks";

/// One reason a generated value failed the subtask schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// JSON path of the offending value, e.g. `$.subtasks[1]`.
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// The full set of violations found in one generated value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaViolation {
    pub violations: Vec<Violation>,
}

impl SchemaViolation {
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violations: vec![Violation::new(path, message)],
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", v.path, v.message)?;
        }
        Ok(())
    }
}

/// Output shape for subtask generation: an object whose `subtasks` field is
/// a list of non-empty strings with a bounded length.
///
/// This is the one place the bounds live. The prompt text, the schema sent
/// to the provider and the post-call validation all read from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubtaskSchema {
    pub min_items: usize,
    pub max_items: usize,
}

impl Default for SubtaskSchema {
    fn default() -> Self {
        Self {
            min_items: 3,
            max_items: 5,
        }
    }
}

impl SubtaskSchema {
    /// Render the schema in the OpenAPI subset accepted by structured-output
    /// model APIs.
    pub fn to_provider_schema(&self) -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                SUBTASKS_FIELD: {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "minItems": self.min_items,
                    "maxItems": self.max_items,
                }
            },
            "required": [SUBTASKS_FIELD],
        })
    }

    /// Check a generated value against the schema.
    ///
    /// Every problem found is reported, not just the first. The list is
    /// returned exactly as generated: no reordering, trimming, truncation
    /// or padding.
    pub fn validate(&self, value: &Value) -> Result<SubtaskResponse, SchemaViolation> {
        let obj = value
            .as_object()
            .ok_or_else(|| SchemaViolation::single("$", "expected an object"))?;

        let field_path = format!("$.{SUBTASKS_FIELD}");
        let items = match obj.get(SUBTASKS_FIELD) {
            None | Some(Value::Null) => {
                return Err(SchemaViolation::single(field_path, "required field is missing"))
            }
            Some(Value::Array(items)) => items,
            Some(_) => return Err(SchemaViolation::single(field_path, "expected an array")),
        };

        let mut violations = Vec::new();
        if items.len() < self.min_items {
            violations.push(Violation::new(
                &field_path,
                format!(
                    "expected at least {} items, got {}",
                    self.min_items,
                    items.len()
                ),
            ));
        }
        if items.len() > self.max_items {
            violations.push(Violation::new(
                &field_path,
                format!(
                    "expected at most {} items, got {}",
                    self.max_items,
                    items.len()
                ),
            ));
        }

        let mut subtasks = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let path = format!("{field_path}[{i}]");
            match item.as_str() {
                Some(s) if s.trim().is_empty() => {
                    violations.push(Violation::new(path, "must not be empty"));
                }
                Some(s) => subtasks.push(s.to_string()),
                None => violations.push(Violation::new(path, "expected a string")),
            }
        }

        if violations.is_empty() {
            Ok(SubtaskResponse::from_validated(subtasks))
        } else {
            Err(SchemaViolation { violations })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_three_to_five_strings() {
        let schema = SubtaskSchema::default();
        for n in 3..=5 {
            let items: Vec<String> = (0..n).map(|i| format!("step {i}")).collect();
            let resp = schema.validate(&json!({ "subtasks": items })).unwrap();
            assert_eq!(resp.subtasks(), items.as_slice());
        }
    }

    #[test]
    fn rejects_two_items_without_padding() {
        let err = SubtaskSchema::default()
            .validate(&json!({ "subtasks": ["a", "b"] }))
            .unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].path, "$.subtasks");
        assert!(err.violations[0].message.contains("at least 3"));
    }

    #[test]
    fn rejects_six_items_without_truncating() {
        let err = SubtaskSchema::default()
            .validate(&json!({ "subtasks": ["a", "b", "c", "d", "e", "f"] }))
            .unwrap_err();
        assert!(err.violations[0].message.contains("at most 5"));
    }

    #[test]
    fn reports_each_non_string_item() {
        let err = SubtaskSchema::default()
            .validate(&json!({ "subtasks": ["a", 2, "c", null] }))
            .unwrap_err();
        let paths: Vec<&str> = err.violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["$.subtasks[1]", "$.subtasks[3]"]);
    }

    #[test]
    fn rejects_blank_items() {
        let err = SubtaskSchema::default()
            .validate(&json!({ "subtasks": ["a", "  ", "c"] }))
            .unwrap_err();
        assert_eq!(err.violations[0].path, "$.subtasks[1]");
        assert_eq!(err.violations[0].message, "must not be empty");
    }

    #[test]
    fn rejects_missing_field_and_wrong_shapes() {
        let schema = SubtaskSchema::default();
        assert_eq!(
            schema.validate(&json!({})).unwrap_err().violations[0].message,
            "required field is missing"
        );
        assert_eq!(
            schema.validate(&json!({ "subtasks": "a, b, c" })).unwrap_err().violations[0]
                .message,
            "expected an array"
        );
        assert_eq!(
            schema.validate(&json!(["a", "b", "c"])).unwrap_err().violations[0].path,
            "$"
        );
    }

    #[test]
    fn keeps_order_and_duplicates() {
        let resp = SubtaskSchema::default()
            .validate(&json!({ "subtasks": ["z", "a", "z"] }))
            .unwrap();
        assert_eq!(resp.into_subtasks(), vec!["z", "a", "z"]);
    }

    #[test]
    fn provider_schema_carries_bounds() {
        let schema = SubtaskSchema::default().to_provider_schema();
        let field = &schema["properties"]["subtasks"];
        assert_eq!(field["type"], "ARRAY");
        assert_eq!(field["items"]["type"], "STRING");
        assert_eq!(field["minItems"], 3);
        assert_eq!(field["maxItems"], 5);
        assert_eq!(schema["required"][0], "subtasks");
    }

    #[test]
    fn violation_display_joins_entries() {
        let v = SchemaViolation {
            violations: vec![
                Violation::new("$.subtasks", "too short"),
                Violation::new("$.subtasks[0]", "expected a string"),
            ],
        };
        assert_eq!(
            v.to_string(),
            "$.subtasks: too short; $.subtasks[0]: expected a string"
        );
    }
}
