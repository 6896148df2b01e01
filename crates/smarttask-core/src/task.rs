use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, SmartTaskError};
use crate::subtask::SubtaskRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Pending,
    Completed,
}

impl Status {
    pub const ALL: &[Status] = &[Status::Pending, Status::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Completed => "completed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::Completed => "Completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Status::Pending),
            "completed" => Some(Status::Completed),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Status::Pending => Status::Completed,
            Status::Completed => Status::Pending,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Build a new task from creation input, assigning a fresh id and
    /// creation timestamp.
    pub fn from_create(input: &CreateTask) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: input.title.clone(),
            description: input.description.clone().filter(|d| !d.is_empty()),
            due_date: input.due_date,
            status: input.status,
            created_at: Utc::now(),
        }
    }

    /// A pending task whose due date is strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == Status::Pending && self.due_date.is_some_and(|due| due < today)
    }

    /// The task as shown to clients on `today`.
    pub fn view(&self, today: NaiveDate) -> TaskView<'_> {
        TaskView {
            task: self,
            overdue: self.is_overdue(today),
        }
    }

    /// Apply a partial update. `id` and `created_at` never change.
    pub fn apply(&mut self, update: &UpdateTask) {
        if let Some(ref title) = update.title {
            self.title = title.clone();
        }
        if let Some(ref description) = update.description {
            self.description = description.clone().filter(|d| !d.is_empty());
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }

    pub fn subtask_request(&self) -> Result<SubtaskRequest, GenerationError> {
        SubtaskRequest::new(&self.title, self.description.as_deref())
    }
}

/// A task plus state derived from the current date. Never persisted.
#[derive(Debug, Serialize)]
pub struct TaskView<'a> {
    #[serde(flatten)]
    pub task: &'a Task,
    pub overdue: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Status,
}

impl CreateTask {
    pub fn validate(&self) -> Result<(), SmartTaskError> {
        if self.title.trim().is_empty() {
            return Err(SmartTaskError::InvalidInput("title must not be empty".into()));
        }
        Ok(())
    }
}

/// Patch for an existing task. `None` leaves a field untouched; the nested
/// options on `description` and `due_date` allow clearing them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,
    pub status: Option<Status>,
}

impl UpdateTask {
    pub fn validate(&self) -> Result<(), SmartTaskError> {
        if let Some(ref title) = self.title {
            if title.trim().is_empty() {
                return Err(SmartTaskError::InvalidInput("title must not be empty".into()));
            }
        }
        Ok(())
    }
}

/// Distinguishes an absent field from an explicit `null`.
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, s: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(s),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(d: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(d).map(Some)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<Status>,
}

/// Tasks split by status, each group in list order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskGroups {
    pub pending: Vec<Task>,
    pub completed: Vec<Task>,
}

impl TaskGroups {
    pub fn partition(tasks: impl IntoIterator<Item = Task>) -> Self {
        let (pending, completed) = tasks
            .into_iter()
            .partition(|t| t.status == Status::Pending);
        Self { pending, completed }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.completed.is_empty()
    }
}
