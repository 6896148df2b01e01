use std::path::PathBuf;


use smarttask_core::task::{CreateTask, TaskFilter, UpdateTask};
use smarttask_core::{SmartTaskError, Task, TaskGroups};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// File name of the mirrored task list.
pub const DATA_FILE_NAME: &str = "smart-tasks.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("store error: {0}")]
    Internal(String),
}

impl From<SmartTaskError> for StoreError {
    fn from(e: SmartTaskError) -> Self {
        match e {
            SmartTaskError::InvalidInput(msg) => StoreError::InvalidInput(msg),
        }
    }
}

/// Default location of the task file:
/// `$SMARTTASK_DATA`, else `$XDG_DATA_HOME/smarttask/smart-tasks.json`,
/// else `~/.local/share/smarttask/smart-tasks.json`.
pub fn default_data_path() -> PathBuf {
    if let Ok(path) = std::env::var("SMARTTASK_DATA") {
        return PathBuf::from(path);
    }
    let base = if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg)
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local/share")
    } else {
        PathBuf::from(".")
    };
    base.join("smarttask").join(DATA_FILE_NAME)
}

/// The task list, held in memory and mirrored to a JSON file after every
/// change.
///
/// The lock is held across the file write so the file always matches the
/// list as of the last successful mutation.
pub struct TaskStore {
    tasks: Mutex<Vec<Task>>,
    path: Option<PathBuf>,
}

impl TaskStore {
    /// Load the task list from `path`. A missing file is an empty list.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let tasks = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Internal(format!("parse {}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(StoreError::Internal(format!(
                    "read {}: {e}",
                    path.display()
                )))
            }
        };
        debug!(path = %path.display(), "loaded task store");
        Ok(Self {
            tasks: Mutex::new(tasks),
            path: Some(path),
        })
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            path: None,
        }
    }

    /// Write the whole list through a temp file and rename.
    async fn persist(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let Some(ref path) = self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StoreError::Internal(format!("mkdir: {e}")))?;
            }
        }
        let json = serde_json::to_vec_pretty(tasks)
            .map_err(|e| StoreError::Internal(format!("serialize tasks: {e}")))?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| StoreError::Internal(format!("write {}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, path).await.map_err(|e| {
            warn!("failed to replace {}: {e}", path.display());
            StoreError::Internal(format!("rename {}: {e}", path.display()))
        })
    }

    pub async fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.lock().await;
        Ok(tasks
            .iter()
            .filter(|t| filter.status.map_or(true, |s| t.status == s))
            .cloned()
            .collect())
    }

    pub async fn groups(&self) -> Result<TaskGroups, StoreError> {
        Ok(TaskGroups::partition(self.list(&TaskFilter::default()).await?))
    }

    pub async fn get(&self, id: &str) -> Result<Task, StoreError> {
        self.tasks
            .lock()
            .await
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("task {id}")))
    }

    pub async fn create(&self, input: &CreateTask) -> Result<Task, StoreError> {
        input.validate()?;
        let task = Task::from_create(input);
        let mut tasks = self.tasks.lock().await;
        tasks.push(task.clone());
        if let Err(e) = self.persist(&tasks).await {
            tasks.pop();
            return Err(e);
        }
        Ok(task)
    }

    pub async fn update(&self, id: &str, update: &UpdateTask) -> Result<Task, StoreError> {
        update.validate()?;
        self.modify(id, |task| task.apply(update)).await
    }

    /// Flip a task between pending and completed.
    pub async fn toggle_status(&self, id: &str) -> Result<Task, StoreError> {
        self.modify(id, |task| task.status = task.status.toggled()).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut tasks = self.tasks.lock().await;
        let idx = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("task {id}")))?;
        let removed = tasks.remove(idx);
        if let Err(e) = self.persist(&tasks).await {
            tasks.insert(idx, removed);
            return Err(e);
        }
        Ok(())
    }

    async fn modify(&self, id: &str, f: impl FnOnce(&mut Task)) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.lock().await;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("task {id}")))?;
        let before = task.clone();
        f(task);
        let after = task.clone();
        if let Err(e) = self.persist(&tasks).await {
            if let Some(t) = tasks.iter_mut().find(|t| t.id == id) {
                *t = before;
            }
            return Err(e);
        }
        Ok(after)
    }
}
