pub mod error;
pub mod schema;
pub mod subtask;
pub mod task;

pub use error::{GenerationError, SmartTaskError};
pub use schema::{SchemaViolation, SubtaskSchema, Violation};
pub use subtask::{SubtaskRequest, SubtaskResponse};
pub use task::{Status, Task, TaskGroups, TaskView};
