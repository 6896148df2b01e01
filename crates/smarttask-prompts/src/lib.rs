pub mod subtasks;

pub use subtasks::build_prompt;
