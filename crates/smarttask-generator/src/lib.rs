pub mod backend;
pub mod config;
mod generator;

pub use backend::{GeneratorError, StructuredGenerator};
pub use config::GeneratorConfig;
pub use generator::SubtaskGenerator;
