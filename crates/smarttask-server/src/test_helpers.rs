use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use smarttask_generator::backend::MockGenerator;
use smarttask_generator::{StructuredGenerator, SubtaskGenerator};
use smarttask_store::TaskStore;
use tokio::net::TcpListener;

/// Wrap `mock` in a generator, keeping a handle for call assertions.
pub fn generator_with(mock: MockGenerator) -> (SubtaskGenerator, Arc<MockGenerator>) {
    let mock = Arc::new(mock);
    let generator = SubtaskGenerator::new(
        Some(mock.clone() as Arc<dyn StructuredGenerator>),
        Duration::from_secs(5),
    );
    (generator, mock)
}

/// A generator whose backend always returns `{ "subtasks": items }`.
pub fn mock_generator(items: &[&str]) -> (SubtaskGenerator, Arc<MockGenerator>) {
    generator_with(MockGenerator::with_subtasks(items))
}

/// A generator with no provider configured.
pub fn unavailable_generator() -> SubtaskGenerator {
    SubtaskGenerator::new(None, Duration::from_secs(5))
}

/// Build a test router with an in-memory task store.
pub fn test_router(generator: SubtaskGenerator) -> Router {
    crate::routes::build_router(TaskStore::in_memory(), generator)
}

/// A running test server with base_url and background task handle.
pub struct TestServer {
    pub base_url: String,
    _handle: tokio::task::JoinHandle<()>,
}

/// Spawn an axum test server on a random port with the given store.
pub async fn spawn_test_server_with_store(store: TaskStore, generator: SubtaskGenerator) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");
    let handle = tokio::spawn(async move {
        crate::serve(listener, store, generator).await.unwrap();
    });
    TestServer {
        base_url,
        _handle: handle,
    }
}

/// Spawn an axum test server on a random port with an in-memory store.
pub async fn spawn_test_server(generator: SubtaskGenerator) -> TestServer {
    spawn_test_server_with_store(TaskStore::in_memory(), generator).await
}
