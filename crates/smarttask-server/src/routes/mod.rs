pub mod health;
pub mod subtasks;
pub mod tasks;

use std::sync::Arc;

use axum::Router;
use smarttask_generator::SubtaskGenerator;
use smarttask_store::TaskStore;
use tower_http::cors::CorsLayer;

pub struct InnerAppState {
    pub store: TaskStore,
    pub generator: SubtaskGenerator,
}

pub type AppState = Arc<InnerAppState>;

pub fn build_router(store: TaskStore, generator: SubtaskGenerator) -> Router {
    let state = Arc::new(InnerAppState { store, generator });

    Router::new()
        .merge(health::routes())
        .merge(subtasks::routes())
        .merge(tasks::routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
