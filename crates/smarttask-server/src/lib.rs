pub mod config;
mod routes;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

use anyhow::Result;
use smarttask_generator::SubtaskGenerator;
use smarttask_store::TaskStore;
use tokio::net::TcpListener;

pub async fn serve(listener: TcpListener, store: TaskStore, generator: SubtaskGenerator) -> Result<()> {
    let app = routes::build_router(store, generator);
    axum::serve(listener, app).await?;
    Ok(())
}
