use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "generation": state.generator.is_available(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::test_helpers::{mock_generator, test_router, unavailable_generator};

    async fn get_health(app: axum::Router) -> Value {
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn reports_generation_available() {
        let (generator, _) = mock_generator(&["a", "b", "c"]);
        let v = get_health(test_router(generator)).await;
        assert_eq!(v["status"], "ok");
        assert_eq!(v["generation"], true);
    }

    #[tokio::test]
    async fn reports_generation_unavailable() {
        let v = get_health(test_router(unavailable_generator())).await;
        assert_eq!(v["generation"], false);
    }
}
