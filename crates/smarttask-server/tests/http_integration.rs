//! Integration tests against a real listener.
//!
//! Each test spawns an in-process server on 127.0.0.1:0 and talks to it
//! over HTTP with reqwest. The provider tests also spawn a stub
//! `generateContent` endpoint so the Gemini backend runs end to end.

use std::time::Duration;

use axum::http::StatusCode as AxumStatusCode;
use axum::{Json, Router};
use reqwest::StatusCode;
use serde_json::{json, Value};
use smarttask_generator::{GeneratorConfig, SubtaskGenerator};
use smarttask_server::test_helpers::{
    mock_generator, spawn_test_server, spawn_test_server_with_store, unavailable_generator,
};
use smarttask_store::TaskStore;
use tokio::net::TcpListener;

/// Serve `reply` as the provider's answer to every request.
async fn spawn_provider(status: AxumStatusCode, reply: Value) -> String {
    let app = Router::new().fallback(move || {
        let reply = reply.clone();
        async move { (status, Json(reply)) }
    });
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn gemini_generator(provider_url: &str) -> SubtaskGenerator {
    SubtaskGenerator::from_config(&GeneratorConfig {
        api_key: Some("test-key".into()),
        base_url: provider_url.to_string(),
        timeout: Duration::from_secs(10),
        ..Default::default()
    })
}

fn candidate(text: &str) -> Value {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
}

async fn generate(base_url: &str, body: Value) -> (StatusCode, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{base_url}/api/generate-subtasks"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn health_over_http() {
    let server = spawn_test_server(unavailable_generator()).await;
    let v: Value = reqwest::get(format!("{}/api/health", server.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(v["status"], "ok");
    assert_eq!(v["generation"], false);
}

#[tokio::test]
async fn generate_with_mock_backend() {
    let (generator, mock) = mock_generator(&["Book venue", "Send invites", "Order cake"]);
    let server = spawn_test_server(generator).await;
    let (status, v) = generate(&server.base_url, json!({ "title": "Plan birthday party" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["subtasks"], json!(["Book venue", "Send invites", "Order cake"]));
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn gemini_backend_end_to_end() {
    let provider = spawn_provider(
        AxumStatusCode::OK,
        candidate(r#"{"subtasks":["Pick a date","Book venue","Send invites","Order cake"]}"#),
    )
    .await;
    let server = spawn_test_server(gemini_generator(&provider)).await;
    let (status, v) = generate(
        &server.base_url,
        json!({ "title": "Plan birthday party", "description": "For 20 guests" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["subtasks"].as_array().unwrap().len(), 4);
    assert_eq!(v["subtasks"][0], "Pick a date");
}

#[tokio::test]
async fn gemini_out_of_bounds_output_is_unprocessable() {
    let provider = spawn_provider(
        AxumStatusCode::OK,
        candidate(r#"{"subtasks":["Only one","And two"]}"#),
    )
    .await;
    let server = spawn_test_server(gemini_generator(&provider)).await;
    let (status, v) = generate(&server.base_url, json!({ "title": "Plan birthday party" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(v["error"], "Subtasks format invalid");
    assert!(v["details"][0]["message"]
        .as_str()
        .unwrap()
        .contains("at least 3"));
}

#[tokio::test]
async fn gemini_provider_error_is_generic_failure() {
    let provider = spawn_provider(
        AxumStatusCode::SERVICE_UNAVAILABLE,
        json!({ "error": { "message": "backend overloaded at shard-7" } }),
    )
    .await;
    let server = spawn_test_server(gemini_generator(&provider)).await;
    let (status, v) = generate(&server.base_url, json!({ "title": "Plan birthday party" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(v, json!({ "error": "Failed to generate subtasks" }));
}

#[tokio::test]
async fn no_api_key_is_not_configured() {
    let generator = SubtaskGenerator::from_config(&GeneratorConfig::default());
    let server = spawn_test_server(generator).await;
    let (status, v) = generate(&server.base_url, json!({ "title": "Plan birthday party" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(v["error"], "Subtask generation is not configured");
}

#[tokio::test]
async fn tasks_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("smart-tasks.json");
    let client = reqwest::Client::new();

    let server = spawn_test_server_with_store(
        TaskStore::open(&path).await.unwrap(),
        unavailable_generator(),
    )
    .await;
    let resp = client
        .post(format!("{}/api/tasks", server.base_url))
        .json(&json!({ "title": "Water plants", "description": "Balcony only" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.unwrap();

    let restarted = spawn_test_server_with_store(
        TaskStore::open(&path).await.unwrap(),
        unavailable_generator(),
    )
    .await;
    let tasks: Value = client
        .get(format!("{}/api/tasks", restarted.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["id"], created["id"]);
    assert_eq!(tasks[0]["description"], "Balcony only");
}
