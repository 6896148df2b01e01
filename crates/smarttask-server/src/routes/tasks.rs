use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use smarttask_core::task::{CreateTask, TaskFilter, UpdateTask};
use smarttask_core::{Status, Task};
use smarttask_store::StoreError;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/groups", get(task_groups))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/api/tasks/{id}/toggle", post(toggle_task))
        .route("/api/tasks/{id}/subtasks", post(suggest_subtasks))
}

#[derive(Debug, Deserialize)]
struct TaskQuery {
    status: Option<String>,
}

/// Overdue is judged against the server's local calendar date.
fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn task_json(task: &Task) -> Json<Value> {
    Json(json!(task.view(today())))
}

fn tasks_json(tasks: &[Task], today: NaiveDate) -> Value {
    Value::Array(tasks.iter().map(|t| json!(t.view(today))).collect())
}

async fn list_tasks(
    State(state): State<AppState>,
    Query(q): Query<TaskQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let status = match q.status.as_deref() {
        None => None,
        Some(s) => Some(Status::from_str(s).ok_or_else(|| {
            to_error(StoreError::InvalidInput(format!("unknown status {s:?}")))
        })?),
    };
    state
        .store
        .list(&TaskFilter { status })
        .await
        .map(|t| Json(tasks_json(&t, today())))
        .map_err(to_error)
}

async fn task_groups(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let groups = state.store.groups().await.map_err(to_error)?;
    let today = today();
    Ok(Json(json!({
        "pending": tasks_json(&groups.pending, today),
        "completed": tasks_json(&groups.completed, today),
    })))
}

async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .store
        .get(&id)
        .await
        .map(|t| task_json(&t))
        .map_err(to_error)
}

async fn create_task(
    State(state): State<AppState>,
    Json(input): Json<CreateTask>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    state
        .store
        .create(&input)
        .await
        .map(|t| (StatusCode::CREATED, task_json(&t)))
        .map_err(to_error)
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateTask>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .store
        .update(&id, &input)
        .await
        .map(|t| task_json(&t))
        .map_err(to_error)
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    state
        .store
        .delete(&id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(to_error)
}

async fn toggle_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .store
        .toggle_status(&id)
        .await
        .map(|t| task_json(&t))
        .map_err(to_error)
}

/// Suggest subtasks for a stored task. Only pending tasks get suggestions.
async fn suggest_subtasks(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let task = state.store.get(&id).await.map_err(to_error)?;
    if task.status == Status::Completed {
        return Err((
            StatusCode::CONFLICT,
            Json(json!({ "error": "subtasks are only suggested for pending tasks" })),
        ));
    }
    let req = task.subtask_request().map_err(super::subtasks::to_error)?;
    state
        .generator
        .generate(&req)
        .await
        .map(|resp| Json(json!({ "subtasks": resp.subtasks() })))
        .map_err(super::subtasks::to_error)
}

fn to_error(e: StoreError) -> (StatusCode, Json<Value>) {
    let status = match &e {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        StoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": e.to_string() })))
}
