//! Handlers for tasks, nested under `/collections/{collection_id}/tasks`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use taskboard_core::ids::parse_db_id;
use taskboard_core::types::DbId;
use taskboard_db::models::task::Task;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::query::TaskListParams;
use crate::response::{MessageResponse, PageResponse};
use crate::services::task::TaskDraft;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for creating or editing a task.
#[derive(Debug, Deserialize)]
pub struct TaskRequest {
    pub name: String,
    pub priority: String,
    pub description: Option<String>,
}

impl From<TaskRequest> for TaskDraft {
    fn from(req: TaskRequest) -> Self {
        Self {
            name: req.name,
            priority: req.priority,
            description: req.description,
        }
    }
}

/// Request body for `PATCH .../tasks/{task_id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub message: &'static str,
    pub task: Task,
}

#[derive(Debug, Serialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
}

/// Parse `collectionId` then `taskId`, before the body or anything else is
/// looked at.
fn parse_task_path(collection_id: &str, task_id: &str) -> AppResult<(DbId, DbId)> {
    let collection_id = parse_db_id(collection_id, "collectionId")?;
    let task_id = parse_db_id(task_id, "taskId")?;
    Ok((collection_id, task_id))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/collections/{collection_id}/tasks
pub async fn create_task(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(collection_id): AppPath<String>,
    body: Result<AppJson<TaskRequest>, AppError>,
) -> AppResult<(StatusCode, Json<TaskResponse>)> {
    let collection_id = parse_db_id(&collection_id, "collectionId")?;
    let AppJson(input) = body?;
    let task = state
        .tasks
        .create(auth.user_id, collection_id, input.into())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            message: "Task created successfully",
            task,
        }),
    ))
}

/// GET /api/v1/collections/{collection_id}/tasks
///
/// Query: `page`, `limit`, `sort` (`createdAt` | `updatedAt` | `priority`),
/// repeated `statuses[]`.
pub async fn list_tasks(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(collection_id): AppPath<String>,
    AppQuery(params): AppQuery<TaskListParams>,
) -> AppResult<Json<PageResponse<TaskList>>> {
    let collection_id = parse_db_id(&collection_id, "collectionId")?;
    let query = params.into_query()?;

    let page = state.tasks.list(auth.user_id, collection_id, query).await?;
    Ok(Json(PageResponse::from_page(page, |tasks| TaskList { tasks })))
}

/// DELETE /api/v1/collections/{collection_id}/tasks/{task_id}
pub async fn delete_task(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath((collection_id, task_id)): AppPath<(String, String)>,
) -> AppResult<Json<MessageResponse>> {
    let (collection_id, task_id) = parse_task_path(&collection_id, &task_id)?;
    state
        .tasks
        .delete(auth.user_id, collection_id, task_id)
        .await?;
    Ok(Json(MessageResponse::new("Task deleted successfully")))
}

/// PUT /api/v1/collections/{collection_id}/tasks/{task_id}
pub async fn edit_task(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath((collection_id, task_id)): AppPath<(String, String)>,
    body: Result<AppJson<TaskRequest>, AppError>,
) -> AppResult<Json<TaskResponse>> {
    let (collection_id, task_id) = parse_task_path(&collection_id, &task_id)?;
    let AppJson(input) = body?;
    let task = state
        .tasks
        .edit(auth.user_id, collection_id, task_id, input.into())
        .await?;
    Ok(Json(TaskResponse {
        message: "Task edited successfully",
        task,
    }))
}

/// PATCH /api/v1/collections/{collection_id}/tasks/{task_id}/status
pub async fn change_task_status(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath((collection_id, task_id)): AppPath<(String, String)>,
    body: Result<AppJson<StatusRequest>, AppError>,
) -> AppResult<Json<TaskResponse>> {
    let (collection_id, task_id) = parse_task_path(&collection_id, &task_id)?;
    let AppJson(input) = body?;
    let task = state
        .tasks
        .change_status(auth.user_id, collection_id, task_id, &input.status)
        .await?;
    Ok(Json(TaskResponse {
        message: "Task status changed successfully",
        task,
    }))
}
