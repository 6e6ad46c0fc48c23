//! Dashboard task board (admin only)

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use shared::error::AppError;
use shared::models::{Task, TaskBoard, TaskDraft, TaskField};
use shared::util::{non_blank, record_id};

use super::require_admin;
use crate::error::ServiceResult;
use crate::kv::{Binding, DASHBOARD_TASKS};
use crate::state::AppState;

const DEFAULT_OWNER: &str = "tech";

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/tasks",
        get(list).post(create).put(update).delete(remove),
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminQuery {
    pub admin_password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub admin_password: Option<String>,
    pub task_id: Option<String>,
    pub field: Option<String>,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub admin_password: Option<String>,
    pub phase_index: Option<i64>,
    pub task: Option<TaskDraft>,
    pub parent_task_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskIdRequest {
    pub admin_password: Option<String>,
    pub task_id: Option<String>,
}

/// Load the board, writing the seed board on first use
async fn load_or_seed(state: &AppState) -> ServiceResult<TaskBoard> {
    if let Some(board) = state.docs.load::<TaskBoard>(DASHBOARD_TASKS).await? {
        return Ok(board);
    }
    let board = state.seeds.tasks.clone();
    state.docs.save(DASHBOARD_TASKS, &board).await?;
    tracing::info!(phases = board.phases.len(), "Task board initialized");
    Ok(board)
}

/// GET /api/tasks?adminPassword=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> ServiceResult<Json<Value>> {
    require_admin(&state, query.admin_password.as_deref())?;

    if !state.docs.is_bound(Binding::Board) {
        return Ok(Json(json!({ "error": "KV not configured", "phases": [] })));
    }

    let board = load_or_seed(&state).await?;
    Ok(Json(json!(board)))
}

/// PUT /api/tasks
pub async fn update(
    State(state): State<AppState>,
    Json(req): Json<UpdateTaskRequest>,
) -> ServiceResult<Json<Value>> {
    state.docs.ensure_bound(Binding::Board)?;
    require_admin(&state, req.admin_password.as_deref())?;

    let (Some(task_id), Some(field)) = (
        non_blank(req.task_id.as_deref()),
        non_blank(req.field.as_deref()),
    ) else {
        return Err(AppError::validation("Missing taskId or field").into());
    };

    let mut board = load_or_seed(&state).await?;
    let task = board
        .find_mut(task_id)
        .ok_or_else(|| AppError::not_found("Task"))?;

    let field = TaskField::parse(field).ok_or_else(|| AppError::validation("Invalid field"))?;
    if !field.apply(task, &req.value) {
        return Err(AppError::validation("Invalid value for field")
            .with_detail("field", req.field.clone().unwrap_or_default())
            .into());
    }
    let task = task.clone();

    state.docs.save(DASHBOARD_TASKS, &board).await?;
    tracing::debug!(task_id = %task.id, "Task updated");

    Ok(Json(json!({ "success": true, "task": task })))
}

/// POST /api/tasks
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> ServiceResult<(StatusCode, Json<Value>)> {
    state.docs.ensure_bound(Binding::Board)?;
    require_admin(&state, req.admin_password.as_deref())?;

    let draft = req.task.as_ref();
    let text = draft.and_then(|t| non_blank(t.text.as_deref()));
    let (Some(phase_index), Some(draft), Some(text)) = (req.phase_index, draft, text) else {
        return Err(AppError::validation("Missing phaseIndex or task data").into());
    };

    let mut board = load_or_seed(&state).await?;
    let phase = usize::try_from(phase_index)
        .ok()
        .filter(|i| *i < board.phases.len())
        .ok_or_else(|| AppError::validation("Invalid phase index"))?;

    let mut task = Task {
        id: record_id(Some("task")),
        text: text.to_string(),
        owner: non_blank(draft.owner.as_deref())
            .unwrap_or(DEFAULT_OWNER)
            .to_string(),
        done: draft.done.unwrap_or(false),
        subtasks: None,
    };

    match non_blank(req.parent_task_id.as_deref()) {
        Some(parent_id) => {
            let parent = board
                .find_mut(parent_id)
                .ok_or_else(|| AppError::not_found("Parent task"))?;
            task.id = record_id(Some("sub"));
            parent.subtasks.get_or_insert_with(Vec::new).push(task.clone());
        }
        None => board.phases[phase].tasks.push(task.clone()),
    }

    state.docs.save(DASHBOARD_TASKS, &board).await?;
    tracing::debug!(task_id = %task.id, "Task added");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "task": task })),
    ))
}

/// DELETE /api/tasks
pub async fn remove(
    State(state): State<AppState>,
    Json(req): Json<TaskIdRequest>,
) -> ServiceResult<Json<Value>> {
    state.docs.ensure_bound(Binding::Board)?;
    require_admin(&state, req.admin_password.as_deref())?;

    let task_id =
        non_blank(req.task_id.as_deref()).ok_or_else(|| AppError::validation("Missing taskId"))?;

    let mut board = load_or_seed(&state).await?;
    if board.remove(task_id).is_none() {
        return Err(AppError::not_found("Task").into());
    }

    state.docs.save(DASHBOARD_TASKS, &board).await?;
    tracing::debug!(task_id = %task_id, "Task deleted");

    Ok(Json(json!({ "success": true, "message": "Task deleted" })))
}
