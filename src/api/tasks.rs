//! Task endpoints.

use super::AppState;
use crate::error::{ApiError, ApiResult};
use crate::service::TaskQuery;
use crate::types::{
    Priority, SortDirection, SortKey, Task, TaskCreate, TaskListResponse, TaskPatch, TaskStatus,
};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

/// Raw query parameters for task listing; validated into a [`TaskQuery`].
#[derive(Debug, Default, Deserialize)]
pub struct TaskListParams {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub project: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

fn parse_list_params(params: TaskListParams) -> ApiResult<TaskQuery> {
    let mut query = TaskQuery {
        project: params.project,
        ..TaskQuery::default()
    };

    if let Some(ref s) = params.status {
        query.status = Some(
            TaskStatus::from_str(s)
                .ok_or_else(|| ApiError::invalid_value("status", "must be active or completed"))?,
        );
    }
    if let Some(ref s) = params.priority {
        query.priority = Some(
            Priority::from_str(s)
                .ok_or_else(|| ApiError::invalid_value("priority", "must be low, medium or high"))?,
        );
    }
    if let Some(ref s) = params.sort_by {
        query.sort_by = Some(SortKey::from_str(s).ok_or_else(|| {
            ApiError::invalid_value("sort_by", "must be priority, due_date or created")
        })?);
    }
    if let Some(ref s) = params.order {
        query.order = Some(
            SortDirection::from_str(s)
                .ok_or_else(|| ApiError::invalid_value("order", "must be asc or desc"))?,
        );
    }

    Ok(query)
}

/// `GET /api/v1/tasks`
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<TaskListParams>,
) -> ApiResult<Json<TaskListResponse>> {
    let query = parse_list_params(params)?;
    let tasks = state.services.tasks.list(&query);
    Ok(Json(TaskListResponse {
        count: tasks.len(),
        tasks,
    }))
}

/// `GET /api/v1/tasks/{id}`
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    Ok(Json(state.services.tasks.get(&id)?))
}

/// `POST /api/v1/tasks`
pub async fn create_task(
    State(state): State<AppState>,
    Json(input): Json<TaskCreate>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = state.services.tasks.create(input)?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// `PUT /api/v1/tasks/{id}`
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> ApiResult<Json<Task>> {
    Ok(Json(state.services.tasks.update(&id, patch)?))
}

/// `DELETE /api/v1/tasks/{id}`
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.services.tasks.delete(&id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::task_not_found(&id))
    }
}

/// `POST /api/v1/tasks/{id}/toggle`
pub async fn toggle_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    Ok(Json(state.services.tasks.toggle(&id)?))
}

/// Query parameter for the status endpoint.
#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub status: Option<String>,
}

/// `PATCH /api/v1/tasks/{id}/status?status=...`
pub async fn set_task_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<StatusParams>,
) -> ApiResult<Json<Task>> {
    let raw = params.status.ok_or_else(|| ApiError::missing_field("status"))?;
    let status = TaskStatus::from_str(&raw)
        .ok_or_else(|| ApiError::invalid_value("status", "must be active or completed"))?;
    Ok(Json(state.services.tasks.set_status(&id, status)?))
}
