//! Project endpoints.

use super::AppState;
use crate::error::{ApiError, ApiResult};
use crate::types::{Project, ProjectCreate};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

/// `GET /api/v1/projects`
pub async fn list_projects(State(state): State<AppState>) -> Json<Vec<Project>> {
    Json(state.services.projects.list())
}

/// `GET /api/v1/projects/{name}`
pub async fn get_project(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Project>> {
    Ok(Json(state.services.projects.get(&name)?))
}

/// `POST /api/v1/projects`
pub async fn create_project(
    State(state): State<AppState>,
    Json(input): Json<ProjectCreate>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let project = state.services.projects.create(input)?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// `DELETE /api/v1/projects/{name}`
pub async fn delete_project(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    if state.services.projects.delete(&name)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::project_not_found(&name))
    }
}
