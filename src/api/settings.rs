//! Settings endpoints.

use super::AppState;
use crate::error::ApiResult;
use crate::types::{Settings, SettingsPatch};
use axum::extract::State;
use axum::Json;

/// `GET /api/v1/settings`
pub async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    Json(state.services.settings.get())
}

/// `PUT /api/v1/settings`
pub async fn put_settings(
    State(state): State<AppState>,
    Json(settings): Json<Settings>,
) -> ApiResult<Json<Settings>> {
    Ok(Json(state.services.settings.update(settings)?))
}

/// `PATCH /api/v1/settings`
pub async fn patch_settings(
    State(state): State<AppState>,
    Json(patch): Json<SettingsPatch>,
) -> ApiResult<Json<Settings>> {
    Ok(Json(state.services.settings.patch(patch)?))
}
