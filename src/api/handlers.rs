use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{error::AppResult, models::WatchingStatus};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct SeriesPath {
    pub user_id: i64,
    pub series_id: i64,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub user_id: i64,
    pub series_id: i64,
    pub status: WatchingStatus,
}

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Current status derived from live episode progress
pub async fn get_status(
    State(state): State<AppState>,
    Path(path): Path<SeriesPath>,
) -> AppResult<Json<StatusResponse>> {
    let status = state
        .status_service
        .get_status(path.user_id, path.series_id)
        .await?;

    Ok(Json(StatusResponse {
        user_id: path.user_id,
        series_id: path.series_id,
        status,
    }))
}

/// Refreshes the persisted status after episodes were marked or unmarked
pub async fn update_status(
    State(state): State<AppState>,
    Path(path): Path<SeriesPath>,
) -> AppResult<Json<StatusResponse>> {
    let status = state
        .status_service
        .update_status(path.user_id, path.series_id)
        .await?;

    Ok(Json(StatusResponse {
        user_id: path.user_id,
        series_id: path.series_id,
        status,
    }))
}

/// Answers 204 when the user may review the series
pub async fn review_eligibility(
    State(state): State<AppState>,
    Path(path): Path<SeriesPath>,
) -> AppResult<StatusCode> {
    state
        .status_service
        .validate_review_creation(path.user_id, path.series_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
