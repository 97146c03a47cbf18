use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::models::{NewPlayedHole, PlayedHoleDeletion, PlayedHoleModel};
use crate::shared::{AppError, AppState};

/// HTTP handler for adding a played hole to a session
///
/// POST /sessions/:id/holes
/// Returns the hole with its assigned position
#[instrument(name = "add_played_hole", skip(state, request))]
pub async fn add_played_hole(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Json(request): Json<NewPlayedHole>,
) -> Result<(StatusCode, Json<PlayedHoleModel>), AppError> {
    let played_hole = state
        .hole_service
        .add_played_hole(session_id, request)
        .await?;

    info!(
        played_hole_id = played_hole.id,
        position = played_hole.position,
        "Played hole created"
    );
    Ok((StatusCode::CREATED, Json(played_hole)))
}

/// GET /sessions/:id/holes
#[instrument(name = "list_played_holes", skip(state))]
pub async fn list_played_holes(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> Result<Json<Vec<PlayedHoleModel>>, AppError> {
    let holes = state.hole_service.list_played_holes(session_id).await?;
    Ok(Json(holes))
}

/// DELETE /holes/:id
#[instrument(name = "delete_played_hole", skip(state))]
pub async fn delete_played_hole(
    State(state): State<AppState>,
    Path(played_hole_id): Path<i64>,
) -> Result<Json<PlayedHoleDeletion>, AppError> {
    let deletion = state.hole_service.delete_played_hole(played_hole_id).await?;
    Ok(Json(deletion))
}
