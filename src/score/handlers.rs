use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use super::{
    models::ScoreRecordModel,
    types::{ScoringModeResponse, SubmitScoreRequest},
};
use crate::scoring::{ScoringMode, Standings};
use crate::shared::{AppError, AppState};

/// HTTP handler for the scoring mode catalog
///
/// GET /scoring-modes
#[instrument(name = "list_scoring_modes")]
pub async fn list_scoring_modes() -> Json<Vec<ScoringModeResponse>> {
    Json(
        ScoringMode::catalog()
            .into_iter()
            .map(ScoringModeResponse::from)
            .collect(),
    )
}

/// HTTP handler for submitting a team's strokes on a played hole
///
/// PUT /holes/:id/scores/:team_id
/// Resubmitting replaces the stored strokes
#[instrument(name = "submit_score", skip(state, request))]
pub async fn submit_score(
    State(state): State<AppState>,
    Path((played_hole_id, team_id)): Path<(i64, i64)>,
    Json(request): Json<SubmitScoreRequest>,
) -> Result<Json<ScoreRecordModel>, AppError> {
    let strokes = request.strokes()?;

    let record = state
        .score_service
        .submit_score(played_hole_id, team_id, strokes)
        .await?;

    info!(record_id = record.id, strokes, "Score stored");
    Ok(Json(record))
}

/// HTTP handler for the score records of one played hole
///
/// GET /holes/:id/scores
#[instrument(name = "list_hole_scores", skip(state))]
pub async fn list_hole_scores(
    State(state): State<AppState>,
    Path(played_hole_id): Path<i64>,
) -> Result<Json<Vec<ScoreRecordModel>>, AppError> {
    let scores = state.score_service.list_hole_scores(played_hole_id).await?;
    Ok(Json(scores))
}

/// HTTP handler for the live standings of a session
///
/// GET /sessions/:id/standings
#[instrument(name = "get_standings", skip(state))]
pub async fn get_standings(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> Result<Json<Standings>, AppError> {
    let standings = state.score_service.compute_standings(session_id).await?;

    info!(
        entries = standings.entries.len(),
        has_missing_scores = standings.has_missing_scores,
        "Standings served"
    );
    Ok(Json(standings))
}
