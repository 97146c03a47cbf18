use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::{stream, Stream};
use std::convert::Infallible;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, instrument, warn};

use super::{
    models::{SessionFilter, SessionModel},
    types::{
        JoinSessionRequest, JoinSessionResponse, JoinTokenResponse, SessionDeletedResponse,
        SessionDetailResponse, StartSessionRequest, StartSessionResponse,
    },
};
use crate::shared::{AppError, AppState};

/// HTTP handler for starting a session
///
/// POST /sessions
/// Fails with 409 when the game zone already has an ongoing session
#[instrument(name = "start_session", skip(state, request), fields(game_zone_id = request.game_zone_id))]
pub async fn start_session(
    State(state): State<AppState>,
    Json(request): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<StartSessionResponse>), AppError> {
    info!(teams = request.teams.len(), "Starting session");

    let started = state.session_service.start_session(request).await?;

    info!(session_id = started.session.id, "Session created successfully");
    Ok((StatusCode::CREATED, Json(started)))
}

/// HTTP handler for session history
///
/// GET /sessions?ongoing=false&game_zone_id=3
#[instrument(name = "list_sessions", skip(state))]
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(filter): Query<SessionFilter>,
) -> Result<Json<Vec<SessionModel>>, AppError> {
    let sessions = state.session_service.list_sessions(&filter).await?;

    info!(session_count = sessions.len(), "Sessions listed successfully");
    Ok(Json(sessions))
}

/// GET /sessions/:id
#[instrument(name = "get_session", skip(state))]
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> Result<Json<SessionDetailResponse>, AppError> {
    let detail = state.session_service.get_session_detail(session_id).await?;
    Ok(Json(detail))
}

/// HTTP handler for closing a session
///
/// POST /sessions/:id/validate
/// The session becomes read-only history
#[instrument(name = "validate_session", skip(state))]
pub async fn validate_session(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> Result<Json<SessionModel>, AppError> {
    let session = state.session_service.validate_session(session_id).await?;
    Ok(Json(session))
}

/// HTTP handler for cancelling a session
///
/// DELETE /sessions/:id
/// Removes the session with its teams, played holes and scores
#[instrument(name = "cancel_session", skip(state))]
pub async fn cancel_session(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> Result<Json<SessionDeletedResponse>, AppError> {
    let deleted = state.session_service.cancel_session(session_id).await?;
    Ok(Json(deleted))
}

/// GET /sessions/:id/join-token
#[instrument(name = "get_join_token", skip(state))]
pub async fn get_join_token(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> Result<Json<JoinTokenResponse>, AppError> {
    let token = state.session_service.join_token(session_id).await?;
    Ok(Json(token))
}

/// HTTP handler for joining a session with a scanned token
///
/// POST /sessions/join
#[instrument(name = "join_session", skip(state, request))]
pub async fn join_session(
    State(state): State<AppState>,
    Json(request): Json<JoinSessionRequest>,
) -> Result<(StatusCode, Json<JoinSessionResponse>), AppError> {
    let joined = state.session_service.join_session(request).await?;

    info!(
        session_id = joined.session_id,
        team_id = joined.team.id,
        "Team joined successfully"
    );
    Ok((StatusCode::CREATED, Json(joined)))
}

/// HTTP handler streaming a session's change notifications as server-sent events
///
/// GET /sessions/:id/events
/// The stream ends when the session is cancelled
#[instrument(name = "session_events", skip(state))]
pub async fn session_events(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    state.session_service.get_session(session_id).await?;

    let receiver = state.event_bus.subscribe(session_id).await;
    debug!(session_id, "Event stream opened");

    let events = stream::unfold(receiver, move |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => match Event::default().event(event.event_type()).json_data(&event) {
                    Ok(sse_event) => return Some((Ok(sse_event), receiver)),
                    Err(error) => warn!(%error, session_id, "Failed to encode session event"),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, session_id, "Event stream lagged, events skipped");
                }
                Err(RecvError::Closed) => {
                    debug!(session_id, "Event stream closed");
                    return None;
                }
            }
        }
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
