use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{hole, score, session, shared::AppState};

/// Builds the HTTP API over the shared application state
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/scoring-modes", get(score::list_scoring_modes))
        .route(
            "/sessions",
            post(session::start_session).get(session::list_sessions),
        )
        .route("/sessions/join", post(session::join_session))
        .route(
            "/sessions/:id",
            get(session::get_session).delete(session::cancel_session),
        )
        .route("/sessions/:id/validate", post(session::validate_session))
        .route("/sessions/:id/join-token", get(session::get_join_token))
        .route(
            "/sessions/:id/holes",
            post(hole::add_played_hole).get(hole::list_played_holes),
        )
        .route("/sessions/:id/standings", get(score::get_standings))
        .route("/sessions/:id/events", get(session::session_events))
        .route("/holes/:id", delete(hole::delete_played_hole))
        .route("/holes/:id/scores", get(score::list_hole_scores))
        .route("/holes/:id/scores/:team_id", put(score::submit_score))
        .layer(TraceLayer::new_for_http())
        // scoreboards are served from other origins
        .layer(CorsLayer::permissive())
        .with_state(state)
}
