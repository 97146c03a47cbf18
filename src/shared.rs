use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::config::AppConfig;
use crate::event::EventBus;
use crate::hole::service::HoleService;
use crate::score::service::ScoreService;
use crate::scoring::ScoringError;
use crate::session::{service::SessionService, JoinTokenError};
use crate::storage::Repositories;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<SessionService>,
    pub hole_service: Arc<HoleService>,
    pub score_service: Arc<ScoreService>,
    pub event_bus: EventBus,
}

impl AppState {
    pub fn new(repositories: Repositories, config: &AppConfig) -> Self {
        let event_bus = EventBus::new(config.event_channel_capacity);

        let session_service = SessionService::new(
            Arc::clone(&repositories.sessions),
            Arc::clone(&repositories.holes),
            config.join_token_prefix.clone(),
            event_bus.clone(),
        );
        let hole_service = HoleService::new(
            Arc::clone(&repositories.sessions),
            Arc::clone(&repositories.holes),
            event_bus.clone(),
        );
        let score_service = ScoreService::new(
            Arc::clone(&repositories.holes),
            Arc::clone(&repositories.scores),
            event_bus.clone(),
        );

        Self {
            session_service: Arc::new(session_service),
            hole_service: Arc::new(hole_service),
            score_service: Arc::new(score_service),
            event_bus,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<JoinTokenError> for AppError {
    fn from(error: JoinTokenError) -> Self {
        AppError::Validation(error.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::InvalidStateTransition(msg) => (StatusCode::CONFLICT, msg),
            AppError::Scoring(err @ ScoringError::UnknownScoringMode(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            AppError::Scoring(err @ ScoringError::DuplicateSubmission { .. }) => {
                (StatusCode::CONFLICT, err.to_string())
            }
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
