use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::models::SessionModel;
use crate::shared::AppError;

/// Lifecycle state of a scoring session.
///
/// `Draft` only exists on clients while a session is being configured, and a
/// `Deleted` session has no row left; both are modelled so that every
/// transition goes through [`SessionStatus::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionStatus {
    Draft,
    Ongoing,
    Completed,
    Deleted,
}

/// Operations that touch a session or anything it owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SessionAction {
    Start,
    AddTeam,
    AddPlayedHole,
    DeletePlayedHole,
    SubmitScore,
    Validate,
    Cancel,
}

impl SessionStatus {
    /// Status of a persisted session
    pub fn of(session: &SessionModel) -> Self {
        if session.is_ongoing {
            SessionStatus::Ongoing
        } else {
            SessionStatus::Completed
        }
    }

    /// Returns the state reached by `action`, or `InvalidStateTransition` when the
    /// action is not allowed from this state.
    pub fn apply(self, action: SessionAction) -> Result<SessionStatus, AppError> {
        use SessionAction::*;
        use SessionStatus::*;

        match (self, action) {
            (Draft, Start) => Ok(Ongoing),
            (Ongoing, AddTeam | AddPlayedHole | DeletePlayedHole | SubmitScore) => Ok(Ongoing),
            (Ongoing, Validate) => Ok(Completed),
            (Ongoing, Cancel) => Ok(Deleted),
            (status, action) => Err(AppError::InvalidStateTransition(format!(
                "cannot {} a session that is {}",
                action, status
            ))),
        }
    }

    /// Checks `action` against a persisted session
    pub fn ensure_allowed(session: &SessionModel, action: SessionAction) -> Result<(), AppError> {
        SessionStatus::of(session)
            .apply(action)
            .map(|_| ())
            .map_err(|error| match error {
                AppError::InvalidStateTransition(reason) => AppError::InvalidStateTransition(
                    format!("session {}: {}", session.id, reason),
                ),
                other => other,
            })
    }
}
