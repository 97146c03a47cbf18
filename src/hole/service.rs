use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::{NewPlayedHole, PlayedHoleDeletion, PlayedHoleModel},
    repository::PlayedHoleRepository,
};
use crate::event::{EventBus, SessionEvent};
use crate::session::repository::SessionRepository;
use crate::shared::AppError;

/// Service for adding and removing played holes
pub struct HoleService {
    sessions: Arc<dyn SessionRepository>,
    holes: Arc<dyn PlayedHoleRepository>,
    event_bus: EventBus,
}

impl HoleService {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        holes: Arc<dyn PlayedHoleRepository>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            sessions,
            holes,
            event_bus,
        }
    }

    /// Appends a hole at the next unused position of an ongoing session
    #[instrument(skip(self, hole), fields(hole_id = hole.hole_id))]
    pub async fn add_played_hole(
        &self,
        session_id: i64,
        hole: NewPlayedHole,
    ) -> Result<PlayedHoleModel, AppError> {
        let played_hole = self
            .holes
            .add_played_hole(session_id, &hole)
            .await
            .inspect_err(|error| warn!(%error, "Played hole rejected"))?;

        info!(
            session_id,
            played_hole_id = played_hole.id,
            position = played_hole.position,
            "Played hole added"
        );

        self.event_bus
            .emit(SessionEvent::HoleAdded {
                session_id,
                played_hole_id: played_hole.id,
                position: played_hole.position,
            })
            .await;

        Ok(played_hole)
    }

    /// Removes a hole and its score records; remaining positions are unchanged
    #[instrument(skip(self))]
    pub async fn delete_played_hole(
        &self,
        played_hole_id: i64,
    ) -> Result<PlayedHoleDeletion, AppError> {
        let deletion = self
            .holes
            .delete_played_hole(played_hole_id)
            .await
            .inspect_err(|error| warn!(%error, "Played hole deletion rejected"))?;

        info!(
            session_id = deletion.session_id,
            played_hole_id,
            scores_removed = deletion.scores_removed,
            "Played hole deleted"
        );

        self.event_bus
            .emit(SessionEvent::HoleDeleted {
                session_id: deletion.session_id,
                played_hole_id,
            })
            .await;

        Ok(deletion)
    }

    #[instrument(skip(self))]
    pub async fn list_played_holes(
        &self,
        session_id: i64,
    ) -> Result<Vec<PlayedHoleModel>, AppError> {
        if self.sessions.get_session(session_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Session {} not found",
                session_id
            )));
        }

        self.holes.list_played_holes(session_id).await
    }
}
