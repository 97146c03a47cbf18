use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::models::{CascadeReport, NewSession, NewTeam, SessionFilter, SessionModel, TeamModel};
use crate::shared::AppError;

/// Trait for session and team storage.
///
/// Lifecycle checks happen inside the storage critical section (row lock or
/// store mutex), so a concurrent close cannot slip between check and write.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Atomically persists an ongoing session and its initial teams.
    /// Fails with `Conflict` when the game zone already has an ongoing session.
    async fn start_session(
        &self,
        session: &NewSession,
        teams: &[NewTeam],
    ) -> Result<(SessionModel, Vec<TeamModel>), AppError>;

    async fn get_session(&self, session_id: i64) -> Result<Option<SessionModel>, AppError>;

    /// Newest first
    async fn list_sessions(&self, filter: &SessionFilter) -> Result<Vec<SessionModel>, AppError>;

    /// Ordered by team id
    async fn list_teams(&self, session_id: i64) -> Result<Vec<TeamModel>, AppError>;

    /// Fails with `Validation` when one of the players already sits in a team
    /// of this session.
    async fn add_team(&self, session_id: i64, team: &NewTeam) -> Result<TeamModel, AppError>;

    /// Closes an ongoing session, stamping its end time
    async fn validate_session(
        &self,
        session_id: i64,
        ended_at: DateTime<Utc>,
    ) -> Result<SessionModel, AppError>;

    /// Removes score records, played holes, teams and the session in one atomic step
    async fn delete_session(&self, session_id: i64) -> Result<CascadeReport, AppError>;
}
