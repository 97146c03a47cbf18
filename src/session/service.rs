use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    lifecycle::{SessionAction, SessionStatus},
    models::{NewSession, NewTeam, SessionFilter, SessionModel, SessionType},
    repository::SessionRepository,
    token::JoinTokenConfig,
    types::{
        JoinSessionRequest, JoinSessionResponse, JoinTokenResponse, SessionDeletedResponse,
        SessionDetailResponse, StartSessionRequest, StartSessionResponse,
    },
};
use crate::event::{EventBus, SessionEvent};
use crate::hole::repository::PlayedHoleRepository;
use crate::scoring::ScoringMode;
use crate::shared::AppError;

/// Checks new teams against the session type and against each other.
/// Players already seated are checked by the store when a team is added.
fn validate_roster(session_type: SessionType, incoming: &[NewTeam]) -> Result<(), AppError> {
    if session_type == SessionType::Individual && incoming.iter().any(|team| !team.is_solo()) {
        return Err(AppError::Validation(
            "Individual sessions only accept solo teams".to_string(),
        ));
    }

    let mut players = HashSet::new();
    for player_id in incoming.iter().flat_map(|team| team.player_ids()) {
        if !players.insert(player_id) {
            return Err(AppError::Validation(format!(
                "Player {} is already in a team of this session",
                player_id
            )));
        }
    }

    Ok(())
}

/// Service for the session lifecycle: start, join, close and cancel
pub struct SessionService {
    sessions: Arc<dyn SessionRepository>,
    holes: Arc<dyn PlayedHoleRepository>,
    join_tokens: JoinTokenConfig,
    event_bus: EventBus,
}

impl SessionService {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        holes: Arc<dyn PlayedHoleRepository>,
        join_token_prefix: String,
        event_bus: EventBus,
    ) -> Self {
        Self {
            sessions,
            holes,
            join_tokens: JoinTokenConfig::new(join_token_prefix),
            event_bus,
        }
    }

    /// Starts an ongoing session with its initial teams
    #[instrument(skip(self, request), fields(game_zone_id = request.game_zone_id))]
    pub async fn start_session(
        &self,
        request: StartSessionRequest,
    ) -> Result<StartSessionResponse, AppError> {
        let mode = ScoringMode::try_from(request.scoring_mode_id)?;

        if request.teams.is_empty() {
            return Err(AppError::Validation(
                "A session needs at least one team".to_string(),
            ));
        }
        let teams = request
            .teams
            .iter()
            .map(|players| NewTeam::from_players(players))
            .collect::<Result<Vec<_>, _>>()?;
        validate_roster(request.session_type, &teams)?;

        let new_session = NewSession {
            game_zone_id: request.game_zone_id,
            session_type: request.session_type,
            scoring_mode_id: mode.id(),
            start_date_time: request.start_date_time.unwrap_or_else(Utc::now),
            comment: request.comment,
            weather: request.weather,
        };

        let (session, teams) = self.sessions.start_session(&new_session, &teams).await?;

        info!(
            session_id = session.id,
            scoring_mode = %mode,
            teams = teams.len(),
            "Session started"
        );

        self.event_bus
            .emit(SessionEvent::SessionStarted {
                session_id: session.id,
                game_zone_id: session.game_zone_id,
                team_ids: teams.iter().map(|team| team.id).collect(),
            })
            .await;

        Ok(StartSessionResponse { session, teams })
    }

    #[instrument(skip(self))]
    pub async fn get_session(&self, session_id: i64) -> Result<SessionModel, AppError> {
        self.sessions
            .get_session(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", session_id)))
    }

    /// Session with its teams and played holes ordered by position
    #[instrument(skip(self))]
    pub async fn get_session_detail(
        &self,
        session_id: i64,
    ) -> Result<SessionDetailResponse, AppError> {
        let session = self.get_session(session_id).await?;
        let teams = self.sessions.list_teams(session_id).await?;
        let played_holes = self.holes.list_played_holes(session_id).await?;

        Ok(SessionDetailResponse {
            status: session.status(),
            session,
            teams,
            played_holes,
        })
    }

    /// Session history, newest first
    #[instrument(skip(self))]
    pub async fn list_sessions(&self, filter: &SessionFilter) -> Result<Vec<SessionModel>, AppError> {
        self.sessions.list_sessions(filter).await
    }

    /// Closes an ongoing session; it becomes read-only history
    #[instrument(skip(self))]
    pub async fn validate_session(&self, session_id: i64) -> Result<SessionModel, AppError> {
        let session = self
            .sessions
            .validate_session(session_id, Utc::now())
            .await
            .inspect_err(|error| warn!(%error, "Session could not be closed"))?;

        info!(session_id, "Session closed");
        self.event_bus
            .emit(SessionEvent::SessionValidated { session_id })
            .await;
        self.event_bus.close(session_id).await;

        Ok(session)
    }

    /// Cancels an ongoing session, removing it and everything it owns
    #[instrument(skip(self))]
    pub async fn cancel_session(
        &self,
        session_id: i64,
    ) -> Result<SessionDeletedResponse, AppError> {
        let removed = self
            .sessions
            .delete_session(session_id)
            .await
            .inspect_err(|error| warn!(%error, "Session could not be cancelled"))?;

        info!(
            session_id,
            scores_removed = removed.scores_removed,
            holes_removed = removed.holes_removed,
            teams_removed = removed.teams_removed,
            "Session cancelled"
        );

        self.event_bus
            .emit(SessionEvent::SessionDeleted { session_id })
            .await;
        self.event_bus.close(session_id).await;

        Ok(SessionDeletedResponse {
            session_id,
            removed,
        })
    }

    /// Join token for an ongoing session
    #[instrument(skip(self))]
    pub async fn join_token(&self, session_id: i64) -> Result<JoinTokenResponse, AppError> {
        let session = self.get_session(session_id).await?;
        SessionStatus::ensure_allowed(&session, SessionAction::AddTeam)?;

        Ok(JoinTokenResponse {
            session_id,
            token: self.join_tokens.issue(session_id),
        })
    }

    /// Adds a team to the session named by a join token
    #[instrument(skip(self, request))]
    pub async fn join_session(
        &self,
        request: JoinSessionRequest,
    ) -> Result<JoinSessionResponse, AppError> {
        let session_id = self
            .join_tokens
            .parse(&request.token)
            .inspect_err(|error| warn!(%error, "Rejected join token"))?;

        let session = self.get_session(session_id).await?;
        SessionStatus::ensure_allowed(&session, SessionAction::AddTeam)?;

        let team = NewTeam::from_players(&request.player_ids)?;
        validate_roster(session.session_type, &[team])?;

        let team = self.sessions.add_team(session_id, &team).await?;

        info!(session_id, team_id = team.id, "Team joined session");
        self.event_bus
            .emit(SessionEvent::TeamJoined {
                session_id,
                team_id: team.id,
            })
            .await;

        Ok(JoinSessionResponse { session_id, team })
    }
}
