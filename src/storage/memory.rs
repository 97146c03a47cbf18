use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument, warn};

use crate::hole::models::{NewPlayedHole, PlayedHoleDeletion, PlayedHoleModel};
use crate::hole::repository::PlayedHoleRepository;
use crate::score::models::{ScoreRecordModel, ScoreSubmission, Scorecard};
use crate::score::repository::ScoreRepository;
use crate::session::lifecycle::{SessionAction, SessionStatus};
use crate::session::models::{
    CascadeReport, NewSession, NewTeam, SessionFilter, SessionModel, TeamModel,
};
use crate::session::repository::SessionRepository;
use crate::shared::AppError;

#[derive(Debug, Default)]
struct Sequences {
    session: i64,
    team: i64,
    played_hole: i64,
    score: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[derive(Debug, Default)]
struct Tables {
    sessions: BTreeMap<i64, SessionModel>,
    teams: BTreeMap<i64, TeamModel>,
    played_holes: BTreeMap<i64, PlayedHoleModel>,
    /// Highest hole position ever handed out, per session
    last_positions: HashMap<i64, i32>,
    /// Keyed by the unique (played_hole_id, team_id) pair
    scores: BTreeMap<(i64, i64), ScoreRecordModel>,
    sequences: Sequences,
}

impl Tables {
    fn session(&self, session_id: i64) -> Result<&SessionModel, AppError> {
        self.sessions
            .get(&session_id)
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", session_id)))
    }

    fn played_hole(&self, played_hole_id: i64) -> Result<&PlayedHoleModel, AppError> {
        self.played_holes.get(&played_hole_id).ok_or_else(|| {
            AppError::NotFound(format!("Played hole {} not found", played_hole_id))
        })
    }

    fn teams_of(&self, session_id: i64) -> Vec<TeamModel> {
        self.teams
            .values()
            .filter(|team| team.session_id == session_id)
            .cloned()
            .collect()
    }

    fn holes_of(&self, session_id: i64) -> Vec<PlayedHoleModel> {
        let mut holes: Vec<PlayedHoleModel> = self
            .played_holes
            .values()
            .filter(|hole| hole.session_id == session_id)
            .cloned()
            .collect();
        holes.sort_by_key(|hole| hole.position);
        holes
    }

    fn scores_of(&self, session_id: i64) -> Vec<ScoreRecordModel> {
        let positions: HashMap<i64, i32> = self
            .played_holes
            .values()
            .filter(|hole| hole.session_id == session_id)
            .map(|hole| (hole.id, hole.position))
            .collect();

        let mut scores: Vec<(i32, ScoreRecordModel)> = self
            .scores
            .values()
            .filter_map(|record| {
                positions
                    .get(&record.played_hole_id)
                    .map(|position| (*position, record.clone()))
            })
            .collect();
        scores.sort_by_key(|(position, record)| (*position, record.team_id));

        scores.into_iter().map(|(_, record)| record).collect()
    }

    fn hole_ids(&self, session_id: i64) -> Vec<i64> {
        self.played_holes
            .values()
            .filter(|hole| hole.session_id == session_id)
            .map(|hole| hole.id)
            .collect()
    }
}

/// In-memory implementation of the storage traits for development and testing
///
/// Every operation runs under a single mutex, which gives the same guarantees
/// the PostgreSQL store gets from transactions and constraints: one ongoing
/// session per game zone, one score record per team and hole, and all-or-nothing
/// cascading deletes. Data is lost when the application restarts.
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates a new empty in-memory store
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables.lock().map_err(|_| {
            warn!("In-memory store lock poisoned");
            AppError::DatabaseError("In-memory store is unavailable".to_string())
        })
    }

    /// Returns the current number of score records across all sessions
    pub fn score_count(&self) -> usize {
        self.lock().map(|tables| tables.scores.len()).unwrap_or_default()
    }

    /// Returns the current number of sessions
    pub fn session_count(&self) -> usize {
        self.lock()
            .map(|tables| tables.sessions.len())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    #[instrument(skip(self, session, teams), fields(game_zone_id = session.game_zone_id))]
    async fn start_session(
        &self,
        session: &NewSession,
        teams: &[NewTeam],
    ) -> Result<(SessionModel, Vec<TeamModel>), AppError> {
        let mut guard = self.lock()?;
        let tables = &mut *guard;

        if let Some(existing) = tables
            .sessions
            .values()
            .find(|s| s.is_ongoing && s.game_zone_id == session.game_zone_id)
        {
            warn!(
                existing_session_id = existing.id,
                "Game zone already has an ongoing session"
            );
            return Err(AppError::Conflict(format!(
                "Game zone {} already has ongoing session {}",
                session.game_zone_id, existing.id
            )));
        }

        let session_id = next_id(&mut tables.sequences.session);
        let model = session.clone().into_model(session_id);
        tables.sessions.insert(session_id, model.clone());

        let mut created = Vec::with_capacity(teams.len());
        for team in teams {
            let team_id = next_id(&mut tables.sequences.team);
            let team_model = team.into_model(team_id, session_id);
            tables.teams.insert(team_id, team_model.clone());
            created.push(team_model);
        }

        debug!(
            session_id,
            teams = created.len(),
            "Session started in memory"
        );
        Ok((model, created))
    }

    #[instrument(skip(self))]
    async fn get_session(&self, session_id: i64) -> Result<Option<SessionModel>, AppError> {
        let tables = self.lock()?;
        let session = tables.sessions.get(&session_id).cloned();

        match &session {
            Some(s) => debug!(session_id, is_ongoing = s.is_ongoing, "Session found in memory"),
            None => debug!(session_id, "Session not found in memory"),
        }

        Ok(session)
    }

    #[instrument(skip(self))]
    async fn list_sessions(&self, filter: &SessionFilter) -> Result<Vec<SessionModel>, AppError> {
        let tables = self.lock()?;
        let mut sessions: Vec<SessionModel> = tables
            .sessions
            .values()
            .filter(|session| filter.matches(session))
            .cloned()
            .collect();

        sessions.sort_by(|a, b| {
            b.start_date_time
                .cmp(&a.start_date_time)
                .then(b.id.cmp(&a.id))
        });

        debug!(count = sessions.len(), "Sessions listed from memory");
        Ok(sessions)
    }

    #[instrument(skip(self))]
    async fn list_teams(&self, session_id: i64) -> Result<Vec<TeamModel>, AppError> {
        let tables = self.lock()?;
        Ok(tables.teams_of(session_id))
    }

    #[instrument(skip(self, team))]
    async fn add_team(&self, session_id: i64, team: &NewTeam) -> Result<TeamModel, AppError> {
        let mut guard = self.lock()?;
        let tables = &mut *guard;

        SessionStatus::ensure_allowed(tables.session(session_id)?, SessionAction::AddTeam)?;

        let incoming: Vec<i64> = team.player_ids().collect();
        if let Some(player_id) = tables
            .teams
            .values()
            .filter(|seated| seated.session_id == session_id)
            .flat_map(|seated| seated.player_ids())
            .find(|player_id| incoming.contains(player_id))
        {
            return Err(AppError::Validation(format!(
                "Player {} is already in a team of this session",
                player_id
            )));
        }

        let team_id = next_id(&mut tables.sequences.team);
        let model = team.into_model(team_id, session_id);
        tables.teams.insert(team_id, model.clone());

        debug!(session_id, team_id, "Team added in memory");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn validate_session(
        &self,
        session_id: i64,
        ended_at: DateTime<Utc>,
    ) -> Result<SessionModel, AppError> {
        let mut guard = self.lock()?;
        let session = guard
            .sessions
            .get_mut(&session_id)
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", session_id)))?;

        SessionStatus::ensure_allowed(session, SessionAction::Validate)?;

        session.is_ongoing = false;
        session.end_date_time = Some(ended_at);

        debug!(session_id, "Session validated in memory");
        Ok(session.clone())
    }

    #[instrument(skip(self))]
    async fn delete_session(&self, session_id: i64) -> Result<CascadeReport, AppError> {
        let mut guard = self.lock()?;
        let tables = &mut *guard;

        SessionStatus::ensure_allowed(tables.session(session_id)?, SessionAction::Cancel)?;

        let hole_ids = tables.hole_ids(session_id);

        let scores_before = tables.scores.len();
        tables
            .scores
            .retain(|(hole_id, _), _| !hole_ids.contains(hole_id));
        let scores_removed = (scores_before - tables.scores.len()) as u64;

        for hole_id in &hole_ids {
            tables.played_holes.remove(hole_id);
        }

        let teams_before = tables.teams.len();
        tables.teams.retain(|_, team| team.session_id != session_id);
        let teams_removed = (teams_before - tables.teams.len()) as u64;

        tables.last_positions.remove(&session_id);
        tables.sessions.remove(&session_id);

        let report = CascadeReport {
            scores_removed,
            holes_removed: hole_ids.len() as u64,
            teams_removed,
        };
        debug!(session_id, ?report, "Session deleted from memory");
        Ok(report)
    }
}

#[async_trait]
impl PlayedHoleRepository for InMemoryStore {
    #[instrument(skip(self, hole))]
    async fn add_played_hole(
        &self,
        session_id: i64,
        hole: &NewPlayedHole,
    ) -> Result<PlayedHoleModel, AppError> {
        let mut guard = self.lock()?;
        let tables = &mut *guard;

        SessionStatus::ensure_allowed(tables.session(session_id)?, SessionAction::AddPlayedHole)?;

        let last_position = tables.last_positions.entry(session_id).or_insert(0);
        *last_position += 1;
        let position = *last_position;

        let played_hole_id = next_id(&mut tables.sequences.played_hole);
        let model = hole.into_model(played_hole_id, session_id, position);
        tables.played_holes.insert(played_hole_id, model.clone());

        debug!(session_id, played_hole_id, position, "Played hole added in memory");
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn get_played_hole(
        &self,
        played_hole_id: i64,
    ) -> Result<Option<PlayedHoleModel>, AppError> {
        let tables = self.lock()?;
        Ok(tables.played_holes.get(&played_hole_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_played_holes(&self, session_id: i64) -> Result<Vec<PlayedHoleModel>, AppError> {
        let tables = self.lock()?;
        Ok(tables.holes_of(session_id))
    }

    #[instrument(skip(self))]
    async fn delete_played_hole(
        &self,
        played_hole_id: i64,
    ) -> Result<PlayedHoleDeletion, AppError> {
        let mut guard = self.lock()?;
        let tables = &mut *guard;

        let session_id = tables.played_hole(played_hole_id)?.session_id;
        SessionStatus::ensure_allowed(
            tables.session(session_id)?,
            SessionAction::DeletePlayedHole,
        )?;

        let scores_before = tables.scores.len();
        tables
            .scores
            .retain(|(hole_id, _), _| *hole_id != played_hole_id);
        let scores_removed = (scores_before - tables.scores.len()) as u64;
        tables.played_holes.remove(&played_hole_id);

        debug!(
            session_id,
            played_hole_id, scores_removed, "Played hole deleted from memory"
        );
        Ok(PlayedHoleDeletion {
            session_id,
            played_hole_id,
            scores_removed,
        })
    }
}

#[async_trait]
impl ScoreRepository for InMemoryStore {
    #[instrument(skip(self, submission), fields(
        played_hole_id = submission.played_hole_id,
        team_id = submission.team_id
    ))]
    async fn upsert_score(
        &self,
        submission: &ScoreSubmission,
    ) -> Result<ScoreRecordModel, AppError> {
        let mut guard = self.lock()?;
        let tables = &mut *guard;

        let session_id = tables.played_hole(submission.played_hole_id)?.session_id;
        SessionStatus::ensure_allowed(tables.session(session_id)?, SessionAction::SubmitScore)?;

        let team_in_session = tables
            .teams
            .get(&submission.team_id)
            .is_some_and(|team| team.session_id == session_id);
        if !team_in_session {
            warn!(session_id, "Score submitted for a team outside the session");
            return Err(AppError::NotFound(format!(
                "Team {} not found in session {}",
                submission.team_id, session_id
            )));
        }

        let key = (submission.played_hole_id, submission.team_id);
        let record_id = match tables.scores.get(&key) {
            Some(existing) => existing.id,
            None => next_id(&mut tables.sequences.score),
        };
        let record = submission.into_model(record_id);
        let replaced = tables.scores.insert(key, record.clone()).is_some();

        debug!(
            record_id,
            strokes = record.strokes,
            replaced,
            "Score upserted in memory"
        );
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn load_scorecard(&self, session_id: i64) -> Result<Option<Scorecard>, AppError> {
        let tables = self.lock()?;
        let Some(session) = tables.sessions.get(&session_id) else {
            return Ok(None);
        };

        Ok(Some(Scorecard {
            session: session.clone(),
            teams: tables.teams_of(session_id),
            played_holes: tables.holes_of(session_id),
            scores: tables.scores_of(session_id),
        }))
    }

    #[instrument(skip(self))]
    async fn list_hole_scores(
        &self,
        played_hole_id: i64,
    ) -> Result<Vec<ScoreRecordModel>, AppError> {
        let tables = self.lock()?;
        Ok(tables
            .scores
            .range((played_hole_id, i64::MIN)..=(played_hole_id, i64::MAX))
            .map(|(_, record)| record.clone())
            .collect())
    }
}
