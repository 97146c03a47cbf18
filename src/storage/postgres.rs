use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool, Row};
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};

use crate::hole::models::{NewPlayedHole, PlayedHoleDeletion, PlayedHoleModel};
use crate::hole::repository::PlayedHoleRepository;
use crate::score::models::{ScoreRecordModel, ScoreSubmission, Scorecard};
use crate::score::repository::ScoreRepository;
use crate::session::lifecycle::{SessionAction, SessionStatus};
use crate::session::models::{
    CascadeReport, NewSession, NewTeam, SessionFilter, SessionModel, SessionType, TeamModel,
    WeatherSnapshot,
};
use crate::session::repository::SessionRepository;
use crate::shared::AppError;

const SESSION_COLUMNS: &str = "id, game_zone_id, session_type, scoring_mode_id, start_date_time, \
     end_date_time, is_ongoing, comment, weather";
const TEAM_COLUMNS: &str = "id, session_id, player_one_id, player_two_id";
const HOLE_COLUMNS: &str = "id, session_id, hole_id, game_mode_id, position";
const SCORE_COLUMNS: &str = "id, played_hole_id, team_id, strokes, submitted_at";

/// Row lock taken on a session before touching anything it owns.
///
/// Writers that change the session itself (or its holes) take `Update`;
/// score upserts take `Share` so submissions for the same session do not
/// serialize on each other but still wait for a concurrent close.
#[derive(Debug, Clone, Copy)]
enum RowLock {
    Update,
    Share,
}

impl RowLock {
    fn clause(self) -> &'static str {
        match self {
            RowLock::Update => "FOR UPDATE",
            RowLock::Share => "FOR SHARE",
        }
    }
}

fn database_error(operation: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |e| {
        warn!(error = %e, operation, "Database operation failed");
        AppError::DatabaseError(e.to_string())
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|db_error| db_error.is_unique_violation())
}

fn session_from_row(row: &PgRow) -> Result<SessionModel, AppError> {
    let session_type: String = row.get("session_type");
    let session_type = SessionType::from_str(&session_type).map_err(|_| {
        AppError::DatabaseError(format!("Unknown session type '{}'", session_type))
    })?;
    let weather: Option<Json<WeatherSnapshot>> = row.get("weather");

    Ok(SessionModel {
        id: row.get("id"),
        game_zone_id: row.get("game_zone_id"),
        session_type,
        scoring_mode_id: row.get("scoring_mode_id"),
        start_date_time: row.get("start_date_time"),
        end_date_time: row.get("end_date_time"),
        is_ongoing: row.get("is_ongoing"),
        comment: row.get("comment"),
        weather: weather.map(|Json(snapshot)| snapshot),
    })
}

fn team_from_row(row: &PgRow) -> TeamModel {
    TeamModel {
        id: row.get("id"),
        session_id: row.get("session_id"),
        player_one_id: row.get("player_one_id"),
        player_two_id: row.get("player_two_id"),
    }
}

fn hole_from_row(row: &PgRow) -> PlayedHoleModel {
    PlayedHoleModel {
        id: row.get("id"),
        session_id: row.get("session_id"),
        hole_id: row.get("hole_id"),
        game_mode_id: row.get("game_mode_id"),
        position: row.get("position"),
    }
}

fn score_from_row(row: &PgRow) -> Result<ScoreRecordModel, AppError> {
    let strokes: i32 = row.get("strokes");
    let strokes = u32::try_from(strokes)
        .map_err(|_| AppError::DatabaseError(format!("Negative stroke count {}", strokes)))?;

    Ok(ScoreRecordModel {
        id: row.get("id"),
        played_hole_id: row.get("played_hole_id"),
        team_id: row.get("team_id"),
        strokes,
        submitted_at: row.get("submitted_at"),
    })
}

/// Loads a session under a row lock, failing with `NotFound` when it is gone
/// and with `InvalidStateTransition` when `action` is not allowed.
async fn lock_session(
    conn: &mut PgConnection,
    session_id: i64,
    lock: RowLock,
    action: SessionAction,
) -> Result<SessionModel, AppError> {
    let sql = format!(
        "SELECT {} FROM scoring_sessions WHERE id = $1 {}",
        SESSION_COLUMNS,
        lock.clause()
    );

    let row = sqlx::query(&sql)
        .bind(session_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(database_error("lock_session"))?
        .ok_or_else(|| AppError::NotFound(format!("Session {} not found", session_id)))?;

    let session = session_from_row(&row)?;
    SessionStatus::ensure_allowed(&session, action)?;
    Ok(session)
}

async fn hole_session_id(conn: &mut PgConnection, played_hole_id: i64) -> Result<i64, AppError> {
    let row = sqlx::query("SELECT session_id FROM played_holes WHERE id = $1")
        .bind(played_hole_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(database_error("hole_session_id"))?
        .ok_or_else(|| AppError::NotFound(format!("Played hole {} not found", played_hole_id)))?;

    Ok(row.get("session_id"))
}

/// PostgreSQL implementation of the storage traits
///
/// Every write runs in a transaction that first locks the owning session row,
/// so lifecycle checks and the writes they guard commit together. The partial
/// unique index on ongoing sessions and the `(played_hole_id, team_id)` unique
/// constraint back the in-process checks.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(database_error("connect"))?;

        info!("Connected to PostgreSQL");
        Ok(Self::new(pool))
    }

    /// Applies the bundled schema migrations
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to run migrations");
                AppError::DatabaseError(e.to_string())
            })?;

        info!("Database migrations applied");
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for PostgresStore {
    #[instrument(skip(self, session, teams), fields(game_zone_id = session.game_zone_id))]
    async fn start_session(
        &self,
        session: &NewSession,
        teams: &[NewTeam],
    ) -> Result<(SessionModel, Vec<TeamModel>), AppError> {
        let mut tx = self.pool.begin().await.map_err(database_error("begin"))?;

        let sql = format!(
            "INSERT INTO scoring_sessions \
             (game_zone_id, session_type, scoring_mode_id, start_date_time, is_ongoing, comment, weather) \
             VALUES ($1, $2, $3, $4, TRUE, $5, $6) RETURNING {}",
            SESSION_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(session.game_zone_id)
            .bind(session.session_type.to_string())
            .bind(session.scoring_mode_id)
            .bind(session.start_date_time)
            .bind(&session.comment)
            .bind(session.weather.clone().map(Json))
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    warn!("Game zone already has an ongoing session");
                    AppError::Conflict(format!(
                        "Game zone {} already has an ongoing session",
                        session.game_zone_id
                    ))
                } else {
                    database_error("start_session")(e)
                }
            })?;
        let model = session_from_row(&row)?;

        let team_sql = format!(
            "INSERT INTO teams (session_id, player_one_id, player_two_id) VALUES ($1, $2, $3) RETURNING {}",
            TEAM_COLUMNS
        );
        let mut created = Vec::with_capacity(teams.len());
        for team in teams {
            let row = sqlx::query(&team_sql)
                .bind(model.id)
                .bind(team.player_one_id)
                .bind(team.player_two_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(database_error("insert_team"))?;
            created.push(team_from_row(&row));
        }

        tx.commit().await.map_err(database_error("commit"))?;

        debug!(
            session_id = model.id,
            teams = created.len(),
            "Session started in database"
        );
        Ok((model, created))
    }

    #[instrument(skip(self))]
    async fn get_session(&self, session_id: i64) -> Result<Option<SessionModel>, AppError> {
        let sql = format!("SELECT {} FROM scoring_sessions WHERE id = $1", SESSION_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error("get_session"))?;

        match row {
            Some(row) => Ok(Some(session_from_row(&row)?)),
            None => {
                debug!(session_id, "Session not found in database");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self))]
    async fn list_sessions(&self, filter: &SessionFilter) -> Result<Vec<SessionModel>, AppError> {
        let sql = format!(
            "SELECT {} FROM scoring_sessions \
             WHERE ($1::BOOLEAN IS NULL OR is_ongoing = $1) \
             AND ($2::BIGINT IS NULL OR game_zone_id = $2) \
             ORDER BY start_date_time DESC, id DESC",
            SESSION_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(filter.ongoing)
            .bind(filter.game_zone_id)
            .fetch_all(&self.pool)
            .await
            .map_err(database_error("list_sessions"))?;

        rows.iter().map(session_from_row).collect()
    }

    #[instrument(skip(self))]
    async fn list_teams(&self, session_id: i64) -> Result<Vec<TeamModel>, AppError> {
        let sql = format!(
            "SELECT {} FROM teams WHERE session_id = $1 ORDER BY id",
            TEAM_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(session_id)
            .fetch_all(&self.pool)
            .await
            .map_err(database_error("list_teams"))?;

        Ok(rows.iter().map(team_from_row).collect())
    }

    #[instrument(skip(self, team))]
    async fn add_team(&self, session_id: i64, team: &NewTeam) -> Result<TeamModel, AppError> {
        let mut tx = self.pool.begin().await.map_err(database_error("begin"))?;
        lock_session(&mut tx, session_id, RowLock::Update, SessionAction::AddTeam).await?;

        // the session row lock serialises joins, so this read cannot go stale
        let players: Vec<i64> = team.player_ids().collect();
        let seated: Option<i64> = sqlx::query_scalar(
            "SELECT player_id FROM teams, UNNEST(ARRAY[player_one_id, player_two_id]) AS player_id \
             WHERE session_id = $1 AND player_id = ANY($2) LIMIT 1",
        )
        .bind(session_id)
        .bind(&players)
        .fetch_optional(&mut *tx)
        .await
        .map_err(database_error("add_team"))?;
        if let Some(player_id) = seated {
            return Err(AppError::Validation(format!(
                "Player {} is already in a team of this session",
                player_id
            )));
        }

        let sql = format!(
            "INSERT INTO teams (session_id, player_one_id, player_two_id) VALUES ($1, $2, $3) RETURNING {}",
            TEAM_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(session_id)
            .bind(team.player_one_id)
            .bind(team.player_two_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(database_error("add_team"))?;

        tx.commit().await.map_err(database_error("commit"))?;
        Ok(team_from_row(&row))
    }

    #[instrument(skip(self))]
    async fn validate_session(
        &self,
        session_id: i64,
        ended_at: DateTime<Utc>,
    ) -> Result<SessionModel, AppError> {
        let mut tx = self.pool.begin().await.map_err(database_error("begin"))?;
        lock_session(&mut tx, session_id, RowLock::Update, SessionAction::Validate).await?;

        let sql = format!(
            "UPDATE scoring_sessions SET is_ongoing = FALSE, end_date_time = $2 \
             WHERE id = $1 RETURNING {}",
            SESSION_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(session_id)
            .bind(ended_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(database_error("validate_session"))?;
        let session = session_from_row(&row)?;

        tx.commit().await.map_err(database_error("commit"))?;

        debug!(session_id, "Session validated in database");
        Ok(session)
    }

    #[instrument(skip(self))]
    async fn delete_session(&self, session_id: i64) -> Result<CascadeReport, AppError> {
        let mut tx = self.pool.begin().await.map_err(database_error("begin"))?;
        lock_session(&mut tx, session_id, RowLock::Update, SessionAction::Cancel).await?;

        let scores_removed = sqlx::query(
            "DELETE FROM score_records WHERE played_hole_id IN \
             (SELECT id FROM played_holes WHERE session_id = $1)",
        )
        .bind(session_id)
        .execute(&mut *tx)
        .await
        .map_err(database_error("delete_session_scores"))?
        .rows_affected();

        let holes_removed = sqlx::query("DELETE FROM played_holes WHERE session_id = $1")
            .bind(session_id)
            .execute(&mut *tx)
            .await
            .map_err(database_error("delete_session_holes"))?
            .rows_affected();

        let teams_removed = sqlx::query("DELETE FROM teams WHERE session_id = $1")
            .bind(session_id)
            .execute(&mut *tx)
            .await
            .map_err(database_error("delete_session_teams"))?
            .rows_affected();

        sqlx::query("DELETE FROM scoring_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&mut *tx)
            .await
            .map_err(database_error("delete_session"))?;

        tx.commit().await.map_err(database_error("commit"))?;

        let report = CascadeReport {
            scores_removed,
            holes_removed,
            teams_removed,
        };
        debug!(session_id, ?report, "Session deleted from database");
        Ok(report)
    }
}

#[async_trait]
impl PlayedHoleRepository for PostgresStore {
    #[instrument(skip(self, hole))]
    async fn add_played_hole(
        &self,
        session_id: i64,
        hole: &NewPlayedHole,
    ) -> Result<PlayedHoleModel, AppError> {
        let mut tx = self.pool.begin().await.map_err(database_error("begin"))?;
        lock_session(
            &mut tx,
            session_id,
            RowLock::Update,
            SessionAction::AddPlayedHole,
        )
        .await?;

        let position: i32 = sqlx::query(
            "UPDATE scoring_sessions SET last_hole_position = last_hole_position + 1 \
             WHERE id = $1 RETURNING last_hole_position",
        )
        .bind(session_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(database_error("next_hole_position"))?
        .get("last_hole_position");

        let sql = format!(
            "INSERT INTO played_holes (session_id, hole_id, game_mode_id, position) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            HOLE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(session_id)
            .bind(hole.hole_id)
            .bind(hole.game_mode_id)
            .bind(position)
            .fetch_one(&mut *tx)
            .await
            .map_err(database_error("add_played_hole"))?;

        tx.commit().await.map_err(database_error("commit"))?;

        let model = hole_from_row(&row);
        debug!(
            session_id,
            played_hole_id = model.id,
            position,
            "Played hole added in database"
        );
        Ok(model)
    }

    #[instrument(skip(self))]
    async fn get_played_hole(
        &self,
        played_hole_id: i64,
    ) -> Result<Option<PlayedHoleModel>, AppError> {
        let sql = format!("SELECT {} FROM played_holes WHERE id = $1", HOLE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(played_hole_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error("get_played_hole"))?;

        Ok(row.as_ref().map(hole_from_row))
    }

    #[instrument(skip(self))]
    async fn list_played_holes(&self, session_id: i64) -> Result<Vec<PlayedHoleModel>, AppError> {
        let sql = format!(
            "SELECT {} FROM played_holes WHERE session_id = $1 ORDER BY position",
            HOLE_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(session_id)
            .fetch_all(&self.pool)
            .await
            .map_err(database_error("list_played_holes"))?;

        Ok(rows.iter().map(hole_from_row).collect())
    }

    #[instrument(skip(self))]
    async fn delete_played_hole(
        &self,
        played_hole_id: i64,
    ) -> Result<PlayedHoleDeletion, AppError> {
        let mut tx = self.pool.begin().await.map_err(database_error("begin"))?;

        let session_id = hole_session_id(&mut tx, played_hole_id).await?;
        lock_session(
            &mut tx,
            session_id,
            RowLock::Update,
            SessionAction::DeletePlayedHole,
        )
        .await?;

        let scores_removed = sqlx::query("DELETE FROM score_records WHERE played_hole_id = $1")
            .bind(played_hole_id)
            .execute(&mut *tx)
            .await
            .map_err(database_error("delete_hole_scores"))?
            .rows_affected();

        let holes_removed = sqlx::query("DELETE FROM played_holes WHERE id = $1")
            .bind(played_hole_id)
            .execute(&mut *tx)
            .await
            .map_err(database_error("delete_played_hole"))?
            .rows_affected();

        if holes_removed == 0 {
            // removed by a concurrent delete between lookup and lock
            return Err(AppError::NotFound(format!(
                "Played hole {} not found",
                played_hole_id
            )));
        }

        tx.commit().await.map_err(database_error("commit"))?;

        debug!(
            session_id,
            played_hole_id, scores_removed, "Played hole deleted from database"
        );
        Ok(PlayedHoleDeletion {
            session_id,
            played_hole_id,
            scores_removed,
        })
    }
}

#[async_trait]
impl ScoreRepository for PostgresStore {
    #[instrument(skip(self, submission), fields(
        played_hole_id = submission.played_hole_id,
        team_id = submission.team_id
    ))]
    async fn upsert_score(
        &self,
        submission: &ScoreSubmission,
    ) -> Result<ScoreRecordModel, AppError> {
        let strokes = i32::try_from(submission.strokes).map_err(|_| {
            AppError::Validation(format!("Stroke count {} is too large", submission.strokes))
        })?;

        let mut tx = self.pool.begin().await.map_err(database_error("begin"))?;

        let session_id = hole_session_id(&mut tx, submission.played_hole_id).await?;
        lock_session(
            &mut tx,
            session_id,
            RowLock::Share,
            SessionAction::SubmitScore,
        )
        .await?;
        // the session lock blocks hole deletion, so this answer holds until commit
        hole_session_id(&mut tx, submission.played_hole_id).await?;

        let team = sqlx::query("SELECT id FROM teams WHERE id = $1 AND session_id = $2")
            .bind(submission.team_id)
            .bind(session_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(database_error("find_team"))?;
        if team.is_none() {
            warn!(session_id, "Score submitted for a team outside the session");
            return Err(AppError::NotFound(format!(
                "Team {} not found in session {}",
                submission.team_id, session_id
            )));
        }

        let sql = format!(
            "INSERT INTO score_records (played_hole_id, team_id, strokes, submitted_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (played_hole_id, team_id) \
             DO UPDATE SET strokes = EXCLUDED.strokes, submitted_at = EXCLUDED.submitted_at \
             RETURNING {}",
            SCORE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(submission.played_hole_id)
            .bind(submission.team_id)
            .bind(strokes)
            .bind(submission.submitted_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(database_error("upsert_score"))?;
        let record = score_from_row(&row)?;

        tx.commit().await.map_err(database_error("commit"))?;

        debug!(
            record_id = record.id,
            strokes = record.strokes,
            "Score upserted in database"
        );
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn load_scorecard(&self, session_id: i64) -> Result<Option<Scorecard>, AppError> {
        let mut tx = self.pool.begin().await.map_err(database_error("begin"))?;
        // every read below sees the snapshot taken at the first one
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(database_error("load_scorecard"))?;

        let sql = format!("SELECT {} FROM scoring_sessions WHERE id = $1", SESSION_COLUMNS);
        let Some(row) = sqlx::query(&sql)
            .bind(session_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(database_error("load_scorecard"))?
        else {
            debug!(session_id, "Session not found in database");
            return Ok(None);
        };
        let session = session_from_row(&row)?;

        let sql = format!(
            "SELECT {} FROM teams WHERE session_id = $1 ORDER BY id",
            TEAM_COLUMNS
        );
        let teams: Vec<TeamModel> = sqlx::query(&sql)
            .bind(session_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(database_error("load_scorecard"))?
            .iter()
            .map(team_from_row)
            .collect();

        let sql = format!(
            "SELECT {} FROM played_holes WHERE session_id = $1 ORDER BY position",
            HOLE_COLUMNS
        );
        let played_holes: Vec<PlayedHoleModel> = sqlx::query(&sql)
            .bind(session_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(database_error("load_scorecard"))?
            .iter()
            .map(hole_from_row)
            .collect();

        let scores = sqlx::query(
            "SELECT s.id, s.played_hole_id, s.team_id, s.strokes, s.submitted_at \
             FROM score_records s JOIN played_holes h ON h.id = s.played_hole_id \
             WHERE h.session_id = $1 ORDER BY h.position, s.team_id",
        )
        .bind(session_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(database_error("load_scorecard"))?
        .iter()
        .map(score_from_row)
        .collect::<Result<Vec<_>, _>>()?;

        tx.commit().await.map_err(database_error("commit"))?;

        Ok(Some(Scorecard {
            session,
            teams,
            played_holes,
            scores,
        }))
    }

    #[instrument(skip(self))]
    async fn list_hole_scores(
        &self,
        played_hole_id: i64,
    ) -> Result<Vec<ScoreRecordModel>, AppError> {
        let sql = format!(
            "SELECT {} FROM score_records WHERE played_hole_id = $1 ORDER BY team_id",
            SCORE_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(played_hole_id)
            .fetch_all(&self.pool)
            .await
            .map_err(database_error("list_hole_scores"))?;

        rows.iter().map(score_from_row).collect()
    }
}
