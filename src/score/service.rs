use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::{ScoreRecordModel, ScoreSubmission},
    repository::ScoreRepository,
};
use crate::event::{EventBus, SessionEvent};
use crate::hole::repository::PlayedHoleRepository;
use crate::scoring::{HoleScores, HoleStrokes, ScoringEngine, Standings, StandingsAggregator};
use crate::shared::AppError;

/// Service for score submission and standings
pub struct ScoreService {
    holes: Arc<dyn PlayedHoleRepository>,
    scores: Arc<dyn ScoreRepository>,
    event_bus: EventBus,
}

impl ScoreService {
    pub fn new(
        holes: Arc<dyn PlayedHoleRepository>,
        scores: Arc<dyn ScoreRepository>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            holes,
            scores,
            event_bus,
        }
    }

    /// Records a team's strokes for a hole, replacing any earlier submission
    #[instrument(skip(self))]
    pub async fn submit_score(
        &self,
        played_hole_id: i64,
        team_id: i64,
        strokes: u32,
    ) -> Result<ScoreRecordModel, AppError> {
        let hole = self
            .holes
            .get_played_hole(played_hole_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Played hole {} not found", played_hole_id))
            })?;

        let record = self
            .scores
            .upsert_score(&ScoreSubmission::new(played_hole_id, team_id, strokes))
            .await
            .inspect_err(|error| warn!(%error, "Score submission rejected"))?;

        info!(
            session_id = hole.session_id,
            record_id = record.id,
            "Score submitted"
        );

        self.event_bus
            .emit(SessionEvent::ScoreSubmitted {
                session_id: hole.session_id,
                played_hole_id,
                team_id,
                strokes: record.strokes,
            })
            .await;

        Ok(record)
    }

    /// Ranks the session's teams from the stored score records.
    ///
    /// Computed on every call; an unknown scoring mode is an error rather than
    /// a fallback to some default rule.
    #[instrument(skip(self))]
    pub async fn compute_standings(&self, session_id: i64) -> Result<Standings, AppError> {
        let scorecard = self
            .scores
            .load_scorecard(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", session_id)))?;
        let session = &scorecard.session;

        let engine = ScoringEngine::for_mode_id(session.scoring_mode_id).inspect_err(|error| {
            warn!(%error, scoring_mode_id = session.scoring_mode_id, "Cannot score session");
        })?;

        let mut by_hole: HashMap<i64, Vec<(i64, u32)>> = HashMap::new();
        for record in &scorecard.scores {
            by_hole
                .entry(record.played_hole_id)
                .or_default()
                .push((record.team_id, record.strokes));
        }

        let hole_scores = scorecard
            .played_holes
            .iter()
            .map(|hole| -> Result<HoleScores, AppError> {
                let records = by_hole.remove(&hole.id).unwrap_or_default();
                Ok(HoleScores {
                    played_hole_id: hole.id,
                    position: hole.position,
                    strokes: HoleStrokes::from_records(hole.id, records)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let standings =
            StandingsAggregator::new(engine).aggregate(scorecard.teams.len(), &hole_scores);

        debug!(
            session_id,
            entries = standings.entries.len(),
            has_missing_scores = standings.has_missing_scores,
            "Standings computed"
        );
        Ok(standings)
    }

    /// Score records for one played hole, ordered by team
    #[instrument(skip(self))]
    pub async fn list_hole_scores(
        &self,
        played_hole_id: i64,
    ) -> Result<Vec<ScoreRecordModel>, AppError> {
        if self.holes.get_played_hole(played_hole_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Played hole {} not found",
                played_hole_id
            )));
        }

        self.scores.list_hole_scores(played_hole_id).await
    }
}
