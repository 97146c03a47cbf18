use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hole::models::PlayedHoleModel;
use crate::session::models::{SessionModel, TeamModel};

/// Strokes a team reported for a played hole.
/// At most one record exists per `(played_hole_id, team_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecordModel {
    pub id: i64,
    pub played_hole_id: i64,
    pub team_id: i64,
    pub strokes: u32,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSubmission {
    pub played_hole_id: i64,
    pub team_id: i64,
    pub strokes: u32,
    pub submitted_at: DateTime<Utc>,
}

impl ScoreSubmission {
    pub fn new(played_hole_id: i64, team_id: i64, strokes: u32) -> Self {
        Self {
            played_hole_id,
            team_id,
            strokes,
            submitted_at: Utc::now(),
        }
    }

    pub fn into_model(self, id: i64) -> ScoreRecordModel {
        ScoreRecordModel {
            id,
            played_hole_id: self.played_hole_id,
            team_id: self.team_id,
            strokes: self.strokes,
            submitted_at: self.submitted_at,
        }
    }
}

/// A session with its teams, holes and records, read at a single point in time
#[derive(Debug, Clone, PartialEq)]
pub struct Scorecard {
    pub session: SessionModel,
    pub teams: Vec<TeamModel>,
    /// Ordered by position
    pub played_holes: Vec<PlayedHoleModel>,
    /// Ordered by hole position, then team id
    pub scores: Vec<ScoreRecordModel>,
}
