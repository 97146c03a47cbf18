use serde::{Deserialize, Serialize};

/// One hole played within a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedHoleModel {
    pub id: i64,
    pub session_id: i64,
    pub hole_id: i64,
    /// Per-hole game mode, independent of the session's scoring mode
    pub game_mode_id: i32,
    /// 1-based; never reused within a session, even after deletions
    pub position: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct NewPlayedHole {
    pub hole_id: i64,
    pub game_mode_id: i32,
}

impl NewPlayedHole {
    pub fn into_model(self, id: i64, session_id: i64, position: i32) -> PlayedHoleModel {
        PlayedHoleModel {
            id,
            session_id,
            hole_id: self.hole_id,
            game_mode_id: self.game_mode_id,
            position,
        }
    }
}

/// Result of removing a played hole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayedHoleDeletion {
    pub session_id: i64,
    pub played_hole_id: i64,
    pub scores_removed: u64,
}
