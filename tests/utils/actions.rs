use hole_scores::{
    hole::models::{NewPlayedHole, PlayedHoleModel},
    score::models::ScoreRecordModel,
    AppError, Standings,
};

use super::setup::TestSetup;

// ============================================================================
// Session Actions
// ============================================================================

impl TestSetup {
    pub async fn add_hole(&self, hole_id: i64) -> PlayedHoleModel {
        self.state
            .hole_service
            .add_played_hole(
                self.session_id,
                NewPlayedHole {
                    hole_id,
                    game_mode_id: 1,
                },
            )
            .await
            .unwrap()
    }

    pub async fn submit(
        &self,
        played_hole_id: i64,
        team_index: usize,
        strokes: u32,
    ) -> Result<ScoreRecordModel, AppError> {
        self.state
            .score_service
            .submit_score(played_hole_id, self.team_ids[team_index], strokes)
            .await
    }

    /// Plays a new hole where team `i` takes `strokes[i]`
    pub async fn play_hole(&self, hole_id: i64, strokes: &[u32]) -> PlayedHoleModel {
        let hole = self.add_hole(hole_id).await;
        for (team_index, value) in strokes.iter().enumerate() {
            self.submit(hole.id, team_index, *value).await.unwrap();
        }
        hole
    }

    pub async fn standings(&self) -> Standings {
        self.state
            .score_service
            .compute_standings(self.session_id)
            .await
            .unwrap()
    }

    pub async fn close(&self) {
        self.state
            .session_service
            .validate_session(self.session_id)
            .await
            .unwrap();
    }
}
