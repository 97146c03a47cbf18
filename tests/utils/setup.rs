use std::sync::Arc;

use hole_scores::{
    session::{models::SessionType, types::StartSessionRequest},
    AppConfig, AppState, EventBus, InMemoryStore, Repositories,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub state: AppState,
    pub event_bus: EventBus,
    pub store: Arc<InMemoryStore>,
    pub session_id: i64,
    /// Team ids in the order the teams were declared
    pub team_ids: Vec<i64>,
}

pub struct TestSetupBuilder {
    game_zone_id: i64,
    session_type: SessionType,
    scoring_mode_id: i32,
    teams: Vec<Vec<i64>>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            game_zone_id: 1,
            session_type: SessionType::Individual,
            scoring_mode_id: 1,
            teams: vec![],
        }
    }

    pub fn in_zone(mut self, game_zone_id: i64) -> Self {
        self.game_zone_id = game_zone_id;
        self
    }

    pub fn with_mode(mut self, scoring_mode_id: i32) -> Self {
        self.scoring_mode_id = scoring_mode_id;
        self
    }

    /// One solo team per player, players numbered from 1
    pub fn with_solo_players(mut self, count: i64) -> Self {
        self.session_type = SessionType::Individual;
        self.teams = (1..=count).map(|player_id| vec![player_id]).collect();
        self
    }

    /// Pairs of consecutive player ids, players numbered from 1
    pub fn with_pairs(mut self, count: i64) -> Self {
        self.session_type = SessionType::Team;
        self.teams = (0..count)
            .map(|index| vec![index * 2 + 1, index * 2 + 2])
            .collect();
        self
    }

    pub fn with_three_players(self) -> Self {
        self.with_solo_players(3)
    }

    pub async fn build(self) -> TestSetup {
        let store = Arc::new(InMemoryStore::new());
        let repositories = Repositories::from_store(Arc::clone(&store));
        let state = AppState::new(repositories, &AppConfig::default());

        let started = state
            .session_service
            .start_session(StartSessionRequest {
                game_zone_id: self.game_zone_id,
                session_type: self.session_type,
                scoring_mode_id: self.scoring_mode_id,
                start_date_time: None,
                teams: self.teams,
                comment: None,
                weather: None,
            })
            .await
            .unwrap();

        TestSetup {
            event_bus: state.event_bus.clone(),
            state,
            store,
            session_id: started.session.id,
            team_ids: started.teams.iter().map(|team| team.id).collect(),
        }
    }
}
