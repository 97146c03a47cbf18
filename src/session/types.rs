use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lifecycle::SessionStatus;
use super::models::{CascadeReport, SessionModel, SessionType, TeamModel, WeatherSnapshot};
use crate::hole::models::PlayedHoleModel;

/// Request body for starting a session
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StartSessionRequest {
    pub game_zone_id: i64,
    pub session_type: SessionType,
    pub scoring_mode_id: i32,
    /// Defaults to the time the request is handled
    #[serde(default)]
    pub start_date_time: Option<DateTime<Utc>>,
    /// Player ids per team; one entry per solo player, two per pair
    pub teams: Vec<Vec<i64>>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub weather: Option<WeatherSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StartSessionResponse {
    pub session: SessionModel,
    pub teams: Vec<TeamModel>,
}

/// Session with everything needed to render it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionDetailResponse {
    pub session: SessionModel,
    pub status: SessionStatus,
    pub teams: Vec<TeamModel>,
    /// Ordered by position
    pub played_holes: Vec<PlayedHoleModel>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JoinTokenResponse {
    pub session_id: i64,
    pub token: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JoinSessionRequest {
    pub token: String,
    pub player_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JoinSessionResponse {
    pub session_id: i64,
    pub team: TeamModel,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionDeletedResponse {
    pub session_id: i64,
    #[serde(flatten)]
    pub removed: CascadeReport,
}
