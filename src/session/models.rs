use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::lifecycle::SessionStatus;
use crate::shared::AppError;

/// Whether teams are solo players or pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionType {
    Individual,
    Team,
}

/// Conditions recorded when the session started
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_celsius: Option<f64>,
    pub wind_speed_kph: Option<f64>,
    pub conditions: Option<String>,
}

/// Persisted scoring session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionModel {
    pub id: i64,
    pub game_zone_id: i64,
    pub session_type: SessionType,
    /// Raw catalog id; resolved when standings are computed
    pub scoring_mode_id: i32,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: Option<DateTime<Utc>>,
    pub is_ongoing: bool,
    pub comment: Option<String>,
    pub weather: Option<WeatherSnapshot>,
}

impl SessionModel {
    pub fn status(&self) -> SessionStatus {
        SessionStatus::of(self)
    }
}

/// Values for a session that has not been persisted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    pub game_zone_id: i64,
    pub session_type: SessionType,
    pub scoring_mode_id: i32,
    pub start_date_time: DateTime<Utc>,
    pub comment: Option<String>,
    pub weather: Option<WeatherSnapshot>,
}

impl NewSession {
    pub fn into_model(self, id: i64) -> SessionModel {
        SessionModel {
            id,
            game_zone_id: self.game_zone_id,
            session_type: self.session_type,
            scoring_mode_id: self.scoring_mode_id,
            start_date_time: self.start_date_time,
            end_date_time: None,
            is_ongoing: true,
            comment: self.comment,
            weather: self.weather,
        }
    }
}

/// A solo player or a pair playing as one side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamModel {
    pub id: i64,
    pub session_id: i64,
    pub player_one_id: i64,
    pub player_two_id: Option<i64>,
}

impl TeamModel {
    pub fn is_solo(&self) -> bool {
        self.player_two_id.is_none()
    }

    pub fn player_ids(&self) -> impl Iterator<Item = i64> + '_ {
        std::iter::once(self.player_one_id).chain(self.player_two_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTeam {
    pub player_one_id: i64,
    pub player_two_id: Option<i64>,
}

impl NewTeam {
    /// Accepts one or two distinct players
    pub fn from_players(player_ids: &[i64]) -> Result<Self, AppError> {
        match player_ids {
            [one] => Ok(Self {
                player_one_id: *one,
                player_two_id: None,
            }),
            [one, two] if one != two => Ok(Self {
                player_one_id: *one,
                player_two_id: Some(*two),
            }),
            [_, _] => Err(AppError::Validation(
                "A team cannot list the same player twice".to_string(),
            )),
            _ => Err(AppError::Validation(format!(
                "A team needs one or two players, got {}",
                player_ids.len()
            ))),
        }
    }

    pub fn is_solo(&self) -> bool {
        self.player_two_id.is_none()
    }

    pub fn player_ids(&self) -> impl Iterator<Item = i64> {
        std::iter::once(self.player_one_id).chain(self.player_two_id)
    }

    pub fn into_model(self, id: i64, session_id: i64) -> TeamModel {
        TeamModel {
            id,
            session_id,
            player_one_id: self.player_one_id,
            player_two_id: self.player_two_id,
        }
    }
}

/// Filters for listing sessions; `None` means no restriction
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SessionFilter {
    pub ongoing: Option<bool>,
    pub game_zone_id: Option<i64>,
}

impl SessionFilter {
    pub fn matches(&self, session: &SessionModel) -> bool {
        self.ongoing
            .map_or(true, |ongoing| session.is_ongoing == ongoing)
            && self
                .game_zone_id
                .map_or(true, |zone| session.game_zone_id == zone)
    }
}

/// Rows removed by a cascading session delete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub scores_removed: u64,
    pub holes_removed: u64,
    pub teams_removed: u64,
}
