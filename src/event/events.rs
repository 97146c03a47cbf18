use serde::{Deserialize, Serialize};

/// Facts about committed changes to a session.
///
/// Events carry identifiers and the new values only; clients are expected to
/// re-read standings rather than patch local state from an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    SessionStarted {
        session_id: i64,
        game_zone_id: i64,
        team_ids: Vec<i64>,
    },

    TeamJoined {
        session_id: i64,
        team_id: i64,
    },

    HoleAdded {
        session_id: i64,
        played_hole_id: i64,
        position: i32,
    },

    HoleDeleted {
        session_id: i64,
        played_hole_id: i64,
    },

    ScoreSubmitted {
        session_id: i64,
        played_hole_id: i64,
        team_id: i64,
        strokes: u32,
    },

    /// The session was closed and is now read-only
    SessionValidated { session_id: i64 },

    /// The session and everything under it was removed
    SessionDeleted { session_id: i64 },
}

impl SessionEvent {
    pub fn session_id(&self) -> i64 {
        match self {
            SessionEvent::SessionStarted { session_id, .. } => *session_id,
            SessionEvent::TeamJoined { session_id, .. } => *session_id,
            SessionEvent::HoleAdded { session_id, .. } => *session_id,
            SessionEvent::HoleDeleted { session_id, .. } => *session_id,
            SessionEvent::ScoreSubmitted { session_id, .. } => *session_id,
            SessionEvent::SessionValidated { session_id } => *session_id,
            SessionEvent::SessionDeleted { session_id } => *session_id,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            SessionEvent::SessionStarted { .. } => "session_started",
            SessionEvent::TeamJoined { .. } => "team_joined",
            SessionEvent::HoleAdded { .. } => "hole_added",
            SessionEvent::HoleDeleted { .. } => "hole_deleted",
            SessionEvent::ScoreSubmitted { .. } => "score_submitted",
            SessionEvent::SessionValidated { .. } => "session_validated",
            SessionEvent::SessionDeleted { .. } => "session_deleted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = SessionEvent::ScoreSubmitted {
            session_id: 1,
            played_hole_id: 2,
            team_id: 3,
            strokes: 4,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.event_type());
        assert_eq!(json["strokes"], 4);
        assert_eq!(event.session_id(), 1);
    }
}
