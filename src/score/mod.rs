// Public API - what other modules can use
pub use handlers::{get_standings, list_hole_scores, list_scoring_modes, submit_score};
pub use types::{ScoringModeResponse, SubmitScoreRequest};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
mod types;
