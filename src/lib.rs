// Library crate for the hole-by-hole scoring service
// This file exposes the public API for the binary and integration tests

pub mod config;
pub mod event;
pub mod hole;
pub mod routes;
pub mod score;
pub mod scoring;
pub mod session;
pub mod shared;
pub mod storage;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use event::{EventBus, SessionEvent};
pub use routes::router;
pub use scoring::{ScoringEngine, ScoringMode, Standings, StandingsAggregator};
pub use shared::{AppError, AppState};
pub use storage::{InMemoryStore, PostgresStore, Repositories};
