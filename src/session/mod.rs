// Public API - what other modules can use
pub use handlers::{
    cancel_session, get_join_token, get_session, join_session, list_sessions, session_events,
    start_session, validate_session,
};
pub use token::{JoinTokenConfig, JoinTokenError};

// Internal modules
mod handlers;
pub mod lifecycle;
pub mod models;
pub mod repository;
pub mod service;
mod token;
pub mod types;
