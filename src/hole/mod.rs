// Public API - what other modules can use
pub use handlers::{add_played_hole, delete_played_hole, list_played_holes};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
