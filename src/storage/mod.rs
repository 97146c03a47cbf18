//! Storage backends shared by the session, hole and score repositories.
//!
//! A session owns its teams, played holes and score records, and a cascading
//! delete has to remove all of them atomically, so each backend implements
//! every repository trait over one store.

use std::sync::Arc;

use crate::hole::repository::PlayedHoleRepository;
use crate::score::repository::ScoreRepository;
use crate::session::repository::SessionRepository;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

mod memory;
mod postgres;

/// Repository handles backed by a single store
#[derive(Clone)]
pub struct Repositories {
    pub sessions: Arc<dyn SessionRepository>,
    pub holes: Arc<dyn PlayedHoleRepository>,
    pub scores: Arc<dyn ScoreRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemoryStore::new()))
    }

    pub fn postgres(store: PostgresStore) -> Self {
        Self::from_store(Arc::new(store))
    }

    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: SessionRepository + PlayedHoleRepository + ScoreRepository + 'static,
    {
        Self {
            sessions: store.clone(),
            holes: store.clone(),
            scores: store,
        }
    }
}
