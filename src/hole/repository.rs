use async_trait::async_trait;

use super::models::{NewPlayedHole, PlayedHoleDeletion, PlayedHoleModel};
use crate::shared::AppError;

/// Trait for played hole storage
#[async_trait]
pub trait PlayedHoleRepository: Send + Sync {
    /// Appends a hole to an ongoing session at the next unused position
    async fn add_played_hole(
        &self,
        session_id: i64,
        hole: &NewPlayedHole,
    ) -> Result<PlayedHoleModel, AppError>;

    async fn get_played_hole(
        &self,
        played_hole_id: i64,
    ) -> Result<Option<PlayedHoleModel>, AppError>;

    /// Ordered by position
    async fn list_played_holes(&self, session_id: i64) -> Result<Vec<PlayedHoleModel>, AppError>;

    /// Removes the hole and its score records; other positions are left untouched
    async fn delete_played_hole(
        &self,
        played_hole_id: i64,
    ) -> Result<PlayedHoleDeletion, AppError>;
}
