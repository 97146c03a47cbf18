use serde::{Deserialize, Serialize};

use crate::scoring::ScoringMode;
use crate::shared::AppError;

/// Request body for submitting strokes
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubmitScoreRequest {
    /// Signed so that a negative count is reported as a validation error
    /// instead of a body parse failure
    pub strokes: i64,
}

impl SubmitScoreRequest {
    pub fn strokes(&self) -> Result<u32, AppError> {
        u32::try_from(self.strokes).map_err(|_| {
            AppError::Validation(format!(
                "Strokes must be a non-negative count, got {}",
                self.strokes
            ))
        })
    }
}

/// Catalog entry for a scoring mode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringModeResponse {
    pub id: i32,
    pub name: String,
}

impl From<ScoringMode> for ScoringModeResponse {
    fn from(mode: ScoringMode) -> Self {
        Self {
            id: mode.id(),
            name: mode.to_string(),
        }
    }
}
