//! Stage: one phase of a tournament that owns a set of matches.

use crate::models::tournament::{TournamentError, TournamentId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a stage.
pub type StageId = Uuid;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageType {
    Group,
    Bracket,
    League,
}

/// Stage lifecycle: pending until matches are generated, then active.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    #[default]
    Pending,
    Active,
    Completed,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub tournament_id: TournamentId,
    pub name: String,
    pub stage_type: StageType,
    /// Ordering index among the tournament's stages.
    pub order: u32,
    pub status: StageStatus,
}

impl Stage {
    pub fn new(
        tournament_id: TournamentId,
        name: impl Into<String>,
        stage_type: StageType,
        order: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            name: name.into(),
            stage_type,
            order,
            status: StageStatus::Pending,
        }
    }

    /// Pending -> Active (matches were generated).
    pub fn activate(&mut self) -> Result<(), TournamentError> {
        if self.status != StageStatus::Pending {
            return Err(TournamentError::InvalidState);
        }
        self.status = StageStatus::Active;
        Ok(())
    }

    /// Active -> Completed.
    pub fn complete(&mut self) -> Result<(), TournamentError> {
        if self.status != StageStatus::Active {
            return Err(TournamentError::InvalidState);
        }
        self.status = StageStatus::Completed;
        Ok(())
    }
}
