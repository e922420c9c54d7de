//! Tournament, TournamentFormat, and the domain error type.

use crate::models::game::{MatchId, Slot};
use crate::models::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Broad class of a [`TournamentError`], used to pick an HTTP status.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Bad input from the caller (e.g. too few participants).
    Validation,
    /// Stored data breaks an invariant (e.g. winner outside the match).
    Consistency,
    /// Operation not allowed in the current lifecycle state.
    InvalidState,
    NotFound,
}

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    #[error("Minimum 2 confirmed participants required (found {eligible})")]
    NotEnoughParticipants { eligible: usize },
    #[error("Seed must be a positive integer")]
    InvalidSeed,
    #[error("Points multiplier must be between 1 and {max}")]
    InvalidMultiplier { max: u32 },
    #[error("Points total overflows for participant {0}")]
    PointsOverflow(ParticipantId),
    #[error("Match {0} has no participants")]
    EmptyMatch(MatchId),
    #[error("Winner {winner} is not a participant of match {match_id}")]
    WinnerNotInMatch { match_id: MatchId, winner: ParticipantId },
    #[error("Winner of match {match_id} would be the empty slot {slot:?}")]
    WinnerIsBye { match_id: MatchId, slot: Slot },
    #[error("Winner of match {0} does not match its scores")]
    WinnerContradictsScore(MatchId),
    #[error("Invalid state for this action")]
    InvalidState,
    #[error("Tournament not found")]
    TournamentNotFound(TournamentId),
    #[error("Stage not found")]
    StageNotFound(Uuid),
    #[error("Participant not found")]
    ParticipantNotFound(ParticipantId),
    #[error("Match not found")]
    MatchNotFound(MatchId),
    #[error("Circuit not found")]
    CircuitNotFound(Uuid),
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        use TournamentError::*;
        match self {
            NotEnoughParticipants { .. } | InvalidSeed | InvalidMultiplier { .. } | PointsOverflow(_) => {
                ErrorKind::Validation
            }
            EmptyMatch(_) | WinnerNotInMatch { .. } | WinnerIsBye { .. } | WinnerContradictsScore(_) => {
                ErrorKind::Consistency
            }
            InvalidState => ErrorKind::InvalidState,
            TournamentNotFound(_) | StageNotFound(_) | ParticipantNotFound(_) | MatchNotFound(_)
            | CircuitNotFound(_) => ErrorKind::NotFound,
        }
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Format chosen by the organizer; selects the match generation algorithm.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    #[default]
    Elimination,
    Groups,
    League,
    Swiss,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    Draft,
    Registration,
    Active,
    Completed,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub format: TournamentFormat,
    pub status: TournamentStatus,
    /// Rounds generated for the swiss format.
    pub swiss_rounds: u32,
}

impl Tournament {
    /// Create a new draft tournament.
    pub fn new(name: impl Into<String>, format: TournamentFormat, swiss_rounds: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            format,
            status: TournamentStatus::Draft,
            swiss_rounds,
        }
    }
}
