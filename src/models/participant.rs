//! Participant and ParticipantStatus data structures.

use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a participant (used in matches and rankings).
pub type ParticipantId = Uuid;

/// Registration status of a participant within one tournament.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    /// Signed up, not yet accepted by the organizer.
    #[default]
    Registered,
    /// Accepted; only confirmed participants are paired into matches.
    Confirmed,
    Eliminated,
    Champion,
}

/// A participant registered in a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub tournament_id: TournamentId,
    /// Lower is stronger. `None` sorts after every explicit seed.
    pub seed: Option<u32>,
    pub team_name: Option<String>,
    pub status: ParticipantStatus,
    pub joined_at: DateTime<Utc>,
}

impl Participant {
    /// Create a new registered, unseeded participant.
    pub fn new(tournament_id: TournamentId) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            seed: None,
            team_name: None,
            status: ParticipantStatus::Registered,
            joined_at: Utc::now(),
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_status(mut self, status: ParticipantStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether this participant may be paired by the match generator.
    pub fn is_eligible(&self) -> bool {
        self.status == ParticipantStatus::Confirmed
    }
}
