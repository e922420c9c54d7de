//! Circuit: a series of tournaments whose results add up to one ranking.

use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CircuitId = Uuid;

/// Largest accepted `points_multiplier`.
pub const MAX_POINTS_MULTIPLIER: u32 = 100;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitStatus {
    #[default]
    Draft,
    Active,
    Completed,
}

/// Membership of a tournament in a circuit.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CircuitTournament {
    pub tournament_id: TournamentId,
    pub order: u32,
    /// Tournament points are multiplied by this in the circuit ranking.
    pub points_multiplier: u32,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    pub id: CircuitId,
    pub name: String,
    pub status: CircuitStatus,
    pub tournaments: Vec<CircuitTournament>,
}

impl Circuit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status: CircuitStatus::Draft,
            tournaments: Vec::new(),
        }
    }

    /// Member tournaments in circuit order.
    pub fn ordered_tournaments(&self) -> Vec<&CircuitTournament> {
        let mut ts: Vec<_> = self.tournaments.iter().collect();
        ts.sort_by_key(|t| t.order);
        ts
    }
}
