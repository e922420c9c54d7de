//! Derived ranking rows. Never stored as primary records.

use crate::models::participant::ParticipantId;
use serde::{Deserialize, Serialize};

/// One participant's aggregated record.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub participant_id: ParticipantId,
    pub wins: u32,
    pub losses: u32,
    pub points: u32,
    pub matches_played: u32,
}

impl RankingEntry {
    pub fn new(participant_id: ParticipantId) -> Self {
        Self {
            participant_id,
            ..Default::default()
        }
    }

    /// wins / matches_played, or 0 when nothing was played.
    pub fn win_rate(&self) -> f64 {
        if self.matches_played == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.matches_played)
        }
    }

    /// Win rate as a rounded whole percentage.
    pub fn win_rate_percent(&self) -> u32 {
        (self.win_rate() * 100.0).round() as u32
    }
}

/// A ranking row as displayed: position plus movement since the last snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// 1-based position.
    pub position: usize,
    #[serde(flatten)]
    pub entry: RankingEntry,
    /// current - previous position; negative means moved up. `None` if not ranked before.
    pub rank_delta: Option<i64>,
}
