//! Match record: two participant slots (either may be a bye), scores and winner.

use crate::models::participant::ParticipantId;
use crate::models::stage::StageId;
use crate::models::tournament::TournamentError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Lifecycle of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Ongoing,
    Completed,
}

/// Which slot of a match a participant occupies.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    One,
    Two,
}

/// A single match within a stage. A `None` slot is a bye.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub stage_id: StageId,
    pub participant1_id: Option<ParticipantId>,
    pub participant2_id: Option<ParticipantId>,
    pub status: MatchStatus,
    pub score_p1: Option<u32>,
    pub score_p2: Option<u32>,
    /// `None` on a completed match means a draw.
    pub winner_id: Option<ParticipantId>,
    /// Round number (1-based) for elimination and swiss; absent for round robin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl GameMatch {
    /// A new scheduled match between two (possibly empty) slots.
    pub fn scheduled(
        stage_id: StageId,
        participant1_id: Option<ParticipantId>,
        participant2_id: Option<ParticipantId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            stage_id,
            participant1_id,
            participant2_id,
            status: MatchStatus::Scheduled,
            score_p1: None,
            score_p2: None,
            winner_id: None,
            round: None,
            created_at: Utc::now(),
        }
    }

    pub fn in_round(mut self, round: u32) -> Self {
        self.round = Some(round);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// True if exactly one slot is empty.
    pub fn is_bye(&self) -> bool {
        self.participant1_id.is_some() != self.participant2_id.is_some()
    }

    /// Number of empty slots (0, 1 or 2).
    pub fn empty_slots(&self) -> usize {
        [self.participant1_id, self.participant2_id]
            .iter()
            .filter(|p| p.is_none())
            .count()
    }

    /// Participant in the given slot.
    pub fn participant(&self, slot: Slot) -> Option<ParticipantId> {
        match slot {
            Slot::One => self.participant1_id,
            Slot::Two => self.participant2_id,
        }
    }

    /// Slot occupied by `id`, if any.
    pub fn slot_of(&self, id: ParticipantId) -> Option<Slot> {
        if self.participant1_id == Some(id) {
            Some(Slot::One)
        } else if self.participant2_id == Some(id) {
            Some(Slot::Two)
        } else {
            None
        }
    }

    /// Non-empty slots, slot 1 first.
    pub fn participants(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.participant1_id.iter().chain(self.participant2_id.iter()).copied()
    }

    /// The non-winning side when there is a winner.
    pub fn loser_id(&self) -> Option<ParticipantId> {
        let winner = self.winner_id?;
        match self.slot_of(winner)? {
            Slot::One => self.participant2_id,
            Slot::Two => self.participant1_id,
        }
    }

    /// Record a final score. The higher score wins; equal scores are a draw.
    /// The match becomes `Completed`.
    pub fn record_result(&mut self, score1: u32, score2: u32) -> Result<(), TournamentError> {
        if self.participant1_id.is_none() && self.participant2_id.is_none() {
            return Err(TournamentError::EmptyMatch(self.id));
        }
        let winner_slot = match score1.cmp(&score2) {
            std::cmp::Ordering::Greater => Some(Slot::One),
            std::cmp::Ordering::Less => Some(Slot::Two),
            std::cmp::Ordering::Equal => None,
        };
        let winner_id = match winner_slot {
            Some(slot) => Some(
                self.participant(slot)
                    .ok_or(TournamentError::WinnerIsBye { match_id: self.id, slot })?,
            ),
            None => None,
        };
        self.score_p1 = Some(score1);
        self.score_p2 = Some(score2);
        self.winner_id = winner_id;
        self.status = MatchStatus::Completed;
        Ok(())
    }

    /// Integrity check applied before a completed match feeds a ranking.
    /// Non-completed matches always pass.
    pub fn check_consistency(&self) -> Result<(), TournamentError> {
        if !self.is_completed() {
            return Ok(());
        }
        if self.participant1_id.is_none() && self.participant2_id.is_none() {
            return Err(TournamentError::EmptyMatch(self.id));
        }
        if let Some(winner) = self.winner_id {
            if self.slot_of(winner).is_none() {
                return Err(TournamentError::WinnerNotInMatch { match_id: self.id, winner });
            }
        }
        // Scores are optional (a winner can be set without them); only check when both exist.
        if let (Some(s1), Some(s2)) = (self.score_p1, self.score_p2) {
            let expected = match s1.cmp(&s2) {
                std::cmp::Ordering::Greater => self.participant1_id,
                std::cmp::Ordering::Less => self.participant2_id,
                std::cmp::Ordering::Equal => self.winner_id,
            };
            if expected != self.winner_id {
                return Err(TournamentError::WinnerContradictsScore(self.id));
            }
        }
        Ok(())
    }
}
