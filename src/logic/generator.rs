//! Match generation for a stage: single elimination, round robin, and swiss.

use crate::logic::seeding::normalize;
use crate::models::{GameMatch, Participant, ParticipantId, StageId, TournamentError, TournamentFormat};
use serde::{Deserialize, Serialize};

/// Rounds generated for swiss when nothing else is configured.
pub const DEFAULT_SWISS_ROUNDS: u32 = 5;

/// How swiss rounds are paired.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum SwissPairing {
    /// Top half vs bottom half by seed, the same pairing every round.
    /// Does not re-pair on accumulated results.
    #[default]
    #[serde(rename = "swiss-simplified")]
    Simplified,
}

/// Pairing algorithm for one stage.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MatchFormat {
    SingleElimination,
    RoundRobin,
    Swiss { rounds: u32, pairing: SwissPairing },
}

impl TournamentFormat {
    /// Generation algorithm for this format. `swiss_rounds` only applies to swiss.
    pub fn match_format(self, swiss_rounds: u32) -> MatchFormat {
        match self {
            TournamentFormat::Elimination => MatchFormat::SingleElimination,
            TournamentFormat::Groups | TournamentFormat::League => MatchFormat::RoundRobin,
            TournamentFormat::Swiss => MatchFormat::Swiss {
                rounds: swiss_rounds,
                pairing: SwissPairing::Simplified,
            },
        }
    }
}

impl From<TournamentFormat> for MatchFormat {
    fn from(format: TournamentFormat) -> Self {
        format.match_format(DEFAULT_SWISS_ROUNDS)
    }
}

/// Generate the scheduled matches of `stage_id` for the eligible (confirmed) participants.
///
/// Fails with [`TournamentError::NotEnoughParticipants`] when fewer than 2 are eligible;
/// nothing is generated in that case.
pub fn generate_matches(
    participants: &[Participant],
    stage_id: StageId,
    format: MatchFormat,
) -> Result<Vec<GameMatch>, TournamentError> {
    let eligible: Vec<Participant> = participants
        .iter()
        .filter(|p| p.is_eligible())
        .cloned()
        .collect();

    if eligible.len() < 2 {
        return Err(TournamentError::NotEnoughParticipants {
            eligible: eligible.len(),
        });
    }

    let matches = match format {
        MatchFormat::SingleElimination => single_elimination(&eligible, stage_id),
        MatchFormat::RoundRobin => round_robin(&eligible, stage_id),
        MatchFormat::Swiss {
            rounds,
            pairing: SwissPairing::Simplified,
        } => swiss_simplified(&eligible, stage_id, rounds),
    };
    Ok(matches)
}

/// Smallest power of two holding `n` participants, at least 2.
pub fn bracket_size(n: usize) -> usize {
    n.next_power_of_two().max(2)
}

/// Pair seeds sequentially (1v2, 3v4, ...) into `bracket_size / 2` matches.
/// Slots left over once the list runs out are byes.
fn single_elimination(participants: &[Participant], stage_id: StageId) -> Vec<GameMatch> {
    let sorted = normalize(participants);
    let size = bracket_size(sorted.len());
    let mut ids = sorted.iter().map(|p| p.id);

    (0..size / 2)
        .map(|_| {
            let p1 = ids.next();
            let p2 = ids.next();
            GameMatch::scheduled(stage_id, p1, p2).in_round(1)
        })
        .collect()
}

/// Every unordered pair once, in input order.
fn round_robin(participants: &[Participant], stage_id: StageId) -> Vec<GameMatch> {
    let ids: Vec<ParticipantId> = participants.iter().map(|p| p.id).collect();
    let mut matches = Vec::with_capacity(ids.len() * ids.len().saturating_sub(1) / 2);
    for (i, &a) in ids.iter().enumerate() {
        for &b in &ids[i + 1..] {
            matches.push(GameMatch::scheduled(stage_id, Some(a), Some(b)));
        }
    }
    matches
}

/// Top half vs bottom half by index, repeated for every round. With an odd
/// count the extra participant lands in the bottom half and sits out.
fn swiss_simplified(participants: &[Participant], stage_id: StageId, rounds: u32) -> Vec<GameMatch> {
    let sorted = normalize(participants);
    let half = sorted.len() / 2;
    let (top, bottom) = sorted.split_at(half);

    let mut matches = Vec::with_capacity(rounds as usize * half);
    for round in 1..=rounds {
        for (a, b) in top.iter().zip(bottom) {
            matches.push(GameMatch::scheduled(stage_id, Some(a.id), Some(b.id)).in_round(round));
        }
    }
    matches
}
