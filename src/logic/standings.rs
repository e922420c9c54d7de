//! Standings: aggregate completed matches into an ordered ranking.

use crate::models::{GameMatch, ParticipantId, RankedEntry, RankingEntry, TournamentError};
use std::collections::HashMap;

/// Points awarded for a win. Draws award nothing.
pub const WIN_POINTS: u32 = 3;

/// Entries in first-appearance order, with an index for lookups.
#[derive(Default)]
struct Tally {
    entries: Vec<RankingEntry>,
    index: HashMap<ParticipantId, usize>,
}

impl Tally {
    fn entry(&mut self, id: ParticipantId) -> &mut RankingEntry {
        let idx = match self.index.get(&id) {
            Some(&idx) => idx,
            None => {
                self.entries.push(RankingEntry::new(id));
                let idx = self.entries.len() - 1;
                self.index.insert(id, idx);
                idx
            }
        };
        &mut self.entries[idx]
    }

    /// Sort by points, then wins, both descending. Stable, so remaining ties
    /// keep first-appearance order.
    fn into_ranking(mut self) -> Vec<RankingEntry> {
        self.entries
            .sort_by(|a, b| b.points.cmp(&a.points).then(b.wins.cmp(&a.wins)));
        self.entries
    }
}

/// Compute the ranking from a snapshot of matches. Only `Completed` matches count.
///
/// A completed match whose winner is not one of its slots, that has no participants,
/// or whose winner contradicts its scores is rejected instead of being counted.
pub fn compute_standings(matches: &[GameMatch]) -> Result<Vec<RankingEntry>, TournamentError> {
    let mut tally = Tally::default();
    for m in matches.iter().filter(|m| m.is_completed()) {
        apply_match(&mut tally, m)?;
    }
    Ok(tally.into_ranking())
}

fn apply_match(tally: &mut Tally, m: &GameMatch) -> Result<(), TournamentError> {
    m.check_consistency()?;

    for id in m.participants() {
        tally.entry(id).matches_played += 1;
    }
    if let Some(winner) = m.winner_id {
        let w = tally.entry(winner);
        w.wins += 1;
        w.points += WIN_POINTS;
        if let Some(loser) = m.loser_id() {
            tally.entry(loser).losses += 1;
        }
    }
    Ok(())
}

/// Merge several tournaments into one ranking, scaling each tournament's points by
/// its multiplier. Tournaments are given in circuit order. Fails with
/// [`TournamentError::PointsOverflow`] instead of wrapping.
pub fn compute_circuit_standings(
    tournaments: &[(u32, &[GameMatch])],
) -> Result<Vec<RankingEntry>, TournamentError> {
    let mut tally = Tally::default();
    for &(multiplier, matches) in tournaments {
        for e in compute_standings(matches)? {
            let total = tally.entry(e.participant_id);
            let points = e
                .points
                .checked_mul(multiplier)
                .and_then(|scaled| scaled.checked_add(total.points))
                .ok_or(TournamentError::PointsOverflow(e.participant_id))?;
            total.points = points;
            total.wins += e.wins;
            total.losses += e.losses;
            total.matches_played += e.matches_played;
        }
    }
    Ok(tally.into_ranking())
}

/// Attach 1-based positions and movement relative to `previous` (if any).
pub fn rank_with_previous(
    current: Vec<RankingEntry>,
    previous: Option<&[RankingEntry]>,
) -> Vec<RankedEntry> {
    let previous_positions: HashMap<ParticipantId, usize> = previous
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, e)| (e.participant_id, i + 1))
        .collect();

    current
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let position = i + 1;
            let rank_delta = previous_positions
                .get(&entry.participant_id)
                .map(|&prev| position as i64 - prev as i64);
            RankedEntry {
                position,
                entry,
                rank_delta,
            }
        })
        .collect()
}
