//! Seeding: order participants by seed before pairing.

use crate::models::Participant;

/// Sort participants ascending by seed. Unseeded participants go after every
/// seeded one; ties (equal or missing seeds) keep their input order.
pub fn normalize(participants: &[Participant]) -> Vec<Participant> {
    let mut sorted = participants.to_vec();
    // Stable sort; `None` must rank after any `Some`, hence the explicit flag.
    sorted.sort_by_key(|p| match p.seed {
        Some(seed) => (false, seed),
        None => (true, 0),
    });
    sorted
}
