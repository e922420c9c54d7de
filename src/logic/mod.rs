//! Pure tournament logic: seeding, match generation, standings, export.

mod export;
mod generator;
mod seeding;
mod standings;

pub use export::standings_csv;
pub use generator::{
    bracket_size, generate_matches, MatchFormat, SwissPairing, DEFAULT_SWISS_ROUNDS,
};
pub use seeding::normalize;
pub use standings::{compute_circuit_standings, compute_standings, rank_with_previous, WIN_POINTS};
