//! Tournament and circuit organizer: library with models, match generation,
//! standings, and an in-memory record store.

pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use config::Config;
pub use logic::{
    bracket_size, compute_circuit_standings, compute_standings, generate_matches, normalize,
    rank_with_previous, standings_csv, MatchFormat, SwissPairing, DEFAULT_SWISS_ROUNDS, WIN_POINTS,
};
pub use models::{
    Circuit, CircuitId, CircuitStatus, CircuitTournament, ErrorKind, GameMatch, MatchId,
    MatchStatus, Participant, ParticipantId, ParticipantStatus, RankedEntry, RankingEntry, Slot,
    Stage, StageId, StageStatus, StageType, Tournament, TournamentError, TournamentFormat,
    TournamentId, TournamentStatus, MAX_POINTS_MULTIPLIER,
};
pub use store::{ChangeEvent, Store};
