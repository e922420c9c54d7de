//! Data structures: tournaments, participants, stages, matches, circuits, rankings.

mod circuit;
mod game;
mod participant;
mod ranking;
mod stage;
mod tournament;

pub use circuit::{Circuit, CircuitId, CircuitStatus, CircuitTournament, MAX_POINTS_MULTIPLIER};
pub use game::{GameMatch, MatchId, MatchStatus, Slot};
pub use participant::{Participant, ParticipantId, ParticipantStatus};
pub use ranking::{RankedEntry, RankingEntry};
pub use stage::{Stage, StageId, StageStatus, StageType};
pub use tournament::{
    ErrorKind, Tournament, TournamentError, TournamentFormat, TournamentId, TournamentStatus,
};
