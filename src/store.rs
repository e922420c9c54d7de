//! In-memory record store: persists tournaments, participants, stages, matches and
//! circuits, calls into the pure logic, and publishes change events so readers of
//! derived data (rankings) know when to refresh.

use crate::config::Config;
use crate::logic::{compute_circuit_standings, compute_standings, generate_matches, rank_with_previous};
use crate::models::{
    Circuit, CircuitId, CircuitTournament, GameMatch, MatchId, MatchStatus, Participant,
    ParticipantId, ParticipantStatus, RankedEntry, RankingEntry, Stage, StageId, StageStatus,
    StageType, Tournament, TournamentError, TournamentFormat, TournamentId, TournamentStatus,
    MAX_POINTS_MULTIPLIER,
};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::broadcast;

/// Published after every mutation that makes derived data stale.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChangeEvent {
    ParticipantUpdated {
        tournament_id: TournamentId,
        participant_id: ParticipantId,
    },
    MatchesGenerated {
        tournament_id: TournamentId,
        stage_id: StageId,
        count: usize,
    },
    MatchUpdated {
        tournament_id: TournamentId,
        match_id: MatchId,
    },
    StageCompleted {
        tournament_id: TournamentId,
        stage_id: StageId,
    },
}

impl ChangeEvent {
    /// Tournament whose ranking (and the rankings of circuits containing it) is stale.
    pub fn tournament_id(&self) -> TournamentId {
        match self {
            ChangeEvent::ParticipantUpdated { tournament_id, .. }
            | ChangeEvent::MatchesGenerated { tournament_id, .. }
            | ChangeEvent::MatchUpdated { tournament_id, .. }
            | ChangeEvent::StageCompleted { tournament_id, .. } => *tournament_id,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
enum RankingScope {
    Tournament(TournamentId),
    Circuit(CircuitId),
}

/// Last two distinct rankings of a scope, for rank movement.
#[derive(Default)]
struct RankingSnapshot {
    current: Vec<RankingEntry>,
    previous: Option<Vec<RankingEntry>>,
}

pub struct Store {
    tournaments: HashMap<TournamentId, Tournament>,
    /// Registration order is kept; round robin pairs in this order.
    participants: Vec<Participant>,
    stages: HashMap<StageId, Stage>,
    /// Insertion order is kept; standings tie-breaks depend on it.
    matches: Vec<GameMatch>,
    circuits: HashMap<CircuitId, Circuit>,
    rankings: HashMap<RankingScope, RankingSnapshot>,
    events: broadcast::Sender<ChangeEvent>,
}

impl Store {
    /// Empty store; each subscriber buffers up to `event_capacity` events.
    pub fn new(event_capacity: usize) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            tournaments: HashMap::new(),
            participants: Vec::new(),
            stages: HashMap::new(),
            matches: Vec::new(),
            circuits: HashMap::new(),
            rankings: HashMap::new(),
            events,
        }
    }

    /// Receive change events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: ChangeEvent) {
        log::debug!("Change event: {:?}", event);
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    // --- Tournaments ---

    pub fn create_tournament(
        &mut self,
        name: impl Into<String>,
        format: TournamentFormat,
        swiss_rounds: u32,
    ) -> Tournament {
        let tournament = Tournament::new(name, format, swiss_rounds);
        log::info!("Created tournament {} ({:?})", tournament.id, tournament.format);
        self.tournaments.insert(tournament.id, tournament.clone());
        tournament
    }

    pub fn tournament(&self, id: TournamentId) -> Result<&Tournament, TournamentError> {
        self.tournaments
            .get(&id)
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    // --- Participants ---

    /// Register a participant (status `registered`). Seeds must be positive.
    pub fn add_participant(
        &mut self,
        tournament_id: TournamentId,
        team_name: Option<String>,
        seed: Option<u32>,
    ) -> Result<Participant, TournamentError> {
        self.tournament(tournament_id)?;
        if seed == Some(0) {
            return Err(TournamentError::InvalidSeed);
        }
        let mut participant = Participant::new(tournament_id);
        participant.team_name = team_name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        participant.seed = seed;
        self.participants.push(participant.clone());
        self.publish(ChangeEvent::ParticipantUpdated {
            tournament_id,
            participant_id: participant.id,
        });
        Ok(participant)
    }

    /// Participants of a tournament in registration order.
    pub fn participants(&self, tournament_id: TournamentId) -> Vec<&Participant> {
        self.participants
            .iter()
            .filter(|p| p.tournament_id == tournament_id)
            .collect()
    }

    /// A participant of `tournament_id`; participants of other tournaments are not found.
    fn participant_mut(
        &mut self,
        tournament_id: TournamentId,
        id: ParticipantId,
    ) -> Result<&mut Participant, TournamentError> {
        self.tournament(tournament_id)?;
        self.participants
            .iter_mut()
            .find(|p| p.id == id && p.tournament_id == tournament_id)
            .ok_or(TournamentError::ParticipantNotFound(id))
    }

    pub fn set_participant_status(
        &mut self,
        tournament_id: TournamentId,
        id: ParticipantId,
        status: ParticipantStatus,
    ) -> Result<Participant, TournamentError> {
        let p = self.participant_mut(tournament_id, id)?;
        p.status = status;
        let p = p.clone();
        self.publish(ChangeEvent::ParticipantUpdated {
            tournament_id: p.tournament_id,
            participant_id: p.id,
        });
        Ok(p)
    }

    /// Set or clear a seed. Seeds must be positive.
    pub fn set_participant_seed(
        &mut self,
        tournament_id: TournamentId,
        id: ParticipantId,
        seed: Option<u32>,
    ) -> Result<Participant, TournamentError> {
        if seed == Some(0) {
            return Err(TournamentError::InvalidSeed);
        }
        let p = self.participant_mut(tournament_id, id)?;
        p.seed = seed;
        let p = p.clone();
        self.publish(ChangeEvent::ParticipantUpdated {
            tournament_id: p.tournament_id,
            participant_id: p.id,
        });
        Ok(p)
    }

    // --- Stages and matches ---

    pub fn create_stage(
        &mut self,
        tournament_id: TournamentId,
        name: impl Into<String>,
        stage_type: StageType,
        order: u32,
    ) -> Result<Stage, TournamentError> {
        self.tournament(tournament_id)?;
        let stage = Stage::new(tournament_id, name, stage_type, order);
        self.stages.insert(stage.id, stage.clone());
        Ok(stage)
    }

    pub fn stage(&self, id: StageId) -> Result<&Stage, TournamentError> {
        self.stages.get(&id).ok_or(TournamentError::StageNotFound(id))
    }

    /// Stages of a tournament by ordering index.
    pub fn stages(&self, tournament_id: TournamentId) -> Vec<&Stage> {
        let mut stages: Vec<_> = self
            .stages
            .values()
            .filter(|s| s.tournament_id == tournament_id)
            .collect();
        stages.sort_by_key(|s| s.order);
        stages
    }

    /// Generate and persist the matches of a pending stage from the tournament's
    /// confirmed participants, then mark the stage active.
    pub fn generate_stage_matches(
        &mut self,
        stage_id: StageId,
        format: TournamentFormat,
    ) -> Result<Vec<GameMatch>, TournamentError> {
        let stage = self.stage(stage_id)?;
        if stage.status != StageStatus::Pending {
            return Err(TournamentError::InvalidState);
        }
        let tournament_id = stage.tournament_id;
        let swiss_rounds = self.tournament(tournament_id)?.swiss_rounds;

        let participants: Vec<Participant> = self
            .participants(tournament_id)
            .into_iter()
            .cloned()
            .collect();
        let matches = generate_matches(&participants, stage_id, format.match_format(swiss_rounds))?;

        if let Some(stage) = self.stages.get_mut(&stage_id) {
            stage.activate()?;
        }
        if let Some(t) = self.tournaments.get_mut(&tournament_id) {
            if matches!(t.status, TournamentStatus::Draft | TournamentStatus::Registration) {
                t.status = TournamentStatus::Active;
            }
        }
        self.matches.extend(matches.iter().cloned());
        log::info!(
            "Generated {} matches for stage {} ({:?})",
            matches.len(),
            stage_id,
            format
        );
        self.publish(ChangeEvent::MatchesGenerated {
            tournament_id,
            stage_id,
            count: matches.len(),
        });
        Ok(matches)
    }

    /// Matches of a stage in generation order.
    pub fn stage_matches(&self, stage_id: StageId) -> Vec<&GameMatch> {
        self.matches.iter().filter(|m| m.stage_id == stage_id).collect()
    }

    /// Matches of every stage of a tournament, stages by ordering index.
    pub fn tournament_matches(&self, tournament_id: TournamentId) -> Vec<GameMatch> {
        self.stages(tournament_id)
            .into_iter()
            .flat_map(|s| self.stage_matches(s.id))
            .cloned()
            .collect()
    }

    /// Record a score on a match of an active stage; the match becomes completed.
    pub fn record_match_result(
        &mut self,
        match_id: MatchId,
        score_p1: u32,
        score_p2: u32,
    ) -> Result<GameMatch, TournamentError> {
        let idx = self
            .matches
            .iter()
            .position(|m| m.id == match_id)
            .ok_or(TournamentError::MatchNotFound(match_id))?;
        let stage = self.stage(self.matches[idx].stage_id)?;
        if stage.status != StageStatus::Active {
            return Err(TournamentError::InvalidState);
        }
        let tournament_id = stage.tournament_id;

        let m = &mut self.matches[idx];
        m.record_result(score_p1, score_p2)?;
        let m = m.clone();
        log::info!("Recorded result {}-{} for match {}", score_p1, score_p2, match_id);
        self.publish(ChangeEvent::MatchUpdated {
            tournament_id,
            match_id,
        });
        Ok(m)
    }

    /// Close an active stage once every playable match is completed.
    /// Matches with two empty slots are never played and are ignored.
    pub fn complete_stage(&mut self, stage_id: StageId) -> Result<Stage, TournamentError> {
        let tournament_id = self.stage(stage_id)?.tournament_id;
        let open = self
            .stage_matches(stage_id)
            .into_iter()
            .any(|m| m.status != MatchStatus::Completed && m.participants().next().is_some());
        if open {
            return Err(TournamentError::InvalidState);
        }
        let stage = self
            .stages
            .get_mut(&stage_id)
            .ok_or(TournamentError::StageNotFound(stage_id))?;
        stage.complete()?;
        let stage = stage.clone();
        log::info!("Stage {} completed", stage_id);
        self.publish(ChangeEvent::StageCompleted {
            tournament_id,
            stage_id,
        });
        Ok(stage)
    }

    // --- Rankings ---

    fn snapshot(&mut self, scope: RankingScope, current: Vec<RankingEntry>) -> Vec<RankedEntry> {
        let snap = self.rankings.entry(scope).or_default();
        if snap.current != current {
            let old = std::mem::replace(&mut snap.current, current);
            snap.previous = Some(old);
        }
        rank_with_previous(snap.current.clone(), snap.previous.as_deref())
    }

    /// Ranking over the completed matches of all the tournament's stages.
    pub fn tournament_ranking(
        &mut self,
        tournament_id: TournamentId,
    ) -> Result<Vec<RankedEntry>, TournamentError> {
        self.tournament(tournament_id)?;
        let standings = compute_standings(&self.tournament_matches(tournament_id))?;
        Ok(self.snapshot(RankingScope::Tournament(tournament_id), standings))
    }

    // --- Circuits ---

    pub fn create_circuit(&mut self, name: impl Into<String>) -> Circuit {
        let circuit = Circuit::new(name);
        log::info!("Created circuit {}", circuit.id);
        self.circuits.insert(circuit.id, circuit.clone());
        circuit
    }

    pub fn circuit(&self, id: CircuitId) -> Result<&Circuit, TournamentError> {
        self.circuits.get(&id).ok_or(TournamentError::CircuitNotFound(id))
    }

    /// Attach (or re-weight) a tournament in a circuit.
    pub fn add_circuit_tournament(
        &mut self,
        circuit_id: CircuitId,
        tournament_id: TournamentId,
        order: u32,
        points_multiplier: u32,
    ) -> Result<Circuit, TournamentError> {
        if !(1..=MAX_POINTS_MULTIPLIER).contains(&points_multiplier) {
            return Err(TournamentError::InvalidMultiplier {
                max: MAX_POINTS_MULTIPLIER,
            });
        }
        self.tournament(tournament_id)?;
        let circuit = self
            .circuits
            .get_mut(&circuit_id)
            .ok_or(TournamentError::CircuitNotFound(circuit_id))?;
        circuit.tournaments.retain(|t| t.tournament_id != tournament_id);
        circuit.tournaments.push(CircuitTournament {
            tournament_id,
            order,
            points_multiplier,
        });
        Ok(circuit.clone())
    }

    /// Combined ranking of the circuit's tournaments with their multipliers.
    pub fn circuit_ranking(&mut self, circuit_id: CircuitId) -> Result<Vec<RankedEntry>, TournamentError> {
        let members: Vec<(u32, Vec<GameMatch>)> = self
            .circuit(circuit_id)?
            .ordered_tournaments()
            .into_iter()
            .map(|ct| (ct.points_multiplier, self.tournament_matches(ct.tournament_id)))
            .collect();
        let borrowed: Vec<(u32, &[GameMatch])> =
            members.iter().map(|(m, ms)| (*m, ms.as_slice())).collect();
        let standings = compute_circuit_standings(&borrowed)?;
        Ok(self.snapshot(RankingScope::Circuit(circuit_id), standings))
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Config::default().event_capacity)
    }
}
