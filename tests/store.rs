//! Integration tests for the record store: generation handoff, results, rankings, circuits.

use circuit_tournament_web::{
    ChangeEvent, Config, MatchStatus, ParticipantId, ParticipantStatus, StageId, StageStatus, StageType,
    Store, TournamentError, TournamentFormat, TournamentId, TournamentStatus,
    MAX_POINTS_MULTIPLIER,
};

/// Tournament with `n` confirmed, seeded participants and one pending stage.
fn setup(
    store: &mut Store,
    format: TournamentFormat,
    n: u32,
) -> (TournamentId, StageId, Vec<ParticipantId>) {
    let t = store.create_tournament("Open", format, 3);
    let ids = (1..=n)
        .map(|seed| {
            let p = store
                .add_participant(t.id, Some(format!("Team {seed}")), Some(seed))
                .unwrap();
            store
                .set_participant_status(t.id, p.id, ParticipantStatus::Confirmed)
                .unwrap();
            p.id
        })
        .collect();
    let stage = store.create_stage(t.id, "Main", StageType::Bracket, 0).unwrap();
    (t.id, stage.id, ids)
}

#[test]
fn generation_persists_matches_and_activates_stage() {
    let mut store = Store::default();
    let (tid, sid, _) = setup(&mut store, TournamentFormat::Elimination, 4);

    let matches = store
        .generate_stage_matches(sid, TournamentFormat::Elimination)
        .unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(store.stage_matches(sid).len(), 2);
    assert_eq!(store.stage(sid).unwrap().status, StageStatus::Active);
    assert_eq!(store.tournament(tid).unwrap().status, TournamentStatus::Active);

    // A stage is generated once.
    assert_eq!(
        store.generate_stage_matches(sid, TournamentFormat::Elimination),
        Err(TournamentError::InvalidState)
    );
}

#[test]
fn registered_participants_are_not_paired() {
    let mut store = Store::default();
    let t = store.create_tournament("Open", TournamentFormat::League, 3);
    store.add_participant(t.id, None, None).unwrap();
    let p = store.add_participant(t.id, None, None).unwrap();
    store
        .set_participant_status(t.id, p.id, ParticipantStatus::Confirmed)
        .unwrap();
    let stage = store.create_stage(t.id, "League", StageType::League, 0).unwrap();

    assert_eq!(
        store.generate_stage_matches(stage.id, TournamentFormat::League),
        Err(TournamentError::NotEnoughParticipants { eligible: 1 })
    );
    assert!(store.stage_matches(stage.id).is_empty());
    assert_eq!(store.stage(stage.id).unwrap().status, StageStatus::Pending);
}

#[test]
fn swiss_uses_tournament_round_count() {
    let mut store = Store::default();
    let (_, sid, _) = setup(&mut store, TournamentFormat::Swiss, 4);
    let matches = store.generate_stage_matches(sid, TournamentFormat::Swiss).unwrap();
    assert_eq!(matches.len(), 3 * 2);
}

#[test]
fn seed_must_be_positive() {
    let mut store = Store::default();
    let t = store.create_tournament("Open", TournamentFormat::Elimination, 3);
    assert_eq!(
        store.add_participant(t.id, None, Some(0)),
        Err(TournamentError::InvalidSeed)
    );
    let p = store.add_participant(t.id, None, Some(4)).unwrap();
    assert_eq!(
        store.set_participant_seed(t.id, p.id, Some(0)),
        Err(TournamentError::InvalidSeed)
    );
    assert_eq!(store.set_participant_seed(t.id, p.id, None).unwrap().seed, None);
}

#[test]
fn results_feed_ranking_with_rank_movement() {
    let mut store = Store::default();
    let (tid, sid, p) = setup(&mut store, TournamentFormat::League, 3);
    let matches = store.generate_stage_matches(sid, TournamentFormat::League).unwrap();
    // Round robin in registration order: (0,1), (0,2), (1,2).
    store.record_match_result(matches[0].id, 2, 0).unwrap();

    let first = store.tournament_ranking(tid).unwrap();
    assert_eq!(first[0].entry.participant_id, p[0]);
    assert!(first.iter().all(|r| r.rank_delta.is_none()));

    // Same snapshot again: unchanged.
    assert_eq!(store.tournament_ranking(tid).unwrap(), first);

    store.record_match_result(matches[2].id, 3, 0).unwrap();
    store.record_match_result(matches[1].id, 0, 1).unwrap();
    let second = store.tournament_ranking(tid).unwrap();
    let order: Vec<_> = second.iter().map(|r| r.entry.participant_id).collect();
    // p0: 3 pts (1W), p1: 3 pts (1W), p2: 3 pts (1W); first-appearance order.
    assert_eq!(order, vec![p[0], p[1], p[2]]);
    assert_eq!(second[1].rank_delta, Some(0));
    assert_eq!(second[2].rank_delta, None);
}

#[test]
fn results_require_active_stage() {
    let mut store = Store::default();
    let (_, sid, _) = setup(&mut store, TournamentFormat::Elimination, 2);
    let m = store
        .generate_stage_matches(sid, TournamentFormat::Elimination)
        .unwrap()
        .remove(0);
    store.record_match_result(m.id, 1, 0).unwrap();
    store.complete_stage(sid).unwrap();
    assert_eq!(
        store.record_match_result(m.id, 0, 1),
        Err(TournamentError::InvalidState)
    );
}

#[test]
fn stage_completes_only_when_playable_matches_are_done() {
    let mut store = Store::default();
    let (_, sid, _) = setup(&mut store, TournamentFormat::Elimination, 5);
    let matches = store
        .generate_stage_matches(sid, TournamentFormat::Elimination)
        .unwrap();
    assert_eq!(store.complete_stage(sid), Err(TournamentError::InvalidState));

    for m in &matches {
        if m.participants().next().is_some() {
            store.record_match_result(m.id, 1, 0).unwrap();
        }
    }
    let stage = store.complete_stage(sid).unwrap();
    assert_eq!(stage.status, StageStatus::Completed);
    assert!(store
        .stage_matches(sid)
        .iter()
        .filter(|m| m.participants().next().is_some())
        .all(|m| m.status == MatchStatus::Completed));
}

#[test]
fn bye_cannot_be_recorded_as_winner() {
    let mut store = Store::default();
    let (_, sid, _) = setup(&mut store, TournamentFormat::Elimination, 3);
    let matches = store
        .generate_stage_matches(sid, TournamentFormat::Elimination)
        .unwrap();
    assert!(matches[1].is_bye());
    assert!(matches!(
        store.record_match_result(matches[1].id, 0, 1),
        Err(TournamentError::WinnerIsBye { .. })
    ));
}

#[test]
fn circuit_ranking_applies_multipliers() {
    let mut store = Store::default();
    let circuit = store.create_circuit("Season");

    let t1 = store.create_tournament("Leg 1", TournamentFormat::League, 3);
    let t2 = store.create_tournament("Leg 2", TournamentFormat::League, 3);
    let player_a = store.add_participant(t1.id, Some("A".into()), None).unwrap();
    let player_b = store.add_participant(t1.id, Some("B".into()), None).unwrap();
    let player_c = store.add_participant(t2.id, Some("C".into()), None).unwrap();
    let player_d = store.add_participant(t2.id, Some("D".into()), None).unwrap();
    for p in [&player_a, &player_b, &player_c, &player_d] {
        store
            .set_participant_status(p.tournament_id, p.id, ParticipantStatus::Confirmed)
            .unwrap();
    }
    for t in [&t1, &t2] {
        let stage = store.create_stage(t.id, "League", StageType::League, 0).unwrap();
        let m = store
            .generate_stage_matches(stage.id, TournamentFormat::League)
            .unwrap()
            .remove(0);
        store.record_match_result(m.id, 1, 0).unwrap();
    }

    assert_eq!(
        store.add_circuit_tournament(circuit.id, t1.id, 0, 0),
        Err(TournamentError::InvalidMultiplier {
            max: MAX_POINTS_MULTIPLIER
        })
    );
    store.add_circuit_tournament(circuit.id, t1.id, 0, 1).unwrap();
    store.add_circuit_tournament(circuit.id, t2.id, 1, 2).unwrap();

    let ranking = store.circuit_ranking(circuit.id).unwrap();
    assert_eq!(ranking.len(), 4);
    assert_eq!(ranking[0].entry.participant_id, player_c.id);
    assert_eq!(ranking[0].entry.points, 6);
    assert_eq!(ranking[1].entry.participant_id, player_a.id);
    assert_eq!(ranking[1].entry.points, 3);
}

#[test]
fn oversized_multiplier_is_rejected() {
    let mut store = Store::default();
    let circuit = store.create_circuit("Season");
    let (tid, sid, _) = setup(&mut store, TournamentFormat::League, 2);
    let m = store
        .generate_stage_matches(sid, TournamentFormat::League)
        .unwrap()
        .remove(0);
    store.record_match_result(m.id, 1, 0).unwrap();

    for multiplier in [MAX_POINTS_MULTIPLIER + 1, u32::MAX] {
        assert_eq!(
            store.add_circuit_tournament(circuit.id, tid, 0, multiplier),
            Err(TournamentError::InvalidMultiplier {
                max: MAX_POINTS_MULTIPLIER
            })
        );
    }
    assert!(store.circuit(circuit.id).unwrap().tournaments.is_empty());

    store
        .add_circuit_tournament(circuit.id, tid, 0, MAX_POINTS_MULTIPLIER)
        .unwrap();
    let ranking = store.circuit_ranking(circuit.id).unwrap();
    assert_eq!(ranking[0].entry.points, 3 * MAX_POINTS_MULTIPLIER);
}

#[test]
fn participant_updates_are_scoped_to_their_tournament() {
    let mut store = Store::default();
    let t1 = store.create_tournament("Leg 1", TournamentFormat::League, 3);
    let t2 = store.create_tournament("Leg 2", TournamentFormat::League, 3);
    let p = store.add_participant(t2.id, None, Some(1)).unwrap();

    assert_eq!(
        store.set_participant_status(t1.id, p.id, ParticipantStatus::Confirmed),
        Err(TournamentError::ParticipantNotFound(p.id))
    );
    assert_eq!(
        store.set_participant_seed(t1.id, p.id, Some(2)),
        Err(TournamentError::ParticipantNotFound(p.id))
    );
    let missing = uuid::Uuid::new_v4();
    assert_eq!(
        store.set_participant_status(missing, p.id, ParticipantStatus::Confirmed),
        Err(TournamentError::TournamentNotFound(missing))
    );

    let unchanged = store.participants(t2.id)[0];
    assert_eq!(unchanged.status, ParticipantStatus::Registered);
    assert_eq!(unchanged.seed, Some(1));
}

#[test]
fn default_store_uses_configured_event_capacity() {
    let mut store = Store::default();
    let t = store.create_tournament("Open", TournamentFormat::League, 3);
    let capacity = Config::default().event_capacity;

    let mut events = store.subscribe();
    for _ in 0..capacity {
        store.add_participant(t.id, None, None).unwrap();
    }
    assert!(events.try_recv().is_ok());

    // One more than the buffer holds drops the oldest event.
    let mut events = store.subscribe();
    for _ in 0..=capacity {
        store.add_participant(t.id, None, None).unwrap();
    }
    assert!(matches!(
        events.try_recv(),
        Err(tokio::sync::broadcast::error::TryRecvError::Lagged(_))
    ));
}

#[test]
fn mutations_publish_change_events() {
    let mut store = Store::default();
    let mut events = store.subscribe();
    let (tid, sid, _) = setup(&mut store, TournamentFormat::Elimination, 2);
    let m = store
        .generate_stage_matches(sid, TournamentFormat::Elimination)
        .unwrap()
        .remove(0);
    store.record_match_result(m.id, 1, 0).unwrap();

    let mut received = Vec::new();
    while let Ok(event) = events.try_recv() {
        assert_eq!(event.tournament_id(), tid);
        received.push(event);
    }
    assert!(received.contains(&ChangeEvent::MatchesGenerated {
        tournament_id: tid,
        stage_id: sid,
        count: 1,
    }));
    assert_eq!(
        received.last(),
        Some(&ChangeEvent::MatchUpdated {
            tournament_id: tid,
            match_id: m.id,
        })
    );
}

#[test]
fn unknown_ids_are_not_found() {
    let mut store = Store::default();
    let id = uuid::Uuid::new_v4();
    assert_eq!(
        store.tournament_ranking(id),
        Err(TournamentError::TournamentNotFound(id))
    );
    assert_eq!(
        store.generate_stage_matches(id, TournamentFormat::League),
        Err(TournamentError::StageNotFound(id))
    );
    assert_eq!(
        store.record_match_result(id, 1, 0),
        Err(TournamentError::MatchNotFound(id))
    );
}
