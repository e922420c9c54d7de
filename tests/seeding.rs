//! Integration tests for seed normalization.

use circuit_tournament_web::{normalize, Participant};
use uuid::Uuid;

fn seeded(seeds: &[Option<u32>]) -> Vec<Participant> {
    let tournament_id = Uuid::new_v4();
    seeds
        .iter()
        .map(|&seed| {
            let mut p = Participant::new(tournament_id);
            p.seed = seed;
            p
        })
        .collect()
}

fn positions(input: &[Participant], output: &[Participant]) -> Vec<usize> {
    output
        .iter()
        .map(|o| input.iter().position(|i| i.id == o.id).unwrap())
        .collect()
}

#[test]
fn empty_input_gives_empty_output() {
    assert!(normalize(&[]).is_empty());
}

#[test]
fn unseeded_sort_last_in_input_order() {
    let input = seeded(&[None, Some(2), None, Some(1), None]);
    let out = normalize(&input);
    assert_eq!(positions(&input, &out), vec![3, 1, 0, 2, 4]);
}

#[test]
fn equal_seeds_keep_input_order() {
    let input = seeded(&[Some(2), Some(1), Some(2), Some(1)]);
    let out = normalize(&input);
    assert_eq!(positions(&input, &out), vec![1, 3, 0, 2]);
}

#[test]
fn large_seeds_still_sort_before_unseeded() {
    let input = seeded(&[None, Some(u32::MAX), Some(1000)]);
    let out = normalize(&input);
    assert_eq!(positions(&input, &out), vec![2, 1, 0]);
}
