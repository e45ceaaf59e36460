//! Integration tests for result entry: validation, propagation, overwrite, clear.

mod common;

use common::{record, roster};
use competition_bracket::{
    build, clear_results, record_result, Bracket, BracketError, BracketState, Format,
    MatchMetadata,
};

fn five() -> Bracket {
    build(&roster(5), Format::Standard, None).unwrap()
}

fn slot_name(bracket: &Bracket, id: u32, side_a: bool) -> Option<String> {
    let m = bracket.find_match(id).unwrap();
    let p = if side_a { &m.participant_a } else { &m.participant_b };
    p.as_ref().map(|p| p.name.clone())
}

#[test]
fn equal_non_zero_scores_are_rejected() {
    let mut b = five();
    assert_eq!(
        record_result(&mut b, 1, 3, 3, MatchMetadata::default()),
        Err(BracketError::InvalidScore { score_a: 3, score_b: 3 })
    );
}

#[test]
fn unknown_match_is_rejected() {
    let mut b = five();
    assert_eq!(
        record_result(&mut b, 99, 1, 0, MatchMetadata::default()),
        Err(BracketError::MatchNotFound(99))
    );
}

#[test]
fn matches_missing_a_participant_are_rejected() {
    let mut b = five();
    // Round-1 bye.
    assert_eq!(
        record_result(&mut b, 3, 1, 0, MatchMetadata::default()),
        Err(BracketError::IncompleteMatch(3))
    );
    // Round 2 before its feeders are decided.
    assert_eq!(
        record_result(&mut b, 4, 1, 0, MatchMetadata::default()),
        Err(BracketError::IncompleteMatch(4))
    );
}

#[test]
fn failed_record_leaves_bracket_untouched() {
    let mut b = five();
    record(&mut b, 1, 3, 1);
    let before = b.clone();
    assert!(record_result(&mut b, 1, 2, 2, MatchMetadata::default()).is_err());
    assert_eq!(b, before);
}

#[test]
fn winner_moves_into_next_round_slot() {
    let mut b = five();
    record(&mut b, 1, 3, 1);
    assert_eq!(slot_name(&b, 4, true).as_deref(), Some("P0"));
    record(&mut b, 2, 0, 2);
    assert_eq!(slot_name(&b, 4, false).as_deref(), Some("P3"));
    record(&mut b, 4, 5, 2);
    assert_eq!(slot_name(&b, 6, true).as_deref(), Some("P0"));
    assert_eq!(slot_name(&b, 6, false).as_deref(), Some("P4"));
}

#[test]
fn changing_a_winner_retracts_downstream_results() {
    let mut b = five();
    record(&mut b, 1, 3, 1);
    record(&mut b, 2, 2, 0);
    record(&mut b, 4, 5, 2);
    assert_eq!(slot_name(&b, 6, true).as_deref(), Some("P0"));

    record(&mut b, 1, 1, 3);
    let semi = b.find_match(4).unwrap();
    assert_eq!(semi.participant_a.as_ref().unwrap().name, "P1");
    assert_eq!((semi.score_a, semi.score_b), (0, 0));
    assert_eq!(slot_name(&b, 6, true), None);
}

#[test]
fn resubmitting_the_same_winner_keeps_downstream_results() {
    let mut b = five();
    record(&mut b, 1, 3, 1);
    record(&mut b, 2, 2, 0);
    record(&mut b, 4, 5, 2);
    record(&mut b, 1, 4, 0);
    let semi = b.find_match(4).unwrap();
    assert_eq!((semi.score_a, semi.score_b), (5, 2));
    assert_eq!(b.find_match(1).unwrap().score_a, 4);
}

#[test]
fn zero_zero_unsets_a_result() {
    let mut b = five();
    record(&mut b, 1, 3, 1);
    record(&mut b, 1, 0, 0);
    assert!(!b.find_match(1).unwrap().is_decided());
    assert_eq!(slot_name(&b, 4, true), None);
}

#[test]
fn metadata_is_stored_as_given() {
    let mut b = five();
    let metadata = MatchMetadata {
        venue: Some("Hall B".to_string()),
        date: chrono::NaiveDate::from_ymd_opt(2026, 3, 14),
        queue: Some("7".to_string()),
        court: Some("Tatami 2".to_string()),
    };
    record_result(&mut b, 2, 1, 0, metadata.clone()).unwrap();
    assert_eq!(b.find_match(2).unwrap().metadata, metadata);
}

#[test]
fn state_follows_results() {
    let mut b = five();
    assert_eq!(b.state(), BracketState::Created);
    record(&mut b, 1, 3, 1);
    assert_eq!(b.state(), BracketState::InProgress);
    record(&mut b, 2, 2, 0);
    record(&mut b, 4, 5, 2);
    assert_eq!(b.state(), BracketState::InProgress);
    record(&mut b, 6, 1, 4);
    assert_eq!(b.state(), BracketState::Completed);
}

#[test]
fn a_score_of_zero_for_one_side_is_decisive() {
    let mut b = build(&roster(2), Format::Standard, None).unwrap();
    record(&mut b, 1, 0, 4);
    assert_eq!(b.find_match(1).unwrap().winner().unwrap().name, "P1");
    assert_eq!(b.state(), BracketState::Completed);
}

#[test]
fn clear_results_restores_post_build_shape() {
    let fresh = five();
    let mut b = fresh.clone();
    record(&mut b, 1, 3, 1);
    record(&mut b, 2, 2, 0);
    record(&mut b, 4, 5, 2);
    record(&mut b, 6, 1, 4);

    clear_results(&mut b);
    assert_eq!(b, fresh);
    assert_eq!(b.state(), BracketState::Created);
}

#[test]
fn clear_results_removes_graded_decider() {
    let p = roster(4);
    let fresh = build(&p, Format::Graded, None).unwrap();
    let mut b = fresh.clone();
    record(&mut b, 1, 3, 1);
    record(&mut b, 2, 3, 1);
    competition_bracket::open_decider(&mut b, 0).unwrap();
    assert_eq!(b.round_count(), 2);

    clear_results(&mut b);
    assert_eq!(b, fresh);
}

#[test]
fn records_round_trip_through_storage_shape() {
    let p = roster(7);
    let mut b = build(&p, Format::Standard, None).unwrap();
    record(&mut b, 1, 3, 1);
    record(&mut b, 3, 0, 2);
    let records = b.to_records();
    let hydrated = Bracket::from_records(Format::Standard, &records, &p).unwrap();
    assert_eq!(hydrated, b);
}

#[test]
fn hydration_rejects_broken_round_shapes() {
    let p = roster(5);
    let b = build(&p, Format::Standard, None).unwrap();
    let mut records = b.to_records();
    records.retain(|r| r.id != 5);
    assert!(matches!(
        Bracket::from_records(Format::Standard, &records, &p),
        Err(BracketError::MalformedBracket(_))
    ));
}

#[test]
fn hydration_rejects_empty_first_round_matches() {
    let p = roster(4);
    let b = build(&p, Format::Standard, None).unwrap();
    let mut records = b.to_records();
    records[0].participant_a = None;
    records[0].participant_b = None;
    assert!(matches!(
        Bracket::from_records(Format::Standard, &records, &p),
        Err(BracketError::MalformedBracket(_))
    ));
}

#[test]
fn hydration_rejects_unknown_participants() {
    let p = roster(4);
    let b = build(&p, Format::Graded, None).unwrap();
    let records = b.to_records();
    assert!(matches!(
        Bracket::from_records(Format::Graded, &records, &p[..3]),
        Err(BracketError::UnknownParticipant(id)) if id == p[3].id
    ));
}

#[test]
fn graded_decider_round_trips_through_storage_shape() {
    let p = roster(6);
    let mut b = build(&p, Format::Graded, None).unwrap();
    record(&mut b, 1, 3, 1);
    record(&mut b, 2, 1, 3);
    record(&mut b, 3, 2, 0);
    competition_bracket::open_decider(&mut b, 1).unwrap();
    record(&mut b, 4, 1, 0);
    let hydrated = Bracket::from_records(Format::Graded, &b.to_records(), &p).unwrap();
    assert_eq!(hydrated, b);
}

#[test]
fn graded_decider_with_emptied_slot_round_trips() {
    let p = roster(4);
    let mut b = build(&p, Format::Graded, None).unwrap();
    record(&mut b, 1, 3, 1);
    record(&mut b, 2, 3, 1);
    competition_bracket::open_decider(&mut b, 0).unwrap();
    record(&mut b, 1, 0, 0);
    assert_eq!(slot_name(&b, 3, true), None);
    let hydrated = Bracket::from_records(Format::Graded, &b.to_records(), &p).unwrap();
    assert_eq!(hydrated, b);
}

#[test]
fn graded_feeder_round_trips_when_not_last() {
    let p = roster(6);
    let mut b = build(&p, Format::Graded, None).unwrap();
    if let Bracket::Graded(g) = &mut b {
        g.decider_feeder = 0;
    }
    record(&mut b, 1, 3, 1);
    record(&mut b, 2, 1, 3);
    record(&mut b, 3, 2, 0);
    competition_bracket::open_decider(&mut b, 2).unwrap();
    let hydrated = Bracket::from_records(Format::Graded, &b.to_records(), &p).unwrap();
    assert_eq!(hydrated, b);
}

#[test]
fn hydration_rejects_decider_challenging_its_own_feeder() {
    let p = roster(4);
    let mut b = build(&p, Format::Graded, None).unwrap();
    record(&mut b, 1, 3, 1);
    record(&mut b, 2, 3, 1);
    competition_bracket::open_decider(&mut b, 0).unwrap();
    let mut records = b.to_records();
    for r in records.iter_mut().filter(|r| r.round == 2) {
        r.decider_challenger = Some(1);
    }
    assert!(matches!(
        Bracket::from_records(Format::Graded, &records, &p),
        Err(BracketError::MalformedBracket(_))
    ));
}
