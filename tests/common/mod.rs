//! Shared fixtures for integration tests.
#![allow(dead_code)]

use competition_bracket::{
    build, record_result, Bracket, Class, Discipline, Division, Format, MatchMetadata, Participant,
};

/// `n` participants named P0..Pn, dojo "Dojo{i % 3}".
pub fn roster(n: usize) -> Vec<Participant> {
    (0..n)
        .map(|i| Participant::new(format!("P{i}"), format!("Dojo{}", i % 3)))
        .collect()
}

/// Participants with the given dojo names, in order.
pub fn roster_from_dojos(dojos: &[&str]) -> Vec<Participant> {
    dojos
        .iter()
        .enumerate()
        .map(|(i, dojo)| Participant::new(format!("P{i}"), *dojo))
        .collect()
}

pub fn record(bracket: &mut Bracket, match_id: u32, a: u32, b: u32) {
    record_result(bracket, match_id, a, b, MatchMetadata::default()).unwrap();
}

/// Play every playable match in id order, side A always winning, until nothing is left.
pub fn play_out(bracket: &mut Bracket) {
    loop {
        let next = bracket
            .matches()
            .into_iter()
            .find(|m| m.is_playable_unplayed())
            .map(|m| m.id);
        match next {
            Some(id) => record(bracket, id, 2, 1),
            None => break,
        }
    }
}

pub fn division(n: usize, discipline: Discipline, format: Format) -> Division {
    Division::new(Class::new("Test class", discipline, format), roster(n))
}

/// A fully played bracket for a fresh class with the given roster.
pub fn played(class: &Class, participants: &[Participant]) -> Bracket {
    let mut bracket = build(participants, class.format, None).unwrap();
    play_out(&mut bracket);
    bracket
}

pub fn names(entries: &[competition_bracket::MedalEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}
