//! Property-based tests for bracket structure and medal derivation using proptest.

mod common;

use common::roster;
use competition_bracket::{
    build, clear_results, derive_medals, open_decider, record_result, Bracket, Format,
    MatchMetadata,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn ceil_log2(n: usize) -> usize {
    (usize::BITS - (n - 1).leading_zeros()) as usize
}

fn format_strategy() -> impl Strategy<Value = Format> {
    prop_oneof![Just(Format::Standard), Just(Format::Graded)]
}

/// Play matches in id order, driven by `choices`: (play this match?, side A wins?).
/// Returns the results applied, in order.
fn play_with(bracket: &mut Bracket, choices: &[(bool, bool)]) -> Vec<(u32, u32, u32)> {
    let mut applied = Vec::new();
    let mut choices = choices.iter().copied();
    loop {
        let playable: Vec<u32> = bracket
            .matches()
            .into_iter()
            .filter(|m| m.is_playable_unplayed())
            .map(|m| m.id)
            .collect();
        let mut progressed = false;
        for id in playable {
            let Some((play, a_wins)) = choices.next() else {
                return applied;
            };
            if !play {
                continue;
            }
            let (a, b) = if a_wins { (3, 1) } else { (0, 2) };
            record_result(bracket, id, a, b, MatchMetadata::default()).unwrap();
            applied.push((id, a, b));
            progressed = true;
        }
        if !progressed {
            return applied;
        }
    }
}

proptest! {
    #[test]
    fn standard_round_counts(n in 2usize..80) {
        let Bracket::Standard(b) = build(&roster(n), Format::Standard, None).unwrap() else {
            panic!("expected standard bracket");
        };
        prop_assert_eq!(b.round_count(), ceil_log2(n));
        prop_assert_eq!(b.rounds[0].len(), n.div_ceil(2));
        for pair in b.rounds.windows(2) {
            prop_assert_eq!(pair[1].len(), pair[0].len().div_ceil(2));
        }
        prop_assert_eq!(b.rounds.last().unwrap().len(), 1);
    }

    #[test]
    fn build_is_deterministic(n in 2usize..40, format in format_strategy()) {
        let p = roster(n);
        prop_assert_eq!(build(&p, format, None).unwrap(), build(&p, format, None).unwrap());
    }

    #[test]
    fn no_participant_in_two_tiers(
        n in 2usize..24,
        format in format_strategy(),
        choices in prop::collection::vec(any::<(bool, bool)>(), 0..64),
        decider_challenger in 0usize..12,
    ) {
        let mut b = build(&roster(n), format, None).unwrap();
        play_with(&mut b, &choices);
        // Ignore failures: the decider is only sometimes available.
        if let Ok(id) = open_decider(&mut b, decider_challenger) {
            let _ = record_result(&mut b, id, 1, 2, MatchMetadata::default());
        }
        let medals = derive_medals(&b);
        let mut seen = HashSet::new();
        for e in medals.entries() {
            prop_assert!(seen.insert(e.participant_id));
        }
    }

    #[test]
    fn clear_then_replay_gives_same_medals(
        n in 2usize..24,
        format in format_strategy(),
        choices in prop::collection::vec(any::<(bool, bool)>(), 0..64),
    ) {
        let mut b = build(&roster(n), format, None).unwrap();
        let applied = play_with(&mut b, &choices);
        let before = derive_medals(&b);

        clear_results(&mut b);
        for (id, a, s) in applied {
            record_result(&mut b, id, a, s, MatchMetadata::default()).unwrap();
        }
        prop_assert_eq!(derive_medals(&b), before);
    }
}
