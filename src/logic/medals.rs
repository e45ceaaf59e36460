//! Medal derivation: gold/silver/bronze from a (possibly partial) match tree.

use crate::models::{
    Bracket, GradedBracket, MedalEntry, Medals, Participant, ParticipantId, StandardBracket,
    Tier,
};
use std::collections::HashSet;

/// Collects entries, placing each participant at most once.
#[derive(Default)]
struct Podium {
    medals: Medals,
    placed: HashSet<ParticipantId>,
}

impl Podium {
    fn place(&mut self, participant: Option<&Participant>, tier: Tier) {
        let Some(p) = participant else {
            return;
        };
        if !self.placed.insert(p.id) {
            return;
        }
        let entry = MedalEntry::new(p, tier);
        match tier {
            Tier::Gold => self.medals.gold.push(entry),
            Tier::Silver => self.medals.silver.push(entry),
            Tier::Bronze => self.medals.bronze.push(entry),
        }
    }
}

/// Derive placements from whatever is currently decided. Never fails; undecided
/// tiers are simply empty.
pub fn derive_medals(bracket: &Bracket) -> Medals {
    let mut podium = Podium::default();
    match bracket {
        Bracket::Standard(b) => standard(b, &mut podium),
        Bracket::Graded(b) => graded(b, &mut podium),
    }
    podium.medals
}

/// Final winner gold, final loser silver, every semifinal loser bronze.
fn standard(b: &StandardBracket, podium: &mut Podium) {
    if let Some(final_match) = b.final_match() {
        podium.place(final_match.winner(), Tier::Gold);
        podium.place(final_match.loser(), Tier::Silver);
    }
    if b.rounds.len() >= 2 {
        for m in &b.rounds[b.rounds.len() - 2] {
            podium.place(m.loser(), Tier::Bronze);
        }
    }
}

/// Without a decider, each decided pairing awards its own gold and silver.
///
/// With a decider, its winner and loser take gold and silver first. Every other
/// pairing still awards gold/silver; the feeder pairing's loser drops to bronze
/// because its winner is placed by the decider.
fn graded(b: &GradedBracket, podium: &mut Podium) {
    let Some(decider) = &b.decider else {
        for m in &b.pairings {
            podium.place(m.winner(), Tier::Gold);
            podium.place(m.loser(), Tier::Silver);
        }
        return;
    };

    podium.place(decider.bout.winner(), Tier::Gold);
    podium.place(decider.bout.loser(), Tier::Silver);
    for (idx, m) in b.pairings.iter().enumerate() {
        if idx == b.decider_feeder {
            podium.place(m.loser(), Tier::Bronze);
        } else {
            podium.place(m.winner(), Tier::Gold);
            podium.place(m.loser(), Tier::Silver);
        }
    }
}
