//! Bracket construction: seed order, first-round pairing, bye placement.

use crate::models::{
    Bracket, BracketError, BracketMatch, Format, GradedBracket, MatchId, Participant,
    ParticipantId, StandardBracket,
};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Build a bracket from the participants.
///
/// Ids in `seed_order` are seeded first, in that order; the remaining participants
/// follow in input order. Seeds are paired (0,1), (2,3), ...; with an odd count the
/// last seed is unopposed and receives the bye.
pub fn build(
    participants: &[Participant],
    format: Format,
    seed_order: Option<&[ParticipantId]>,
) -> Result<Bracket, BracketError> {
    let seeded = apply_seed_order(participants, seed_order)?;
    Ok(build_from_seeds(seeded, format))
}

/// Build with a uniformly random seed order (Fisher-Yates via `SliceRandom::shuffle`).
pub fn build_shuffled<R: Rng + ?Sized>(
    participants: &[Participant],
    format: Format,
    rng: &mut R,
) -> Result<Bracket, BracketError> {
    let mut seeded = apply_seed_order(participants, None)?;
    seeded.shuffle(rng);
    Ok(build_from_seeds(seeded, format))
}

/// Validate the roster and arrange it into seed order.
fn apply_seed_order(
    participants: &[Participant],
    seed_order: Option<&[ParticipantId]>,
) -> Result<Vec<Participant>, BracketError> {
    if participants.len() < 2 {
        return Err(BracketError::InsufficientParticipants {
            count: participants.len(),
        });
    }
    let mut seen = HashSet::with_capacity(participants.len());
    for p in participants {
        if !seen.insert(p.id) {
            return Err(BracketError::DuplicateParticipant(p.id));
        }
    }

    let Some(order) = seed_order else {
        return Ok(participants.to_vec());
    };
    let mut seeded = Vec::with_capacity(participants.len());
    let mut placed = HashSet::with_capacity(order.len());
    for &id in order {
        let p = participants
            .iter()
            .find(|p| p.id == id)
            .ok_or(BracketError::UnknownParticipant(id))?;
        if !placed.insert(id) {
            return Err(BracketError::DuplicateParticipant(id));
        }
        seeded.push(p.clone());
    }
    seeded.extend(
        participants
            .iter()
            .filter(|p| !placed.contains(&p.id))
            .cloned(),
    );
    Ok(seeded)
}

/// Pair seeds into first-round matches, numbering from `next_id`.
fn first_round(seeded: Vec<Participant>, next_id: &mut MatchId) -> Vec<BracketMatch> {
    let mut round = Vec::with_capacity(seeded.len().div_ceil(2));
    let mut seeds = seeded.into_iter();
    while let Some(a) = seeds.next() {
        let m = match seeds.next() {
            Some(b) => BracketMatch::new(*next_id, 1, Some(a), Some(b)),
            None => BracketMatch::new_bye(*next_id, 1, Some(a)),
        };
        *next_id += 1;
        round.push(m);
    }
    round
}

fn build_from_seeds(seeded: Vec<Participant>, format: Format) -> Bracket {
    let n = seeded.len();
    let mut next_id: MatchId = 1;
    let pairings = first_round(seeded, &mut next_id);

    match format {
        Format::Graded => {
            let decider_feeder = pairings.len() - 1;
            log::debug!(
                "built graded bracket: {} participants, {} pairings, decider feeder {}",
                n,
                pairings.len(),
                decider_feeder
            );
            Bracket::Graded(GradedBracket {
                pairings,
                decider_feeder,
                decider: None,
            })
        }
        Format::Standard => {
            let mut rounds = vec![pairings];
            while rounds.last().map_or(0, Vec::len) > 1 {
                let prev_len = rounds.last().map_or(0, Vec::len);
                let round_no = rounds.len() as u32 + 1;
                let round: Vec<BracketMatch> = (0..prev_len.div_ceil(2))
                    .map(|i| {
                        let id = next_id;
                        next_id += 1;
                        if 2 * i + 1 >= prev_len {
                            BracketMatch::new_bye(id, round_no, None)
                        } else {
                            BracketMatch::new(id, round_no, None, None)
                        }
                    })
                    .collect();
                rounds.push(round);
            }
            let mut bracket = StandardBracket { rounds };
            bracket.reset_propagation();
            log::debug!(
                "built standard bracket: {} participants, {} rounds, {} first-round matches",
                n,
                bracket.round_count(),
                bracket.rounds[0].len()
            );
            Bracket::Standard(bracket)
        }
    }
}
