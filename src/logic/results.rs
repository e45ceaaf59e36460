//! Result entry: record/overwrite a score, clear all results, open a graded decider.

use crate::models::{
    Bracket, BracketError, BracketMatch, Decider, GradedBracket, MatchId, MatchMetadata,
};

/// Record (or overwrite) the result of one match.
///
/// The winner is the strictly higher score. 0-0 means "unset": the match stores
/// the metadata and becomes undecided, and any winner it had pushed forward is
/// retracted. Every check runs before anything is mutated.
pub fn record_result(
    bracket: &mut Bracket,
    match_id: MatchId,
    score_a: u32,
    score_b: u32,
    metadata: MatchMetadata,
) -> Result<(), BracketError> {
    let m = bracket
        .find_match(match_id)
        .ok_or(BracketError::MatchNotFound(match_id))?;
    if !m.has_both_slots() {
        return Err(BracketError::IncompleteMatch(match_id));
    }
    if score_a == score_b && score_a != 0 {
        return Err(BracketError::InvalidScore { score_a, score_b });
    }

    match bracket {
        Bracket::Standard(b) => {
            let (r, i) = b
                .position(match_id)
                .ok_or(BracketError::MatchNotFound(match_id))?;
            set_score(&mut b.rounds[r][i], score_a, score_b, metadata);
            b.advance_winner(r, i);
        }
        Bracket::Graded(b) => {
            let m = graded_match_mut(b, match_id).ok_or(BracketError::MatchNotFound(match_id))?;
            set_score(m, score_a, score_b, metadata);
            b.sync_decider();
        }
    }
    log::debug!("match {}: recorded {}-{}", match_id, score_a, score_b);
    Ok(())
}

fn set_score(m: &mut BracketMatch, score_a: u32, score_b: u32, metadata: MatchMetadata) {
    m.score_a = score_a;
    m.score_b = score_b;
    m.metadata = metadata;
}

fn graded_match_mut(b: &mut GradedBracket, match_id: MatchId) -> Option<&mut BracketMatch> {
    if let Some(m) = b.pairings.iter_mut().find(|m| m.id == match_id) {
        return Some(m);
    }
    b.decider
        .as_mut()
        .map(|d| &mut d.bout)
        .filter(|m| m.id == match_id)
}

/// Reset every score to 0 and return the bracket to its post-build shape.
///
/// Round-1 slot assignments stay; winners pushed into later rounds are removed
/// (byes are re-applied). A graded decider is removed.
pub fn clear_results(bracket: &mut Bracket) {
    match bracket {
        Bracket::Standard(b) => {
            for m in b.rounds.iter_mut().flatten() {
                m.clear_score();
            }
            b.reset_propagation();
        }
        Bracket::Graded(b) => {
            for m in b.pairings.iter_mut() {
                m.clear_score();
            }
            b.decider = None;
        }
    }
}

/// Open the round-2 decider of a graded bracket.
///
/// The winner of pairing `challenger` meets the winner of the decider feeder
/// pairing fixed at build time. Every pairing must already be decided.
pub fn open_decider(bracket: &mut Bracket, challenger: usize) -> Result<MatchId, BracketError> {
    let Bracket::Graded(b) = bracket else {
        return Err(BracketError::DeciderUnavailable);
    };
    if b.decider.is_some()
        || b.pairings.len() < 2
        || challenger >= b.pairings.len()
        || challenger == b.decider_feeder
    {
        return Err(BracketError::DeciderUnavailable);
    }
    if !b.pairings.iter().all(BracketMatch::is_decided) {
        return Err(BracketError::RoundIncomplete);
    }

    let id = b.pairings.iter().map(|m| m.id).max().unwrap_or(0) + 1;
    let a = b.pairings[challenger].winner().cloned();
    let feeder_winner = b.pairings[b.decider_feeder].winner().cloned();
    b.decider = Some(Decider {
        challenger,
        bout: BracketMatch::new(id, 2, a, feeder_winner),
    });
    Ok(id)
}
