//! Bracket (Standard or Graded), BracketState, and BracketError.

use crate::models::matches::{BracketMatch, MatchId, MatchRecord, Side};
use crate::models::participant::{Participant, ParticipantId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Errors that can occur during bracket operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketError {
    /// Fewer than 2 entrants.
    InsufficientParticipants { count: usize },
    MatchNotFound(MatchId),
    /// Recording a result on a match that is missing a participant.
    IncompleteMatch(MatchId),
    /// Equal non-zero scores; draws are not a representable outcome.
    InvalidScore { score_a: u32, score_b: u32 },
    /// Build called on a class with a live bracket.
    BracketAlreadyExists,
    /// Mutate/derive called with no bracket present.
    BracketNotFound,
    /// A seed order or match record names a participant outside the roster.
    UnknownParticipant(ParticipantId),
    /// The same participant appears twice in a roster.
    DuplicateParticipant(ParticipantId),
    /// A decider needs every pairing decided first.
    RoundIncomplete,
    /// Decider requested on a bracket that cannot take one.
    DeciderUnavailable,
    /// Stored match records do not form a valid bracket.
    MalformedBracket(String),
}

impl std::fmt::Display for BracketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketError::InsufficientParticipants { count } => {
                write!(f, "Need at least 2 participants to build a bracket (got {})", count)
            }
            BracketError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            BracketError::IncompleteMatch(id) => {
                write!(f, "Match {} does not have two participants yet", id)
            }
            BracketError::InvalidScore { score_a, score_b } => {
                write!(f, "Scores must differ (got {}-{})", score_a, score_b)
            }
            BracketError::BracketAlreadyExists => write!(f, "A bracket already exists for this class"),
            BracketError::BracketNotFound => write!(f, "No bracket exists for this class"),
            BracketError::UnknownParticipant(_) => write!(f, "Participant is not on the roster"),
            BracketError::DuplicateParticipant(_) => {
                write!(f, "Participant appears more than once on the roster")
            }
            BracketError::RoundIncomplete => write!(f, "Not all first-round matches have a result"),
            BracketError::DeciderUnavailable => write!(f, "A decider match cannot be opened here"),
            BracketError::MalformedBracket(reason) => write!(f, "Malformed bracket: {}", reason),
        }
    }
}

impl std::error::Error for BracketError {}

/// Competition format of a class.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// Single elimination, co-bronze for both semifinal losers.
    #[default]
    Standard,
    /// Flat pairing round, optionally followed by one decider match.
    Graded,
}

/// Lifecycle of a class's bracket.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketState {
    #[default]
    NotCreated,
    /// Built, no score entered.
    Created,
    /// At least one score entered, some playable match still open.
    InProgress,
    /// Every match with two participants has a decisive score.
    Completed,
}

/// Single-elimination bracket: `rounds[0]` is round 1, the last round holds the final.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandardBracket {
    pub rounds: Vec<Vec<BracketMatch>>,
}

impl StandardBracket {
    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn final_match(&self) -> Option<&BracketMatch> {
        self.rounds.last().and_then(|r| r.first())
    }

    /// (round index, match index) of a match id.
    pub fn position(&self, id: MatchId) -> Option<(usize, usize)> {
        self.rounds.iter().enumerate().find_map(|(r, round)| {
            round.iter().position(|m| m.id == id).map(|i| (r, i))
        })
    }

    /// Push the winner of `rounds[r][i]` (or its absence) into the next round.
    ///
    /// If the next match's occupant changes, that match's score is reset and the
    /// change cascades further. Structural byes forward their occupant immediately.
    pub(crate) fn advance_winner(&mut self, r: usize, i: usize) {
        let mut r = r;
        let mut i = i;
        while r + 1 < self.rounds.len() {
            let winner = self.rounds[r][i].winner().cloned();
            let next_i = i / 2;
            let side = Side::for_feeder(i);
            let target = &mut self.rounds[r + 1][next_i];
            let current_id = target.slot(side).map(|p| p.id);
            if current_id == winner.as_ref().map(|p| p.id) {
                return;
            }
            log::debug!(
                "match {}: slot {:?} now {:?}",
                target.id,
                side,
                winner.as_ref().map(|p| p.name.as_str())
            );
            *target.slot_mut(side) = winner;
            target.clear_score();
            r += 1;
            i = next_i;
        }
    }

    /// Empty every slot fed from an earlier round and re-push round-1 winners.
    pub(crate) fn reset_propagation(&mut self) {
        for round in self.rounds.iter_mut().skip(1) {
            for m in round.iter_mut() {
                m.participant_a = None;
                m.participant_b = None;
            }
        }
        let first_len = self.rounds.first().map_or(0, Vec::len);
        for i in 0..first_len {
            self.advance_winner(0, i);
        }
    }
}

/// The optional round-2 match of a Graded bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Decider {
    /// Pairing index whose winner faces the feeder pairing's winner.
    pub challenger: usize,
    pub bout: BracketMatch,
}

/// Graded bracket: one flat round of pairings plus an on-demand decider.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GradedBracket {
    pub pairings: Vec<BracketMatch>,
    /// Pairing whose winner settles its placement in the decider. Fixed at build time.
    pub decider_feeder: usize,
    #[serde(default)]
    pub decider: Option<Decider>,
}

impl GradedBracket {
    /// Refresh decider slots from the current pairing winners. Resets the
    /// decider's score when either entrant changes.
    pub(crate) fn sync_decider(&mut self) {
        let feeder = self.decider_feeder;
        let Some(decider) = self.decider.as_mut() else {
            return;
        };
        let a = self.pairings.get(decider.challenger).and_then(|m| m.winner()).cloned();
        let b = self.pairings.get(feeder).and_then(|m| m.winner()).cloned();
        let changed = decider.bout.participant_a.as_ref().map(|p| p.id) != a.as_ref().map(|p| p.id)
            || decider.bout.participant_b.as_ref().map(|p| p.id) != b.as_ref().map(|p| p.id);
        if changed {
            decider.bout.participant_a = a;
            decider.bout.participant_b = b;
            decider.bout.clear_score();
        }
    }
}

/// All matches of one class, in one of the two formats.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum Bracket {
    Standard(StandardBracket),
    Graded(GradedBracket),
}

impl Bracket {
    pub fn format(&self) -> Format {
        match self {
            Bracket::Standard(_) => Format::Standard,
            Bracket::Graded(_) => Format::Graded,
        }
    }

    /// All matches in round order.
    pub fn matches(&self) -> Vec<&BracketMatch> {
        match self {
            Bracket::Standard(b) => b.rounds.iter().flatten().collect(),
            Bracket::Graded(b) => b
                .pairings
                .iter()
                .chain(b.decider.as_ref().map(|d| &d.bout))
                .collect(),
        }
    }

    pub fn find_match(&self, id: MatchId) -> Option<&BracketMatch> {
        self.matches().into_iter().find(|m| m.id == id)
    }

    pub fn round_count(&self) -> usize {
        match self {
            Bracket::Standard(b) => b.round_count(),
            Bracket::Graded(b) => {
                if b.decider.is_some() {
                    2
                } else {
                    1
                }
            }
        }
    }

    /// Count of distinct participants appearing in any match (not the roster count).
    pub fn unique_participants(&self) -> usize {
        self.matches()
            .into_iter()
            .flat_map(|m| m.participants())
            .map(|p| p.id)
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn state(&self) -> BracketState {
        let matches = self.matches();
        if matches.iter().all(|m| !m.is_playable_unplayed()) {
            BracketState::Completed
        } else if matches.iter().any(|m| m.has_score()) {
            BracketState::InProgress
        } else {
            BracketState::Created
        }
    }

    /// Storage shape of every match.
    ///
    /// Graded records also carry the feeder index, and the decider record its
    /// challenger index, so hydration never has to infer them from slots.
    pub fn to_records(&self) -> Vec<MatchRecord> {
        match self {
            Bracket::Standard(b) => b.rounds.iter().flatten().map(BracketMatch::to_record).collect(),
            Bracket::Graded(b) => {
                let mut records: Vec<MatchRecord> = b
                    .pairings
                    .iter()
                    .map(|m| MatchRecord {
                        decider_feeder: Some(b.decider_feeder),
                        ..m.to_record()
                    })
                    .collect();
                if let Some(d) = &b.decider {
                    records.push(MatchRecord {
                        decider_feeder: Some(b.decider_feeder),
                        decider_challenger: Some(d.challenger),
                        ..d.bout.to_record()
                    });
                }
                records
            }
        }
    }

    /// Rebuild a bracket from stored match records and the class roster.
    ///
    /// Records are grouped by round and ordered by id within a round. The
    /// halving invariant is checked and structural byes are recomputed.
    pub fn from_records(
        format: Format,
        records: &[MatchRecord],
        roster: &[Participant],
    ) -> Result<Self, BracketError> {
        let by_id: HashMap<ParticipantId, &Participant> =
            roster.iter().map(|p| (p.id, p)).collect();
        let lookup = |id: Option<ParticipantId>| -> Result<Option<Participant>, BracketError> {
            match id {
                None => Ok(None),
                Some(id) => by_id
                    .get(&id)
                    .map(|p| Some((*p).clone()))
                    .ok_or(BracketError::UnknownParticipant(id)),
            }
        };

        let mut grouped: BTreeMap<u32, Vec<&MatchRecord>> = BTreeMap::new();
        for rec in records {
            grouped.entry(rec.round).or_default().push(rec);
        }
        for round in grouped.values_mut() {
            round.sort_by_key(|r| r.id);
        }
        let round_numbers: Vec<u32> = grouped.keys().copied().collect();
        let expected: Vec<u32> = (1..=round_numbers.len() as u32).collect();
        if round_numbers.is_empty() || round_numbers != expected {
            return Err(BracketError::MalformedBracket(
                "rounds must be numbered 1..R without gaps".to_string(),
            ));
        }

        let mut rounds: Vec<Vec<BracketMatch>> = Vec::with_capacity(grouped.len());
        for (r, recs) in grouped.values().enumerate() {
            let prev_len = rounds.last().map(Vec::len);
            let mut round = Vec::with_capacity(recs.len());
            for (i, rec) in recs.iter().enumerate() {
                let a = lookup(rec.participant_a)?;
                let b = lookup(rec.participant_b)?;
                if prev_len.is_none() && a.is_none() && b.is_none() {
                    return Err(BracketError::MalformedBracket(format!(
                        "round-1 match {} has no participants",
                        rec.id
                    )));
                }
                let bye = match prev_len {
                    None => a.is_some() != b.is_some(),
                    Some(prev) => 2 * i + 1 >= prev,
                };
                let mut m = BracketMatch::new(rec.id, r as u32 + 1, a, b);
                m.bye = bye;
                m.score_a = rec.score_a;
                m.score_b = rec.score_b;
                m.metadata = rec.metadata.clone();
                round.push(m);
            }
            rounds.push(round);
        }

        match format {
            Format::Standard => {
                for pair in rounds.windows(2) {
                    if pair[1].len() != pair[0].len().div_ceil(2) {
                        return Err(BracketError::MalformedBracket(format!(
                            "round {} has {} matches, expected {}",
                            pair[1][0].round,
                            pair[1].len(),
                            pair[0].len().div_ceil(2)
                        )));
                    }
                }
                if rounds.last().map_or(true, |r| r.len() != 1) {
                    return Err(BracketError::MalformedBracket(
                        "final round must hold exactly one match".to_string(),
                    ));
                }
                Ok(Bracket::Standard(StandardBracket { rounds }))
            }
            Format::Graded => {
                let mut rounds = rounds.into_iter();
                let pairings = rounds.next().unwrap_or_default();
                let decider_round = rounds.next();
                if rounds.next().is_some() {
                    return Err(BracketError::MalformedBracket(
                        "graded bracket has at most two rounds".to_string(),
                    ));
                }
                let decider_feeder = records
                    .iter()
                    .find_map(|r| r.decider_feeder)
                    .unwrap_or_else(|| pairings.len().saturating_sub(1));
                if !pairings.is_empty() && decider_feeder >= pairings.len() {
                    return Err(BracketError::MalformedBracket(format!(
                        "decider feeder {} is not a pairing",
                        decider_feeder
                    )));
                }
                let decider = match decider_round {
                    None => None,
                    Some(mut round) => {
                        if round.len() != 1 {
                            return Err(BracketError::MalformedBracket(
                                "graded decider round must hold exactly one match".to_string(),
                            ));
                        }
                        let mut bout = round.remove(0);
                        bout.bye = false;
                        let stored = records
                            .iter()
                            .find(|r| r.id == bout.id && r.round == 2)
                            .and_then(|r| r.decider_challenger);
                        // Older records carry no index; fall back to slot A.
                        let challenger = match stored {
                            Some(index) => Some(index),
                            None => {
                                let challenger_id = bout.participant_a.as_ref().map(|p| p.id);
                                pairings.iter().position(|m| {
                                    challenger_id.is_some()
                                        && m.winner().map(|w| w.id) == challenger_id
                                })
                            }
                        }
                        .filter(|&c| c < pairings.len() && c != decider_feeder)
                        .ok_or_else(|| {
                            BracketError::MalformedBracket(
                                "decider challenger is not a non-feeder pairing".to_string(),
                            )
                        })?;
                        Some(Decider { challenger, bout })
                    }
                };
                Ok(Bracket::Graded(GradedBracket {
                    pairings,
                    decider_feeder,
                    decider,
                }))
            }
        }
    }
}
