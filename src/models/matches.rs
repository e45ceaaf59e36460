//! BracketMatch, Side, and the opaque scheduling metadata attached to a match.

use crate::models::participant::{Participant, ParticipantId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of a match within one bracket. Assigned sequentially from 1 in round order.
pub type MatchId = u32;

/// Which slot of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Slot a feeder match at `index` occupies in the next round.
    pub fn for_feeder(index: usize) -> Self {
        if index % 2 == 0 {
            Side::A
        } else {
            Side::B
        }
    }
}

/// Scheduling metadata. The engine never reads it; it is stored and returned as given.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchMetadata {
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub queue: Option<String>,
    #[serde(default)]
    pub court: Option<String>,
}

/// One bout within one round of a class's bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub id: MatchId,
    /// 1-based, increasing toward the final.
    pub round: u32,
    pub participant_a: Option<Participant>,
    pub participant_b: Option<Participant>,
    /// 0 means not yet played.
    pub score_a: u32,
    pub score_b: u32,
    /// Structural bye: one slot has no feeder and stays empty for good.
    #[serde(default)]
    pub bye: bool,
    #[serde(default)]
    pub metadata: MatchMetadata,
}

impl BracketMatch {
    pub fn new(
        id: MatchId,
        round: u32,
        participant_a: Option<Participant>,
        participant_b: Option<Participant>,
    ) -> Self {
        Self {
            id,
            round,
            participant_a,
            participant_b,
            score_a: 0,
            score_b: 0,
            bye: false,
            metadata: MatchMetadata::default(),
        }
    }

    /// A match whose second slot will never be filled.
    pub fn new_bye(id: MatchId, round: u32, participant: Option<Participant>) -> Self {
        Self {
            bye: true,
            ..Self::new(id, round, participant, None)
        }
    }

    pub fn slot(&self, side: Side) -> Option<&Participant> {
        match side {
            Side::A => self.participant_a.as_ref(),
            Side::B => self.participant_b.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, side: Side) -> &mut Option<Participant> {
        match side {
            Side::A => &mut self.participant_a,
            Side::B => &mut self.participant_b,
        }
    }

    pub fn has_both_slots(&self) -> bool {
        self.participant_a.is_some() && self.participant_b.is_some()
    }

    /// True once any score has been entered.
    pub fn has_score(&self) -> bool {
        self.score_a != 0 || self.score_b != 0
    }

    /// Both slots filled and a strictly higher score on one side.
    pub fn has_decisive_score(&self) -> bool {
        self.has_both_slots() && self.score_a != self.score_b
    }

    /// A decided match has a winner: a bye with an occupant, or a decisive score.
    pub fn is_decided(&self) -> bool {
        self.winner().is_some()
    }

    /// Both slots filled but no decisive score yet.
    pub fn is_playable_unplayed(&self) -> bool {
        self.has_both_slots() && !self.has_decisive_score()
    }

    pub fn winner_side(&self) -> Option<Side> {
        if self.bye {
            return match (&self.participant_a, &self.participant_b) {
                (Some(_), None) => Some(Side::A),
                (None, Some(_)) => Some(Side::B),
                _ => None,
            };
        }
        if !self.has_decisive_score() {
            return None;
        }
        if self.score_a > self.score_b {
            Some(Side::A)
        } else {
            Some(Side::B)
        }
    }

    pub fn winner(&self) -> Option<&Participant> {
        self.winner_side().and_then(|side| self.slot(side))
    }

    /// Loser of a decided match; byes have none.
    pub fn loser(&self) -> Option<&Participant> {
        if self.bye {
            return None;
        }
        match self.winner_side()? {
            Side::A => self.participant_b.as_ref(),
            Side::B => self.participant_a.as_ref(),
        }
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participant_a.iter().chain(self.participant_b.iter())
    }

    /// Reset scores to "not yet played".
    pub fn clear_score(&mut self) {
        self.score_a = 0;
        self.score_b = 0;
    }

    pub fn to_record(&self) -> MatchRecord {
        MatchRecord {
            id: self.id,
            round: self.round,
            participant_a: self.participant_a.as_ref().map(|p| p.id),
            participant_b: self.participant_b.as_ref().map(|p| p.id),
            score_a: self.score_a,
            score_b: self.score_b,
            metadata: self.metadata.clone(),
            decider_feeder: None,
            decider_challenger: None,
        }
    }
}

/// Storage shape of a match, used to hydrate a bracket from a data store.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub round: u32,
    #[serde(default)]
    pub participant_a: Option<ParticipantId>,
    #[serde(default)]
    pub participant_b: Option<ParticipantId>,
    #[serde(default)]
    pub score_a: u32,
    #[serde(default)]
    pub score_b: u32,
    #[serde(default)]
    pub metadata: MatchMetadata,
    /// Graded only: pairing index feeding the decider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decider_feeder: Option<usize>,
    /// Graded decider only: pairing index of the challenger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decider_challenger: Option<usize>,
}
