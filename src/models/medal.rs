//! Derived medal records: per-class entries and per-dojo ranking rows.

use crate::models::participant::{Participant, ParticipantId};
use serde::{Deserialize, Serialize};

/// Placement tier.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Gold,
    Silver,
    Bronze,
}

impl Tier {
    /// 1 for gold, 2 for silver, 3 for bronze.
    pub fn placement(self) -> u8 {
        match self {
            Tier::Gold => 1,
            Tier::Silver => 2,
            Tier::Bronze => 3,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Gold => write!(f, "gold"),
            Tier::Silver => write!(f, "silver"),
            Tier::Bronze => write!(f, "bronze"),
        }
    }
}

/// One medal placement. Recomputed from the bracket on every query.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MedalEntry {
    pub participant_id: ParticipantId,
    pub name: String,
    pub organization: String,
    pub tier: Tier,
}

impl MedalEntry {
    pub fn new(participant: &Participant, tier: Tier) -> Self {
        Self {
            participant_id: participant.id,
            name: participant.name.clone(),
            organization: participant.organization_or_unknown().to_string(),
            tier,
        }
    }
}

/// Medal placements of one bracket. Lists, since ties are possible.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Medals {
    pub gold: Vec<MedalEntry>,
    pub silver: Vec<MedalEntry>,
    pub bronze: Vec<MedalEntry>,
}

impl Medals {
    pub fn is_empty(&self) -> bool {
        self.gold.is_empty() && self.silver.is_empty() && self.bronze.is_empty()
    }

    /// Every entry, gold first.
    pub fn entries(&self) -> impl Iterator<Item = &MedalEntry> {
        self.gold.iter().chain(&self.silver).chain(&self.bronze)
    }
}

/// Cross-class medal count for one dojo.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DojoRanking {
    pub organization: String,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
    pub total: u32,
}

impl DojoRanking {
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            ..Self::default()
        }
    }

    /// Count one medal of the given tier.
    pub fn add(&mut self, tier: Tier) {
        match tier {
            Tier::Gold => self.gold += 1,
            Tier::Silver => self.silver += 1,
            Tier::Bronze => self.bronze += 1,
        }
        self.total += 1;
    }
}
