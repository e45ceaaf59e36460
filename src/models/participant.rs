//! Participant: an individual athlete or a fixed-roster team entry.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a participant (used in match slots and medal entries).
pub type ParticipantId = Uuid;

/// Organization name used when a participant has none.
pub const UNKNOWN_ORGANIZATION: &str = "Unknown";

/// An approved entrant of a class. Immutable once placed in a bracket slot.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// Athlete name, or team name for team entries.
    pub name: String,
    /// Dojo / club the entrant represents.
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub is_team: bool,
    #[serde(default)]
    pub team_member_names: Vec<String>,
}

impl Participant {
    /// Create an individual participant with a fresh id.
    pub fn new(name: impl Into<String>, organization: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            organization: organization.into(),
            is_team: false,
            team_member_names: Vec::new(),
        }
    }

    /// Create a team entry with a fresh id.
    pub fn team(
        name: impl Into<String>,
        organization: impl Into<String>,
        members: Vec<String>,
    ) -> Self {
        Self {
            is_team: true,
            team_member_names: members,
            ..Self::new(name, organization)
        }
    }

    /// Organization name for grouping; blank names fall back to "Unknown".
    pub fn organization_or_unknown(&self) -> &str {
        let trimmed = self.organization.trim();
        if trimmed.is_empty() {
            UNKNOWN_ORGANIZATION
        } else {
            trimmed
        }
    }
}
