//! CSV roster import: `id,name,organization,is_team,team_members`.
//!
//! `team_members` is a `;`-separated list. A blank id gets a fresh one.

use crate::models::Participant;
use serde::Deserialize;
use std::io::Read;
use uuid::Uuid;

/// Errors while reading a roster.
#[derive(Debug)]
pub enum RosterError {
    Csv(csv::Error),
    /// A row with no name (1-based line number including the header).
    MissingName { line: u64 },
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::Csv(e) => write!(f, "Invalid roster CSV: {}", e),
            RosterError::MissingName { line } => write!(f, "Roster line {} has no name", line),
        }
    }
}

impl std::error::Error for RosterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterError::Csv(e) => Some(e),
            RosterError::MissingName { .. } => None,
        }
    }
}

impl From<csv::Error> for RosterError {
    fn from(e: csv::Error) -> Self {
        RosterError::Csv(e)
    }
}

#[derive(Deserialize)]
struct RosterRow {
    #[serde(default)]
    id: Option<Uuid>,
    name: String,
    #[serde(default)]
    organization: Option<String>,
    #[serde(default)]
    is_team: Option<bool>,
    #[serde(default)]
    team_members: Option<String>,
}

/// Parse a roster with a header row into participants, in file order.
pub fn read_roster<R: Read>(reader: R) -> Result<Vec<Participant>, RosterError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut participants = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        // Line where the record starts; quoted fields may span several.
        let line = record.position().map_or(0, |p| p.line());
        let row: RosterRow = record.deserialize(Some(&headers))?;
        let name = row.name.trim();
        if name.is_empty() {
            return Err(RosterError::MissingName { line });
        }
        let team_member_names: Vec<String> = row
            .team_members
            .unwrap_or_default()
            .split(';')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(String::from)
            .collect();
        participants.push(Participant {
            id: row.id.unwrap_or_else(Uuid::new_v4),
            name: name.to_string(),
            organization: row.organization.unwrap_or_default(),
            is_team: row.is_team.unwrap_or(!team_member_names.is_empty()),
            team_member_names,
        });
    }
    log::debug!("read roster with {} participants", participants.len());
    Ok(participants)
}
