//! Class (competition division) and Division, which pairs a class with its roster and bracket.

use crate::models::bracket::{Bracket, BracketState, Format};
use crate::models::participant::Participant;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a class.
pub type ClassId = Uuid;

/// What is being contested.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discipline {
    #[default]
    Sparring,
    Forms,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Mixed,
}

/// A competitive division. Demographic fields are display/eligibility labels only.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub id: ClassId,
    pub name: String,
    #[serde(default)]
    pub discipline: Discipline,
    #[serde(default)]
    pub format: Format,
    /// Age-band category label (e.g. "Cadet", "Senior"), used by the tally's level filter.
    #[serde(default)]
    pub age_category: String,
    #[serde(default)]
    pub weight_band: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
}

impl Class {
    pub fn new(name: impl Into<String>, discipline: Discipline, format: Format) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            discipline,
            format,
            age_category: String::new(),
            weight_band: None,
            gender: None,
        }
    }

    /// Set the age-band category label.
    pub fn with_age_category(mut self, category: impl Into<String>) -> Self {
        self.age_category = category.into();
        self
    }
}

/// One class, its approved roster, and its bracket if one has been built.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Division {
    pub class: Class,
    pub roster: Vec<Participant>,
    #[serde(default)]
    pub bracket: Option<Bracket>,
}

impl Division {
    /// A division with no bracket yet.
    pub fn new(class: Class, roster: Vec<Participant>) -> Self {
        Self {
            class,
            roster,
            bracket: None,
        }
    }

    pub fn state(&self) -> BracketState {
        self.bracket
            .as_ref()
            .map_or(BracketState::NotCreated, Bracket::state)
    }

    /// (class, bracket) pair for the tally, if a bracket exists.
    pub fn tally_entry(&self) -> Option<(&Class, &Bracket)> {
        self.bracket.as_ref().map(|b| (&self.class, b))
    }
}
