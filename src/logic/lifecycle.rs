//! Bracket lifecycle for one class: create, record, clear, reshuffle, delete.
//!
//! NOT_CREATED -> CREATED -> IN_PROGRESS -> COMPLETED. Every operation either
//! succeeds fully or returns an error with the division untouched.

use crate::logic::builder::{build, build_shuffled};
use crate::logic::medals::derive_medals;
use crate::logic::results::{clear_results, open_decider, record_result};
use crate::models::{
    Bracket, BracketError, Division, MatchId, MatchMetadata, Medals, ParticipantId,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How the roster is ordered before pairing.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seeding {
    /// Roster order.
    #[default]
    InputOrder,
    /// These ids first, in order; the rest in roster order.
    Explicit(Vec<ParticipantId>),
    /// Uniform random permutation.
    Shuffled,
}

impl Division {
    fn bracket_mut(&mut self) -> Result<&mut Bracket, BracketError> {
        self.bracket.as_mut().ok_or(BracketError::BracketNotFound)
    }

    /// Borrow the live bracket.
    pub fn bracket(&self) -> Result<&Bracket, BracketError> {
        self.bracket.as_ref().ok_or(BracketError::BracketNotFound)
    }

    /// Build the class's bracket. Fails if one already exists.
    pub fn create_bracket<R: Rng + ?Sized>(
        &mut self,
        seeding: &Seeding,
        rng: &mut R,
    ) -> Result<&Bracket, BracketError> {
        if self.bracket.is_some() {
            return Err(BracketError::BracketAlreadyExists);
        }
        let format = self.class.format;
        let bracket = match seeding {
            Seeding::InputOrder => build(&self.roster, format, None)?,
            Seeding::Explicit(order) => build(&self.roster, format, Some(order.as_slice()))?,
            Seeding::Shuffled => build_shuffled(&self.roster, format, rng)?,
        };
        log::info!(
            "class {}: created {:?} bracket for {} participants",
            self.class.name,
            format,
            self.roster.len()
        );
        Ok(&*self.bracket.insert(bracket))
    }

    /// Record or overwrite a match result.
    pub fn record_result(
        &mut self,
        match_id: MatchId,
        score_a: u32,
        score_b: u32,
        metadata: MatchMetadata,
    ) -> Result<&Bracket, BracketError> {
        let bracket = self.bracket_mut()?;
        record_result(bracket, match_id, score_a, score_b, metadata)?;
        Ok(&*bracket)
    }

    /// Reset all scores, keeping round-1 assignments.
    pub fn clear_results(&mut self) -> Result<&Bracket, BracketError> {
        let bracket = self.bracket_mut()?;
        clear_results(bracket);
        log::info!("class {}: cleared all results", self.class.name);
        self.bracket()
    }

    /// Replace the bracket with a freshly shuffled one. Results are discarded;
    /// callers confirm destructive intent beforehand.
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&Bracket, BracketError> {
        let bracket = build_shuffled(&self.roster, self.class.format, rng)?;
        log::info!(
            "class {}: reshuffled bracket (previous bracket discarded: {})",
            self.class.name,
            self.bracket.is_some()
        );
        Ok(&*self.bracket.insert(bracket))
    }

    /// Remove the bracket entirely (back to NOT_CREATED).
    pub fn delete(&mut self) -> Result<Bracket, BracketError> {
        let bracket = self.bracket.take().ok_or(BracketError::BracketNotFound)?;
        log::info!("class {}: deleted bracket", self.class.name);
        Ok(bracket)
    }

    /// Open the graded decider between pairing `challenger` and the feeder pairing.
    pub fn open_decider(&mut self, challenger: usize) -> Result<MatchId, BracketError> {
        let id = open_decider(self.bracket_mut()?, challenger)?;
        log::info!("class {}: opened decider match {}", self.class.name, id);
        Ok(id)
    }

    /// Current medal placements.
    pub fn medals(&self) -> Result<Medals, BracketError> {
        self.bracket().map(derive_medals)
    }
}
