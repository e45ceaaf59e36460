//! Data structures for the bracket engine: participants, matches, brackets, classes, medals.

mod bracket;
mod class;
mod matches;
mod medal;
mod participant;

pub use bracket::{
    Bracket, BracketError, BracketState, Decider, Format, GradedBracket, StandardBracket,
};
pub use class::{Class, ClassId, Discipline, Division, Gender};
pub use matches::{BracketMatch, MatchId, MatchMetadata, MatchRecord, Side};
pub use medal::{DojoRanking, MedalEntry, Medals, Tier};
pub use participant::{Participant, ParticipantId, UNKNOWN_ORGANIZATION};
