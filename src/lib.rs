//! Competition bracket engine: library with models and bracket logic.

pub mod config;
pub mod logic;
pub mod models;
pub mod roster;

pub use config::ServiceConfig;
pub use logic::{
    aggregate, build, build_shuffled, clear_results, derive_medals, open_decider, record_result,
    EligibilityRule, Seeding,
};
pub use models::{
    Bracket, BracketError, BracketMatch, BracketState, Class, ClassId, Decider, Discipline,
    Division, DojoRanking, Format, Gender, GradedBracket, MatchId, MatchMetadata, MatchRecord,
    MedalEntry, Medals, Participant, ParticipantId, Side, StandardBracket, Tier,
    UNKNOWN_ORGANIZATION,
};
pub use roster::{read_roster, RosterError};
