//! Bracket engine operations: build, results, lifecycle, medals, tally.

mod builder;
mod lifecycle;
mod medals;
mod results;
mod tally;

pub use builder::{build, build_shuffled};
pub use lifecycle::Seeding;
pub use medals::derive_medals;
pub use results::{clear_results, open_decider, record_result};
pub use tally::{aggregate, EligibilityRule};
