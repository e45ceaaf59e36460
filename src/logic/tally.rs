//! Cross-class medal tally: per-dojo counts over every eligible class.

use crate::logic::medals::derive_medals;
use crate::models::{Bracket, Class, Discipline, DojoRanking, Format};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Minimum unique participants a class needs before its medals count.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EligibilityRule {
    /// Forms discipline in Standard format.
    pub forms_standard_min: usize,
    /// Every other discipline/format combination.
    pub default_min: usize,
}

impl Default for EligibilityRule {
    fn default() -> Self {
        Self {
            forms_standard_min: 3,
            default_min: 4,
        }
    }
}

impl EligibilityRule {
    pub fn floor(&self, class: &Class) -> usize {
        match (class.discipline, class.format) {
            (Discipline::Forms, Format::Standard) => self.forms_standard_min,
            _ => self.default_min,
        }
    }

    /// Counts distinct participants in the bracket, not the roster.
    pub fn is_eligible(&self, class: &Class, bracket: &Bracket) -> bool {
        bracket.unique_participants() >= self.floor(class)
    }
}

/// Tally medals per dojo across classes.
///
/// `level_filter` keeps only classes whose age category matches (case-insensitive)
/// and is applied before eligibility. Ineligible or inconsistent classes are skipped.
/// Rows are ordered by gold, silver, bronze, then total, all descending; remaining
/// ties keep first-seen order.
pub fn aggregate<'a, I>(
    classes: I,
    level_filter: Option<&str>,
    rule: &EligibilityRule,
) -> Vec<DojoRanking>
where
    I: IntoIterator<Item = (&'a Class, &'a Bracket)>,
{
    let mut rows: Vec<DojoRanking> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (class, bracket) in classes {
        if let Some(level) = level_filter {
            if !class.age_category.trim().eq_ignore_ascii_case(level.trim()) {
                continue;
            }
        }
        if class.format != bracket.format() {
            log::warn!(
                "tally: skipping class {} (class format {:?}, bracket format {:?})",
                class.name,
                class.format,
                bracket.format()
            );
            continue;
        }
        if !rule.is_eligible(class, bracket) {
            log::debug!(
                "tally: class {} below medal floor ({} < {})",
                class.name,
                bracket.unique_participants(),
                rule.floor(class)
            );
            continue;
        }

        for entry in derive_medals(bracket).entries() {
            let slot = *index.entry(entry.organization.clone()).or_insert_with(|| {
                rows.push(DojoRanking::new(entry.organization.clone()));
                rows.len() - 1
            });
            rows[slot].add(entry.tier);
        }
    }

    rows.sort_by_key(|r| {
        (
            Reverse(r.gold),
            Reverse(r.silver),
            Reverse(r.bronze),
            Reverse(r.total),
        )
    });
    rows
}
