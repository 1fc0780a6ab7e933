//! Young/old classification of age labels.
//!
//! Labels are compared by their string form, so `20`, `20.0` parsed as a
//! number, and the text `"20-29"` all go through the same substring check.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

const YOUNG_MARKERS: [&str; 1] = ["20"];
const OLD_MARKERS: [&str; 2] = ["60", "70"];

fn contains_any(label: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| label.contains(m))
}

/// True if the label's string form contains `"20"`.
pub fn is_young<T: Display + ?Sized>(label: &T) -> bool {
    contains_any(&label.to_string(), &YOUNG_MARKERS)
}

/// True if the label's string form contains `"60"` or `"70"`.
pub fn is_old<T: Display + ?Sized>(label: &T) -> bool {
    contains_any(&label.to_string(), &OLD_MARKERS)
}

/// Cohort assignment of an age label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    /// Matches the young predicate only.
    Young,
    /// Matches the old predicate only.
    Old,
    /// Matches both predicates, e.g. `"20/60"`.
    Ambiguous,
    /// Matches neither predicate.
    Unassigned,
}

impl AgeGroup {
    /// Classify a label using [`is_young`] and [`is_old`].
    pub fn classify<T: Display + ?Sized>(label: &T) -> Self {
        let label = label.to_string();
        match (
            contains_any(&label, &YOUNG_MARKERS),
            contains_any(&label, &OLD_MARKERS),
        ) {
            (true, false) => Self::Young,
            (false, true) => Self::Old,
            (true, true) => Self::Ambiguous,
            (false, false) => Self::Unassigned,
        }
    }

    /// Get the descriptive name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Young => "young",
            Self::Old => "old",
            Self::Ambiguous => "ambiguous",
            Self::Unassigned => "unassigned",
        }
    }
}
