//! Scorer Port
//!
//! Assigns musical attributes to a fragment's text.

use crate::domain::{FragmentKind, MusicalScore};

/// Scoring interface
///
/// Implementations must be pure: the same text and kind always produce the
/// same score, and every value lies within the validated range.
pub trait MemoryScorer {
    fn score(&self, text: &str, kind: FragmentKind) -> MusicalScore;
}
