//! MusicalScore - The four attributes a scorer assigns to a fragment

use serde::{Deserialize, Serialize};

use super::Emotion;

/// Lower bound of every bounded attribute
pub const SCORE_MIN: f64 = 0.0;
/// Upper bound of every bounded attribute
pub const SCORE_MAX: f64 = 1.0;

/// Scoring result for a single fragment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MusicalScore {
    /// Resonant clarity / relevance (0.0 - 1.0)
    pub pitch: f64,
    /// Activation speed / recall frequency (0.0 - 1.0)
    pub tempo: f64,
    /// Conflict with existing state (0.0 - 1.0)
    pub dissonance: f64,
    pub emotion: Emotion,
}
