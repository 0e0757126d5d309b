//! Memory - A reflected fragment and its musical attributes
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;
use crate::domain::value_objects::{Emotion, FragmentKind, MusicalScore, SCORE_MAX, SCORE_MIN};

/// Raw field values for a memory, as entered or as read from disk.
///
/// Nothing here is trusted until it passes [`validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryCandidate {
    pub text: String,
    pub pitch: f64,
    pub tempo: f64,
    pub dissonance: f64,
    pub emotion: String,
    #[serde(default)]
    pub kind: FragmentKind,
    pub created_at: DateTime<Utc>,
}

impl MemoryCandidate {
    /// Create a candidate stamped with the current time
    pub fn new(
        text: impl Into<String>,
        kind: FragmentKind,
        pitch: f64,
        tempo: f64,
        dissonance: f64,
        emotion: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            pitch,
            tempo,
            dissonance,
            emotion: emotion.into(),
            kind,
            created_at: Utc::now(),
        }
    }

    /// Create a candidate from a scorer result
    pub fn from_score(text: impl Into<String>, kind: FragmentKind, score: &MusicalScore) -> Self {
        Self::new(
            text,
            kind,
            score.pitch,
            score.tempo,
            score.dissonance,
            score.emotion.as_str(),
        )
    }
}

/// MemoryRecord - A validated, immutable memory fragment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryRecord {
    text: String,
    pitch: f64,
    tempo: f64,
    dissonance: f64,
    emotion: Emotion,
    kind: FragmentKind,
    created_at: DateTime<Utc>,
}

impl MemoryRecord {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    pub fn tempo(&self) -> f64 {
        self.tempo
    }

    pub fn dissonance(&self) -> f64 {
        self.dissonance
    }

    pub fn emotion(&self) -> Emotion {
        self.emotion
    }

    pub fn kind(&self) -> FragmentKind {
        self.kind
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The four scored attributes of this record
    pub fn score(&self) -> MusicalScore {
        MusicalScore {
            pitch: self.pitch,
            tempo: self.tempo,
            dissonance: self.dissonance,
            emotion: self.emotion,
        }
    }
}

/// Turn raw field values into a well-formed record.
///
/// Bounded fields are rejected when out of range, never clamped.
pub fn validate(candidate: MemoryCandidate) -> Result<MemoryRecord, ValidationError> {
    if candidate.text.trim().is_empty() {
        return Err(ValidationError::EmptyText);
    }

    check_bounded("pitch", candidate.pitch)?;
    check_bounded("tempo", candidate.tempo)?;
    check_bounded("dissonance", candidate.dissonance)?;

    let emotion = candidate
        .emotion
        .parse::<Emotion>()
        .map_err(|_| ValidationError::UnknownEmotion(candidate.emotion.clone()))?;

    Ok(MemoryRecord {
        text: candidate.text,
        pitch: candidate.pitch,
        tempo: candidate.tempo,
        dissonance: candidate.dissonance,
        emotion,
        kind: candidate.kind,
        created_at: candidate.created_at,
    })
}

fn check_bounded(field: &'static str, value: f64) -> Result<(), ValidationError> {
    // NaN fails the range check
    if (SCORE_MIN..=SCORE_MAX).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange { field, value })
    }
}
