//! Emotion - Affective tag of a memory fragment

use serde::{Deserialize, Serialize};

/// Emotional charge of a memory
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Emotion {
    Positive,
    Negative,
    #[default]
    Neutral,
    Complex,
    Tense,
}

impl Emotion {
    /// Every recognized tag, in display order
    pub const ALL: [Emotion; 5] = [
        Emotion::Positive,
        Emotion::Negative,
        Emotion::Neutral,
        Emotion::Complex,
        Emotion::Tense,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Positive => "positive",
            Emotion::Negative => "negative",
            Emotion::Neutral => "neutral",
            Emotion::Complex => "complex",
            Emotion::Tense => "tense",
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Emotion::Positive),
            "negative" => Ok(Emotion::Negative),
            "neutral" => Ok(Emotion::Neutral),
            "complex" => Ok(Emotion::Complex),
            "tense" => Ok(Emotion::Tense),
            _ => Err(format!("Unknown emotion: {}", s)),
        }
    }
}

impl TryFrom<String> for Emotion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
