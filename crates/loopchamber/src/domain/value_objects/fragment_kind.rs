//! FragmentKind - Classification of memory fragments

use serde::{Deserialize, Serialize};

/// Fragment type, one of the inputs to scoring
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum FragmentKind {
    Insight,
    Question,
    Observation,
    Event,
    #[default]
    Reflection,
}

impl FragmentKind {
    pub const ALL: [FragmentKind; 5] = [
        FragmentKind::Insight,
        FragmentKind::Question,
        FragmentKind::Observation,
        FragmentKind::Event,
        FragmentKind::Reflection,
    ];
}

impl std::fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FragmentKind::Insight => write!(f, "insight"),
            FragmentKind::Question => write!(f, "question"),
            FragmentKind::Observation => write!(f, "observation"),
            FragmentKind::Event => write!(f, "event"),
            FragmentKind::Reflection => write!(f, "reflection"),
        }
    }
}

impl std::str::FromStr for FragmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "insight" => Ok(FragmentKind::Insight),
            "question" => Ok(FragmentKind::Question),
            "observation" => Ok(FragmentKind::Observation),
            "event" => Ok(FragmentKind::Event),
            "reflection" => Ok(FragmentKind::Reflection),
            _ => Err(format!("Unknown fragment kind: {}", s)),
        }
    }
}

impl TryFrom<String> for FragmentKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
