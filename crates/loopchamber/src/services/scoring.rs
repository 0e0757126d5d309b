//! Scoring Service - Heuristic musical attributes
//!
//! Scores a fragment from its wording and kind.
//! Rule-based and deterministic, swappable behind `MemoryScorer`.

use crate::domain::{Emotion, FragmentKind, MusicalScore};
use crate::ports::MemoryScorer;

/// Words and phrases signalling an internal contradiction
const CONTRADICTION_SIGNALS: &[&str] = &[
    "but",
    "however",
    "nevertheless",
    "conversely",
    "on the other hand",
    "in contrast",
    "contrary",
    "opposite",
    "unlike",
    "instead",
    "while",
    "whereas",
    "yet",
    "although",
    "despite",
    "in spite",
];

const POSITIVE_LEXICON: &[&str] = &[
    "happy", "joy", "glad", "delight", "pleased", "cheerful", "content", "satisfied", "excited",
    "thrilled", "optimistic", "enthusiastic", "hopeful", "confident", "proud", "love", "adore",
    "enjoy", "like",
];

const NEGATIVE_LEXICON: &[&str] = &[
    "sad", "unhappy", "depressed", "gloomy", "miserable", "disappointed", "frustrated", "annoyed",
    "angry", "furious", "outraged", "irritated", "upset", "worried", "anxious", "afraid",
    "fearful", "scared",
];

const NEUTRAL_LEXICON: &[&str] = &[
    "think", "consider", "believe", "understand", "know", "recognize", "observe", "notice",
    "perceive", "feel", "sense", "experience",
];

const COMPLEX_LEXICON: &[&str] = &[
    "bittersweet",
    "ambivalent",
    "conflicted",
    "torn",
    "mixed feelings",
    "nostalgic",
    "melancholy",
    "sentimental",
    "wistful",
    "longing",
];

/// Lexicons in tie-break order
const LEXICONS: [(Emotion, &[&str]); 4] = [
    (Emotion::Positive, POSITIVE_LEXICON),
    (Emotion::Negative, NEGATIVE_LEXICON),
    (Emotion::Neutral, NEUTRAL_LEXICON),
    (Emotion::Complex, COMPLEX_LEXICON),
];

const SIGNAL_WEIGHT: f64 = 0.15;
const QUESTION_WEIGHT: f64 = 0.2;

/// Rule-based scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

impl HeuristicScorer {
    pub fn new() -> Self {
        Self
    }

    fn pitch_weight(kind: FragmentKind) -> f64 {
        match kind {
            FragmentKind::Insight => 0.8,
            FragmentKind::Question => 0.7,
            FragmentKind::Observation => 0.6,
            FragmentKind::Event => 0.5,
            FragmentKind::Reflection => 0.7,
        }
    }

    fn tempo_weight(kind: FragmentKind) -> f64 {
        match kind {
            FragmentKind::Insight => 0.7,
            FragmentKind::Question => 0.8,
            FragmentKind::Observation => 0.5,
            FragmentKind::Event => 0.4,
            FragmentKind::Reflection => 0.6,
        }
    }
}

impl MemoryScorer for HeuristicScorer {
    fn score(&self, text: &str, kind: FragmentKind) -> MusicalScore {
        let lowered = text.to_lowercase();
        let words = tokenize(&lowered);
        let word_count = lowered.split_whitespace().count();

        // Longer text tends to carry more substance
        let length_factor = (word_count as f64 / 100.0).clamp(0.1, 1.0);
        let pitch = length_factor * 0.4 + Self::pitch_weight(kind) * 0.6;

        let signals = count_present(&words, CONTRADICTION_SIGNALS);
        let contradiction = (signals as f64 * SIGNAL_WEIGHT).min(0.8);
        let dissonance = contradiction.clamp(0.1, 0.9);

        let questions = lowered.matches('?').count();
        let question_factor = (questions as f64 * QUESTION_WEIGHT).min(0.8);
        let tempo = question_factor * 0.4 + Self::tempo_weight(kind) * 0.6;

        MusicalScore {
            pitch: round2(pitch),
            tempo: round2(tempo),
            dissonance: round2(dissonance),
            emotion: dominant_emotion(&words),
        }
    }
}

/// Category with the most distinct lexicon hits; earlier categories win ties
fn dominant_emotion(words: &[&str]) -> Emotion {
    let mut dominant = Emotion::Neutral;
    let mut max_count = 0;

    for (emotion, lexicon) in LEXICONS {
        let count = count_present(words, lexicon);
        if count > max_count {
            max_count = count;
            dominant = emotion;
        }
    }

    dominant
}

fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .collect()
}

/// Number of entries (single words or phrases) that occur at least once
fn count_present(words: &[&str], entries: &[&str]) -> usize {
    entries
        .iter()
        .filter(|entry| contains_phrase(words, entry))
        .count()
}

fn contains_phrase(words: &[&str], phrase: &str) -> bool {
    let parts: Vec<&str> = phrase.split_whitespace().collect();
    if parts.is_empty() || parts.len() > words.len() {
        return false;
    }
    words.windows(parts.len()).any(|window| window == parts.as_slice())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
