//! Analysis Service - Collection statistics, browsing and starfield coordinates
//!
//! Read-only views over a slice of records; nothing here touches disk.
//! Views that select records return `(position, record)` pairs, where the
//! position is the zero-based index in insertion order.

use std::cmp::Ordering;

use serde::Serialize;

use crate::domain::{Emotion, FragmentKind, MemoryRecord};

/// Aggregate view of a memory collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreSummary {
    pub count: usize,
    /// Mean pitch, `None` for an empty collection
    pub mean_pitch: Option<f64>,
    pub mean_tempo: Option<f64>,
    pub mean_dissonance: Option<f64>,
    /// Record count per emotion tag, in `Emotion::ALL` order
    pub emotions: Vec<(Emotion, usize)>,
}

/// One memory placed in the dissonance × pitch plane
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarPoint {
    /// Position in insertion order (zero-based)
    pub index: usize,
    /// Horizontal axis: tension
    pub x: f64,
    /// Vertical axis: relevance
    pub y: f64,
    /// Marker size: recall tempo
    pub size: f64,
    pub emotion: Emotion,
}

/// Record selection for browsing; `None` matches everything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BrowseFilter {
    pub kind: Option<FragmentKind>,
    pub emotion: Option<Emotion>,
}

impl BrowseFilter {
    pub fn matches(&self, record: &MemoryRecord) -> bool {
        self.kind.map_or(true, |kind| record.kind() == kind)
            && self.emotion.map_or(true, |emotion| record.emotion() == emotion)
    }
}

/// Browse ordering; ties keep insertion order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Newest,
    #[default]
    Oldest,
    Pitch,
    Dissonance,
    Tempo,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Newest => write!(f, "newest"),
            SortOrder::Oldest => write!(f, "oldest"),
            SortOrder::Pitch => write!(f, "pitch"),
            SortOrder::Dissonance => write!(f, "dissonance"),
            SortOrder::Tempo => write!(f, "tempo"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "pitch" => Ok(SortOrder::Pitch),
            "dissonance" => Ok(SortOrder::Dissonance),
            "tempo" => Ok(SortOrder::Tempo),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

/// Records matching `filter`, ordered by `sort`.
///
/// Score orders are highest first.
pub fn browse<'a>(
    records: &'a [MemoryRecord],
    filter: &BrowseFilter,
    sort: SortOrder,
) -> Vec<(usize, &'a MemoryRecord)> {
    let mut selected: Vec<(usize, &MemoryRecord)> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| filter.matches(record))
        .collect();

    // sort_by is stable
    match sort {
        SortOrder::Oldest => {}
        SortOrder::Newest => selected.sort_by(|(_, a), (_, b)| b.created_at().cmp(&a.created_at())),
        SortOrder::Pitch => selected.sort_by(|(_, a), (_, b)| descending(a.pitch(), b.pitch())),
        SortOrder::Dissonance => {
            selected.sort_by(|(_, a), (_, b)| descending(a.dissonance(), b.dissonance()))
        }
        SortOrder::Tempo => selected.sort_by(|(_, a), (_, b)| descending(a.tempo(), b.tempo())),
    }

    selected
}

/// The `limit` most dissonant records, highest first
pub fn top_dissonant(records: &[MemoryRecord], limit: usize) -> Vec<(usize, &MemoryRecord)> {
    let mut ranked = browse(records, &BrowseFilter::default(), SortOrder::Dissonance);
    ranked.truncate(limit);
    ranked
}

/// Records grouped by emotion in `Emotion::ALL` order; empty groups are omitted
pub fn group_by_emotion(records: &[MemoryRecord]) -> Vec<(Emotion, Vec<(usize, &MemoryRecord)>)> {
    Emotion::ALL
        .iter()
        .map(|&emotion| {
            let filter = BrowseFilter {
                emotion: Some(emotion),
                ..Default::default()
            };
            (emotion, browse(records, &filter, SortOrder::Oldest))
        })
        .filter(|(_, group)| !group.is_empty())
        .collect()
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

pub fn summarize(records: &[MemoryRecord]) -> StoreSummary {
    let emotions = Emotion::ALL
        .iter()
        .map(|&emotion| {
            let count = records.iter().filter(|r| r.emotion() == emotion).count();
            (emotion, count)
        })
        .collect();

    StoreSummary {
        count: records.len(),
        mean_pitch: mean(records, MemoryRecord::pitch),
        mean_tempo: mean(records, MemoryRecord::tempo),
        mean_dissonance: mean(records, MemoryRecord::dissonance),
        emotions,
    }
}

pub fn starfield(records: &[MemoryRecord]) -> Vec<StarPoint> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| StarPoint {
            index,
            x: record.dissonance(),
            y: record.pitch(),
            size: record.tempo(),
            emotion: record.emotion(),
        })
        .collect()
}

fn mean(records: &[MemoryRecord], field: fn(&MemoryRecord) -> f64) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let total: f64 = records.iter().map(field).sum();
    Some(total / records.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{validate, FragmentKind, MemoryCandidate};

    fn record(pitch: f64, tempo: f64, dissonance: f64, emotion: &str) -> MemoryRecord {
        validate(MemoryCandidate::new(
            "fragment",
            FragmentKind::Reflection,
            pitch,
            tempo,
            dissonance,
            emotion,
        ))
        .unwrap()
    }

    #[test]
    fn test_empty_summary_has_no_means() {
        let summary = summarize(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean_pitch, None);
        assert_eq!(summary.mean_tempo, None);
        assert_eq!(summary.mean_dissonance, None);
        assert!(summary.emotions.iter().all(|(_, n)| *n == 0));
    }

    #[test]
    fn test_summary_means_and_emotions() {
        let records = vec![
            record(0.25, 0.5, 0.0, "positive"),
            record(0.75, 0.5, 1.0, "positive"),
            record(0.5, 0.5, 0.5, "tense"),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.mean_pitch, Some(0.5));
        assert_eq!(summary.mean_tempo, Some(0.5));
        assert_eq!(summary.mean_dissonance, Some(0.5));
        assert_eq!(summary.emotions[0], (Emotion::Positive, 2));
        assert_eq!(summary.emotions[4], (Emotion::Tense, 1));
    }

    #[test]
    fn test_starfield_follows_insertion_order() {
        let records = vec![
            record(0.9, 0.2, 0.1, "neutral"),
            record(0.3, 0.7, 0.8, "complex"),
        ];
        let points = starfield(&records);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].index, 0);
        assert_eq!((points[0].x, points[0].y, points[0].size), (0.1, 0.9, 0.2));
        assert_eq!(points[1].emotion, Emotion::Complex);
    }

    fn tagged(text: &str, kind: FragmentKind, dissonance: f64, emotion: &str) -> MemoryRecord {
        validate(MemoryCandidate::new(text, kind, 0.5, 0.5, dissonance, emotion)).unwrap()
    }

    fn texts(selected: &[(usize, &MemoryRecord)]) -> Vec<String> {
        selected.iter().map(|(_, r)| r.text().to_string()).collect()
    }

    #[test]
    fn test_browse_filters_by_kind_and_emotion() {
        let records = vec![
            tagged("a", FragmentKind::Insight, 0.1, "positive"),
            tagged("b", FragmentKind::Event, 0.2, "positive"),
            tagged("c", FragmentKind::Insight, 0.3, "tense"),
        ];

        let by_kind = BrowseFilter {
            kind: Some(FragmentKind::Insight),
            ..Default::default()
        };
        assert_eq!(texts(&browse(&records, &by_kind, SortOrder::Oldest)), ["a", "c"]);

        let both = BrowseFilter {
            kind: Some(FragmentKind::Insight),
            emotion: Some(Emotion::Positive),
        };
        let selected = browse(&records, &both, SortOrder::Oldest);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].0, 0);
    }

    #[test]
    fn test_browse_sorts_highest_first() {
        let records = vec![
            record(0.2, 0.9, 0.5, "neutral"),
            record(0.8, 0.1, 0.4, "neutral"),
            record(0.5, 0.5, 0.6, "neutral"),
        ];
        let all = BrowseFilter::default();

        let by_pitch: Vec<usize> = browse(&records, &all, SortOrder::Pitch)
            .iter()
            .map(|(i, _)| *i)
            .collect();
        assert_eq!(by_pitch, [1, 2, 0]);

        let by_tempo: Vec<usize> = browse(&records, &all, SortOrder::Tempo)
            .iter()
            .map(|(i, _)| *i)
            .collect();
        assert_eq!(by_tempo, [0, 2, 1]);
    }

    #[test]
    fn test_browse_newest_reverses_creation_order() {
        let first = record(0.5, 0.5, 0.5, "neutral");
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = record(0.5, 0.5, 0.5, "neutral");
        let records = vec![first, second];

        let order: Vec<usize> = browse(&records, &BrowseFilter::default(), SortOrder::Newest)
            .iter()
            .map(|(i, _)| *i)
            .collect();
        assert_eq!(order, [1, 0]);
    }

    #[test]
    fn test_sort_ties_keep_insertion_order() {
        let records = vec![
            tagged("first", FragmentKind::Event, 0.7, "neutral"),
            tagged("low", FragmentKind::Event, 0.1, "neutral"),
            tagged("second", FragmentKind::Event, 0.7, "neutral"),
            tagged("third", FragmentKind::Event, 0.7, "neutral"),
        ];
        let selected = browse(&records, &BrowseFilter::default(), SortOrder::Dissonance);
        assert_eq!(texts(&selected), ["first", "second", "third", "low"]);

        let by_pitch = browse(&records, &BrowseFilter::default(), SortOrder::Pitch);
        assert_eq!(texts(&by_pitch), ["first", "low", "second", "third"]);
    }

    #[test]
    fn test_top_dissonant_limits_results() {
        let records: Vec<MemoryRecord> = (0..7)
            .map(|i| tagged(&format!("m{i}"), FragmentKind::Event, i as f64 / 10.0, "tense"))
            .collect();

        let top = top_dissonant(&records, 5);
        assert_eq!(texts(&top), ["m6", "m5", "m4", "m3", "m2"]);
        assert_eq!(top_dissonant(&records[..2], 5).len(), 2);
    }

    #[test]
    fn test_group_by_emotion_skips_empty_groups() {
        let records = vec![
            tagged("a", FragmentKind::Event, 0.1, "tense"),
            tagged("b", FragmentKind::Event, 0.1, "positive"),
            tagged("c", FragmentKind::Event, 0.1, "tense"),
        ];
        let groups = group_by_emotion(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, Emotion::Positive);
        assert_eq!(groups[1].0, Emotion::Tense);
        assert_eq!(texts(&groups[1].1), ["a", "c"]);
    }

    #[test]
    fn test_sort_order_parses() {
        assert_eq!("Dissonance".parse::<SortOrder>(), Ok(SortOrder::Dissonance));
        assert!("loudest".parse::<SortOrder>().is_err());
    }
}
