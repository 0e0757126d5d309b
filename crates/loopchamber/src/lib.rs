//! LoopChamber Memory Library
//!
//! Core types for scoring short "memory fragments" with musical attributes
//! (pitch, tempo, dissonance, emotion) and keeping them in a durable JSON store.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain/`): Pure records and validation
//!   - `entities/`: `MemoryRecord` and its raw `MemoryCandidate`
//!   - `value_objects/`: Immutable value types (Emotion, FragmentKind, MusicalScore)
//!   - `errors/`: Validation and store error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Record persistence contract
//!   - `services/`: Scoring contract
//!
//! - **Services** (`services/`): Heuristic scorer and collection analysis
//!
//! - **Adapters** (`adapters/`): File-backed JSON store
//!
//! # Usage
//!
//! ```rust,ignore
//! use loopchamber::{validate, FragmentKind, HeuristicScorer, JsonMemoryStore, MemoryCandidate};
//! use loopchamber::{MemoryRepository, MemoryScorer};
//!
//! let mut store = JsonMemoryStore::open("memory/memories.json")?;
//! let text = "I love the rain, but it keeps me inside";
//! let score = HeuristicScorer::new().score(text, FragmentKind::Reflection);
//! let record = validate(MemoryCandidate::from_score(text, FragmentKind::Reflection, &score))?;
//! store.save(record)?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export commonly used types
pub use adapters::{JsonMemoryStore, StagedDocument};
pub use domain::{
    validate, CorruptStoreError, Emotion, FragmentKind, MemoryCandidate, MemoryRecord,
    MusicalScore, StoreError, ValidationError, SCORE_MAX, SCORE_MIN,
};
pub use ports::{MemoryRepository, MemoryScorer};
pub use services::{analysis, BrowseFilter, HeuristicScorer, SortOrder, StarPoint, StoreSummary};
