//! Adapters
//!
//! Infrastructure implementations of the repository ports.

mod json_store;

pub use json_store::{JsonMemoryStore, StagedDocument};
