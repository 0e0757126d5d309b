//! Domain Entities
//!
//! - MemoryRecord: A validated, immutable memory fragment
//! - MemoryCandidate: Raw field values awaiting validation

mod memory;

pub use memory::*;
