//! Services
//!
//! Concrete scoring and collection analysis.

pub mod analysis;
mod scoring;

pub use analysis::{BrowseFilter, SortOrder, StarPoint, StoreSummary};
pub use scoring::HeuristicScorer;
