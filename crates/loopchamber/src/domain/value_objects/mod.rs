//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod emotion;
mod fragment_kind;
mod musical_score;

pub use emotion::*;
pub use fragment_kind::*;
pub use musical_score::*;
