//! Ports (Interfaces)
//!
//! Abstract interfaces that define how callers interact with
//! persistence and scoring. Implementations live in `adapters/` and `services/`.

pub mod repositories;
pub mod services;

// Re-exports
pub use repositories::*;
pub use services::*;
