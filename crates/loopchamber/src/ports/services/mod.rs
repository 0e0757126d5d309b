//! Service Ports
//!
//! Abstract interfaces for computations the interface layer depends on.

mod scorer;

pub use scorer::*;
