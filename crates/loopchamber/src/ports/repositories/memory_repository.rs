//! Memory Repository Port
//!
//! Abstract interface for memory persistence.
//! The contract is append-only plus full reset; records are never edited in place.

use crate::domain::{MemoryRecord, StoreError};

/// Repository interface for memory records
pub trait MemoryRepository {
    /// Re-read the persisted collection, replacing the in-memory view.
    ///
    /// A missing document is an empty collection. A malformed one is an error
    /// and leaves both the document and the in-memory view untouched.
    fn load(&mut self) -> Result<Vec<MemoryRecord>, StoreError>;

    /// Append a record and persist the whole collection.
    ///
    /// Either the record is durably stored or the collection is unchanged.
    fn save(&mut self, record: MemoryRecord) -> Result<(), StoreError>;

    /// Remove every record and persist an empty collection.
    fn reset(&mut self) -> Result<(), StoreError>;

    /// Current records in insertion order, without touching disk
    fn all(&self) -> &[MemoryRecord];
}
