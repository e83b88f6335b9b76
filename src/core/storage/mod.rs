//! Storage module: key-value persistence shim and the encounter snapshot.
//!
//! # Modules
//!
//! - `kv` - `KeyValueStore` trait with file-backed and in-memory stores
//! - `snapshot` - JSON codec and load-time validation for persisted keys
//! - `repository` - `EncounterRepository`, the tracker's persistence seam
//! - `error` - Error types for storage operations

pub mod error;
pub mod kv;
pub mod repository;
pub mod snapshot;

pub use error::{SnapshotError, StorageError, StorageResult};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use repository::{EncounterRepository, SnapshotRepository};
pub use snapshot::Snapshot;
