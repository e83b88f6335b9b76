//! Encounter repository: the tracker's only route to persisted state.

use super::error::{SnapshotError, StorageResult};
use super::kv::KeyValueStore;
use super::snapshot::{
    decode_combatants, decode_known_names, decode_progress, encode_combatants,
    encode_known_names, encode_progress, Snapshot, ENTRIES_KEY, SAVED_NAMES_KEY, TURN_KEY,
};
use crate::core::session::combat::{Combatant, TurnProgress};
use crate::core::session::known_names::KnownNames;

pub trait EncounterRepository {
    /// Restore persisted state. Never fails: unreadable or corrupt keys come
    /// back as their empty defaults.
    fn load(&self) -> Snapshot;

    fn save_combatants(&mut self, combatants: &[Combatant]) -> StorageResult<()>;

    fn save_known_names(&mut self, names: &KnownNames) -> StorageResult<()>;

    fn save_progress(&mut self, progress: TurnProgress) -> StorageResult<()>;
}

/// [`EncounterRepository`] over any [`KeyValueStore`], one key per concern.
#[derive(Debug, Clone)]
pub struct SnapshotRepository<S> {
    store: S,
}

impl<S: KeyValueStore> SnapshotRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read<T: Default>(
        &self,
        key: &'static str,
        decode: fn(&str) -> Result<T, SnapshotError>,
    ) -> T {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::debug!("No stored value for '{key}', starting empty");
                return T::default();
            }
            Err(e) => {
                log::warn!("Failed to read '{key}': {e}, starting empty");
                return T::default();
            }
        };

        decode(&raw).unwrap_or_else(|e| {
            log::warn!("{e}, starting empty");
            T::default()
        })
    }
}

impl<S: KeyValueStore> EncounterRepository for SnapshotRepository<S> {
    fn load(&self) -> Snapshot {
        let snapshot = Snapshot {
            combatants: self.read(ENTRIES_KEY, decode_combatants),
            known_names: self.read(SAVED_NAMES_KEY, decode_known_names),
            progress: self.read(TURN_KEY, decode_progress),
        };
        log::info!(
            "Loaded {} combatants and {} known names",
            snapshot.combatants.len(),
            snapshot.known_names.len()
        );
        snapshot
    }

    fn save_combatants(&mut self, combatants: &[Combatant]) -> StorageResult<()> {
        let raw = encode_combatants(combatants)?;
        self.store.set(ENTRIES_KEY, &raw)
    }

    fn save_known_names(&mut self, names: &KnownNames) -> StorageResult<()> {
        let raw = encode_known_names(names)?;
        self.store.set(SAVED_NAMES_KEY, &raw)
    }

    fn save_progress(&mut self, progress: TurnProgress) -> StorageResult<()> {
        let raw = encode_progress(progress)?;
        self.store.set(TURN_KEY, &raw)
    }
}
