//! Session Module
//!
//! Sub-modules for running an encounter: initiative order and the turn
//! pointer, the condition catalog, remembered player names, and the tracker
//! that ties them to persistence.

pub mod combat;
pub mod conditions;
pub mod known_names;
pub mod tracker;

// Re-exports for convenience
pub use combat::{
    Combatant, CombatantId, CombatantType, Encounter, TurnAnchor, TurnProgress, TurnResult,
};

pub use conditions::{Condition, ConditionSet, UnknownCondition};

pub use known_names::KnownNames;

pub use tracker::{parse_entry, EncounterTracker, EntryError, StateChange};
