//! Encounter Tracker
//!
//! Public operations over an [`Encounter`] plus the Known Names cache. Every
//! state change is written through the [`EncounterRepository`] right after the
//! mutation; write failures are logged and never undo the change.

use thiserror::Error;

use super::combat::{
    Combatant, CombatantId, CombatantType, Encounter, TurnAnchor, TurnResult,
};
use super::conditions::Condition;
use super::known_names::KnownNames;
use crate::core::storage::EncounterRepository;

// ============================================================================
// Entry validation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("name is required")]
    EmptyName,
    #[error("initiative {0:?} is not a whole number")]
    InvalidInitiative(String),
}

/// Validate raw form input into a trimmed name and an integer initiative.
pub fn parse_entry(name: &str, initiative: &str) -> Result<(String, i32), EntryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(EntryError::EmptyName);
    }
    let initiative = initiative
        .trim()
        .parse::<i32>()
        .map_err(|_| EntryError::InvalidInitiative(initiative.to_string()))?;
    Ok((name.to_string(), initiative))
}

/// Which slice of state a mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    Combatants,
    KnownNames,
    Progress,
}

// ============================================================================
// Tracker
// ============================================================================

pub struct EncounterTracker<R> {
    encounter: Encounter,
    known_names: KnownNames,
    repository: R,
}

impl<R: EncounterRepository> EncounterTracker<R> {
    /// Restore persisted state from `repository`.
    pub fn open(repository: R, anchor: TurnAnchor) -> Self {
        let snapshot = repository.load();
        let encounter = Encounter::restore(snapshot.combatants, snapshot.progress, anchor);
        Self {
            encounter,
            known_names: snapshot.known_names,
            repository,
        }
    }

    pub fn encounter(&self) -> &Encounter {
        &self.encounter
    }

    pub fn known_names(&self) -> &KnownNames {
        &self.known_names
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Add a combatant from raw form input.
    ///
    /// Invalid input (blank name, non-integer initiative) is ignored: nothing
    /// changes and `None` comes back.
    pub fn add_combatant(
        &mut self,
        name: &str,
        initiative: &str,
        combatant_type: CombatantType,
    ) -> Option<CombatantId> {
        let (name, initiative) = match parse_entry(name, initiative) {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("Ignoring combatant entry: {e}");
                return None;
            }
        };

        let combatant = Combatant::new(name.clone(), initiative, combatant_type);
        let id = combatant.id.clone();
        let before = self.encounter.progress();

        self.encounter.add_combatant(combatant);
        log::info!(
            "Added {name} ({}) at initiative {initiative}",
            combatant_type.label()
        );
        self.state_changed(StateChange::Combatants);
        if self.encounter.progress() != before {
            self.state_changed(StateChange::Progress);
        }

        if combatant_type == CombatantType::Player && self.known_names.remember(&name) {
            self.state_changed(StateChange::KnownNames);
        }

        Some(id)
    }

    pub fn next_turn(&mut self) -> TurnResult {
        let empty = self.encounter.is_empty();
        let result = self.encounter.next_turn();
        if !empty {
            if result.round_changed {
                log::info!("Round {} begins", result.round);
            }
            self.state_changed(StateChange::Progress);
        }
        result
    }

    pub fn previous_turn(&mut self) -> TurnResult {
        let empty = self.encounter.is_empty();
        let result = self.encounter.previous_turn();
        if !empty {
            self.state_changed(StateChange::Progress);
        }
        result
    }

    pub fn remove_combatant(&mut self, combatant_id: &CombatantId) -> Option<Combatant> {
        let before = self.encounter.progress();
        let removed = self.encounter.remove_combatant(combatant_id)?;

        log::info!("Removed {}", removed.name);
        self.state_changed(StateChange::Combatants);
        if self.encounter.progress() != before {
            self.state_changed(StateChange::Progress);
        }
        Some(removed)
    }

    /// Returns `None` for an unknown id, else whether the condition is now present.
    pub fn toggle_condition(
        &mut self,
        combatant_id: &CombatantId,
        condition: Condition,
    ) -> Option<bool> {
        let present = self.encounter.toggle_condition(combatant_id, condition)?;
        log::debug!(
            "{} {condition} on {combatant_id}",
            if present { "Applied" } else { "Cleared" }
        );
        self.state_changed(StateChange::Combatants);
        Some(present)
    }

    /// Clear every combatant and reset the turn. Known names survive.
    pub fn end_encounter(&mut self) {
        let count = self.encounter.len();
        self.encounter.end();
        log::info!("Encounter ended after clearing {count} combatants");
        self.state_changed(StateChange::Combatants);
        self.state_changed(StateChange::Progress);
    }

    fn state_changed(&mut self, change: StateChange) {
        let result = match change {
            StateChange::Combatants => self
                .repository
                .save_combatants(self.encounter.combatants()),
            StateChange::KnownNames => self.repository.save_known_names(&self.known_names),
            StateChange::Progress => self.repository.save_progress(self.encounter.progress()),
        };
        if let Err(e) = result {
            log::warn!("Failed to persist {change:?}: {e}");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
