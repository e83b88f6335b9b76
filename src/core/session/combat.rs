//! Encounter Management Module
//!
//! Combatants, initiative ordering and the current-turn pointer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::conditions::{Condition, ConditionSet};

// ============================================================================
// Combatant Types
// ============================================================================

/// Opaque combatant identifier. Only used for lookup, never for ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombatantId(String);

impl CombatantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CombatantId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for CombatantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for CombatantId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombatantType {
    #[default]
    Player,
    Monster,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown combatant type: {0}")]
pub struct UnknownCombatantType(pub String);

impl CombatantType {
    pub fn label(self) -> &'static str {
        match self {
            CombatantType::Player => "player",
            CombatantType::Monster => "monster",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            CombatantType::Player => CombatantType::Monster,
            CombatantType::Monster => CombatantType::Player,
        }
    }
}

impl FromStr for CombatantType {
    type Err = UnknownCombatantType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "player" => Ok(CombatantType::Player),
            "monster" => Ok(CombatantType::Monster),
            _ => Err(UnknownCombatantType(s.to_string())),
        }
    }
}

// ============================================================================
// Combatant
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub initiative: i32,
    #[serde(rename = "type")]
    pub combatant_type: CombatantType,
    #[serde(default)]
    pub conditions: ConditionSet,
}

impl Combatant {
    /// Create a new combatant with a fresh id and no conditions
    pub fn new(name: impl Into<String>, initiative: i32, combatant_type: CombatantType) -> Self {
        Self {
            id: CombatantId::new(),
            name: name.into(),
            initiative,
            combatant_type,
            conditions: ConditionSet::new(),
        }
    }

    /// Returns whether the condition is present afterwards
    pub fn toggle_condition(&mut self, condition: Condition) -> bool {
        self.conditions.toggle(condition)
    }

    pub fn has_condition(&self, condition: Condition) -> bool {
        self.conditions.contains(condition)
    }
}

// ============================================================================
// Encounter
// ============================================================================

/// What the turn pointer stays attached to when the list changes shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnAnchor {
    /// Raw list position; inserting or removing entries can change whose turn it is.
    Position,
    /// The current combatant keeps the turn across re-sorts and removals.
    #[default]
    Combatant,
}

/// Round and pointer, persisted alongside the combatants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnProgress {
    pub round: u32,
    pub turn_index: usize,
}

impl Default for TurnProgress {
    fn default() -> Self {
        Self {
            round: 1,
            turn_index: 0,
        }
    }
}

/// Result of moving the turn pointer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResult {
    pub current: Option<CombatantId>,
    pub round: u32,
    pub round_changed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Encounter {
    combatants: Vec<Combatant>,
    round: u32,
    turn_index: usize,
    anchor: TurnAnchor,
}

impl Encounter {
    pub fn new(anchor: TurnAnchor) -> Self {
        Self {
            combatants: vec![],
            round: 1,
            turn_index: 0,
            anchor,
        }
    }

    /// Rebuild an encounter from persisted parts.
    /// Re-sorts the list and pulls the progress back inside its invariants.
    pub fn restore(combatants: Vec<Combatant>, progress: TurnProgress, anchor: TurnAnchor) -> Self {
        let mut encounter = Self {
            combatants,
            round: progress.round.max(1),
            turn_index: progress.turn_index,
            anchor,
        };
        encounter.sort_initiative();
        if encounter.combatants.is_empty() {
            encounter.reset_turn();
        } else if encounter.turn_index >= encounter.combatants.len() {
            encounter.turn_index = 0;
        }
        encounter
    }

    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    pub fn progress(&self) -> TurnProgress {
        TurnProgress {
            round: self.round,
            turn_index: self.turn_index,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    /// Get the combatant whose turn it is
    pub fn current_combatant(&self) -> Option<&Combatant> {
        self.combatants.get(self.turn_index)
    }

    /// Get a combatant by ID
    pub fn get_combatant(&self, combatant_id: &CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| &c.id == combatant_id)
    }

    pub fn position_of(&self, combatant_id: &CombatantId) -> Option<usize> {
        self.combatants.iter().position(|c| &c.id == combatant_id)
    }

    /// Sort combatants by initiative (highest first).
    /// Stable, so equal initiatives keep insertion order.
    fn sort_initiative(&mut self) {
        self.combatants.sort_by(|a, b| b.initiative.cmp(&a.initiative));
    }

    /// Add a combatant and re-sort initiative
    pub fn add_combatant(&mut self, combatant: Combatant) {
        let current = match self.anchor {
            TurnAnchor::Combatant => self.current_combatant().map(|c| c.id.clone()),
            TurnAnchor::Position => None,
        };

        self.combatants.push(combatant);
        self.sort_initiative();

        if let Some(pos) = current.and_then(|id| self.position_of(&id)) {
            self.turn_index = pos;
        }
    }

    /// Remove a combatant by ID.
    ///
    /// The boundary check runs against the list as it is after removal: once
    /// the pointer no longer addresses a combatant, the turn and round reset.
    pub fn remove_combatant(&mut self, combatant_id: &CombatantId) -> Option<Combatant> {
        let pos = self.position_of(combatant_id)?;
        let removed = self.combatants.remove(pos);

        if self.anchor == TurnAnchor::Combatant && pos < self.turn_index {
            self.turn_index -= 1;
        }
        if self.turn_index >= self.combatants.len() {
            self.reset_turn();
        }

        Some(removed)
    }

    /// Toggle a condition on a combatant.
    /// Returns `None` for an unknown id, else whether the condition is now present.
    pub fn toggle_condition(
        &mut self,
        combatant_id: &CombatantId,
        condition: Condition,
    ) -> Option<bool> {
        self.combatants
            .iter_mut()
            .find(|c| &c.id == combatant_id)
            .map(|c| c.toggle_condition(condition))
    }

    /// Advance to the next turn, starting a new round on wrap-around
    pub fn next_turn(&mut self) -> TurnResult {
        if self.combatants.is_empty() {
            return self.turn_result(false);
        }

        self.turn_index = (self.turn_index + 1) % self.combatants.len();
        let mut round_changed = false;
        if self.turn_index == 0 {
            let round = self.round.saturating_add(1);
            round_changed = round != self.round;
            self.round = round;
        }
        self.turn_result(round_changed)
    }

    /// Go back to the previous turn. Wrapping backwards drops a round, never below 1.
    pub fn previous_turn(&mut self) -> TurnResult {
        if self.combatants.is_empty() {
            return self.turn_result(false);
        }

        let len = self.combatants.len();
        self.turn_index = (self.turn_index + len - 1) % len;

        let mut round_changed = false;
        if self.turn_index == len - 1 && self.round > 1 {
            self.round -= 1;
            round_changed = true;
        }
        self.turn_result(round_changed)
    }

    /// Clear the encounter
    pub fn end(&mut self) {
        self.combatants.clear();
        self.reset_turn();
    }

    fn reset_turn(&mut self) {
        self.turn_index = 0;
        self.round = 1;
    }

    fn turn_result(&self, round_changed: bool) -> TurnResult {
        TurnResult {
            current: self.current_combatant().map(|c| c.id.clone()),
            round: self.round,
            round_changed,
        }
    }
}

impl Default for Encounter {
    fn default() -> Self {
        Self::new(TurnAnchor::default())
    }
}

// ============================================================================
// Tests
// ============================================================================
