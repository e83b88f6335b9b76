//! Condition Catalog
//!
//! The fixed set of status conditions a combatant can carry, with the short
//! rules text shown in the condition picker. Conditions are descriptive only;
//! nothing in the tracker reacts to them.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Condition
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Blinded,
    Charmed,
    Deafened,
    Fatigued,
    Frightened,
    Grappled,
    Incapacitated,
    Invisible,
    Paralyzed,
    Petrified,
    Poisoned,
    Prone,
    Restrained,
    Stunned,
    Unconscious,
    Exhaustion,
    Bloodied,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown condition: {0}")]
pub struct UnknownCondition(pub String);

impl Condition {
    /// Picker order.
    pub const ALL: [Condition; 17] = [
        Condition::Blinded,
        Condition::Charmed,
        Condition::Deafened,
        Condition::Fatigued,
        Condition::Frightened,
        Condition::Grappled,
        Condition::Incapacitated,
        Condition::Invisible,
        Condition::Paralyzed,
        Condition::Petrified,
        Condition::Poisoned,
        Condition::Prone,
        Condition::Restrained,
        Condition::Stunned,
        Condition::Unconscious,
        Condition::Exhaustion,
        Condition::Bloodied,
    ];

    /// Display name, also the tag written to snapshots.
    pub fn name(self) -> &'static str {
        match self {
            Condition::Blinded => "Blinded",
            Condition::Charmed => "Charmed",
            Condition::Deafened => "Deafened",
            Condition::Fatigued => "Fatigued",
            Condition::Frightened => "Frightened",
            Condition::Grappled => "Grappled",
            Condition::Incapacitated => "Incapacitated",
            Condition::Invisible => "Invisible",
            Condition::Paralyzed => "Paralyzed",
            Condition::Petrified => "Petrified",
            Condition::Poisoned => "Poisoned",
            Condition::Prone => "Prone",
            Condition::Restrained => "Restrained",
            Condition::Stunned => "Stunned",
            Condition::Unconscious => "Unconscious",
            Condition::Exhaustion => "Exhaustion",
            Condition::Bloodied => "Bloodied",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Condition::Blinded => "Can't see and fails any ability check requiring sight.",
            Condition::Charmed => {
                "Can't attack the charmer or target them with harmful abilities."
            }
            Condition::Deafened => "Can't hear and automatically fails any check requiring hearing.",
            Condition::Fatigued => "Suffers level-based penalties.",
            Condition::Frightened => "Disadvantage on checks and attacks while source is in sight.",
            Condition::Grappled => "Speed becomes 0.",
            Condition::Incapacitated => "Can't take actions or reactions.",
            Condition::Invisible => "Can't be seen without magic or special sense.",
            Condition::Paralyzed => {
                "Incapacitated and fails Strength/Dex saves. Auto crit within 5ft."
            }
            Condition::Petrified => "Transformed into stone; immune to all effects.",
            Condition::Poisoned => "Disadvantage on attack rolls and ability checks.",
            Condition::Prone => {
                "Must crawl; disadvantage on attacks; attackers within 5ft have advantage."
            }
            Condition::Restrained => {
                "Speed = 0; disadvantage on Dex saves; attacks have disadvantage."
            }
            Condition::Stunned => "Incapacitated, can't move, and can barely speak.",
            Condition::Unconscious => "Incapacitated, can't move/speak, unaware of surroundings.",
            Condition::Exhaustion => "Imposes cumulative penalties.",
            Condition::Bloodied => "At or below 50% HP.",
        }
    }

    /// Two-letter tag for compact roster rows.
    pub fn abbreviation(self) -> String {
        self.name()[..2].to_uppercase()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Condition {
    type Err = UnknownCondition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Condition::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCondition(s.to_string()))
    }
}

// ============================================================================
// Condition Set
// ============================================================================

/// Conditions on one combatant.
///
/// Equality is set equality; iteration follows the order conditions were
/// applied in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionSet(IndexSet<Condition>);

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the condition if absent, remove it if present.
    /// Returns whether the condition is present afterwards.
    pub fn toggle(&mut self, condition: Condition) -> bool {
        if self.0.shift_remove(&condition) {
            false
        } else {
            self.0.insert(condition);
            true
        }
    }

    pub fn contains(&self, condition: Condition) -> bool {
        self.0.contains(&condition)
    }

    pub fn iter(&self) -> impl Iterator<Item = Condition> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comma-separated names, or "None".
    pub fn summary(&self) -> String {
        if self.0.is_empty() {
            return "None".to_string();
        }
        self.iter().map(Condition::name).collect::<Vec<_>>().join(", ")
    }
}

impl FromIterator<Condition> for ConditionSet {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// Tests
// ============================================================================
