//! Snapshot codec for persisted encounter state.
//!
//! Each persisted key holds JSON text:
//! - `entries`: `[{id, name, initiative, type, conditions}]`
//! - `savedNames`: `["Aria", ...]`
//! - `turn`: `{round, turnIndex}`
//!
//! Decoding is the validation boundary. Stored data is untrusted, so every
//! record is checked against the combatant invariants before it becomes a
//! [`Combatant`]. Numeric ids written by earlier browser builds are accepted.

use std::collections::HashSet;

use serde::Deserialize;

use super::error::SnapshotError;
use crate::core::session::combat::{Combatant, CombatantId, CombatantType, TurnProgress};
use crate::core::session::conditions::{Condition, ConditionSet};
use crate::core::session::known_names::KnownNames;

pub const ENTRIES_KEY: &str = "entries";
pub const SAVED_NAMES_KEY: &str = "savedNames";
pub const TURN_KEY: &str = "turn";

/// Everything restored at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub combatants: Vec<Combatant>,
    pub known_names: KnownNames,
    pub progress: TurnProgress,
}

// ============================================================================
// Stored records
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredId {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Debug, Deserialize)]
struct StoredCombatant {
    id: StoredId,
    name: String,
    initiative: serde_json::Number,
    #[serde(rename = "type")]
    combatant_type: String,
    #[serde(default)]
    conditions: Vec<String>,
}

impl StoredCombatant {
    fn into_combatant(self) -> Result<Combatant, String> {
        let id = match self.id {
            StoredId::Text(text) if !text.trim().is_empty() => CombatantId::from(text),
            StoredId::Text(_) => return Err("empty id".to_string()),
            StoredId::Number(number) => CombatantId::from(number.to_string()),
        };

        let name = self.name.trim();
        if name.is_empty() {
            return Err(format!("combatant {id} has an empty name"));
        }

        let initiative = self
            .initiative
            .as_i64()
            .and_then(|value| i32::try_from(value).ok())
            .ok_or_else(|| format!("initiative {} is not a 32-bit integer", self.initiative))?;

        let combatant_type: CombatantType =
            self.combatant_type.parse().map_err(|e| format!("{e}"))?;

        let conditions = self
            .conditions
            .iter()
            .map(|tag| tag.parse::<Condition>())
            .collect::<Result<ConditionSet, _>>()
            .map_err(|e| e.to_string())?;

        Ok(Combatant {
            id,
            name: name.to_string(),
            initiative,
            combatant_type,
            conditions,
        })
    }
}

// ============================================================================
// Decoding
// ============================================================================

pub fn decode_combatants(raw: &str) -> Result<Vec<Combatant>, SnapshotError> {
    let stored: Vec<StoredCombatant> = serde_json::from_str(raw)
        .map_err(|e| SnapshotError::corrupt(ENTRIES_KEY, e.to_string()))?;

    let mut seen = HashSet::new();
    let mut combatants = Vec::with_capacity(stored.len());
    for (index, record) in stored.into_iter().enumerate() {
        let combatant = record.into_combatant().map_err(|reason| {
            SnapshotError::corrupt(ENTRIES_KEY, format!("entry {index}: {reason}"))
        })?;
        if !seen.insert(combatant.id.clone()) {
            return Err(SnapshotError::corrupt(
                ENTRIES_KEY,
                format!("duplicate id {}", combatant.id),
            ));
        }
        combatants.push(combatant);
    }
    Ok(combatants)
}

/// Blank names are dropped rather than failing the whole list.
pub fn decode_known_names(raw: &str) -> Result<KnownNames, SnapshotError> {
    let names: Vec<String> = serde_json::from_str(raw)
        .map_err(|e| SnapshotError::corrupt(SAVED_NAMES_KEY, e.to_string()))?;
    Ok(names
        .into_iter()
        .filter(|name| !name.trim().is_empty())
        .collect())
}

pub fn decode_progress(raw: &str) -> Result<TurnProgress, SnapshotError> {
    let progress: TurnProgress = serde_json::from_str(raw)
        .map_err(|e| SnapshotError::corrupt(TURN_KEY, e.to_string()))?;
    if progress.round == 0 {
        return Err(SnapshotError::corrupt(TURN_KEY, "round must be at least 1"));
    }
    Ok(progress)
}

// ============================================================================
// Encoding
// ============================================================================

pub fn encode_combatants(combatants: &[Combatant]) -> serde_json::Result<String> {
    serde_json::to_string(combatants)
}

pub fn encode_known_names(names: &KnownNames) -> serde_json::Result<String> {
    serde_json::to_string(names)
}

pub fn encode_progress(progress: TurnProgress) -> serde_json::Result<String> {
    serde_json::to_string(&progress)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_browser_snapshot() {
        let raw = r#"[
            {"id":1717171717171,"name":"Zeth","initiative":20,"type":"monster","conditions":[]},
            {"id":1717171717100,"name":"Aria","initiative":15,"type":"player","conditions":["Poisoned","Prone"]}
        ]"#;
        let combatants = decode_combatants(raw).unwrap();

        assert_eq!(combatants.len(), 2);
        assert_eq!(combatants[0].id.as_str(), "1717171717171");
        assert_eq!(combatants[1].combatant_type, CombatantType::Player);
        assert!(combatants[1].has_condition(Condition::Prone));
    }

    #[test]
    fn test_encode_then_decode_keeps_records() {
        let mut aria = Combatant::new("Aria", 15, CombatantType::Player);
        aria.toggle_condition(Condition::Charmed);
        let combatants = vec![aria, Combatant::new("Grog", 15, CombatantType::Monster)];

        let raw = encode_combatants(&combatants).unwrap();
        assert_eq!(decode_combatants(&raw).unwrap(), combatants);
    }

    #[test]
    fn test_missing_conditions_default_to_empty() {
        let raw = r#"[{"id":"a","name":"Bryn","initiative":-2,"type":"player"}]"#;
        let combatants = decode_combatants(raw).unwrap();
        assert_eq!(combatants[0].initiative, -2);
        assert!(combatants[0].conditions.is_empty());
    }

    #[test]
    fn test_corrupt_entries_are_rejected() {
        let cases = [
            "not json",
            r#"{"id":"a"}"#,
            r#"[{"id":"a","name":"  ","initiative":3,"type":"player"}]"#,
            r#"[{"id":"a","name":"Bryn","initiative":2.5,"type":"player"}]"#,
            r#"[{"id":"a","name":"Bryn","initiative":99999999999,"type":"player"}]"#,
            r#"[{"id":"a","name":"Bryn","initiative":"12","type":"player"}]"#,
            r#"[{"id":"a","name":"Bryn","initiative":3,"type":"dragon"}]"#,
            r#"[{"id":"a","name":"Bryn","initiative":3,"type":"player","conditions":["Dazed"]}]"#,
            r#"[{"id":"","name":"Bryn","initiative":3,"type":"player"}]"#,
            r#"[{"id":"a","name":"Bryn","initiative":3,"type":"player"},
                {"id":"a","name":"Cato","initiative":4,"type":"monster"}]"#,
        ];
        for raw in cases {
            let err = decode_combatants(raw).unwrap_err();
            assert!(
                matches!(err, SnapshotError::Corrupt { key: ENTRIES_KEY, .. }),
                "expected corrupt entries for {raw}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_decode_known_names_skips_blanks() {
        let names = decode_known_names(r#"["Aria","","  ","Bryn"]"#).unwrap();
        assert_eq!(names.iter().collect::<Vec<_>>(), ["Aria", "Bryn"]);
        assert!(decode_known_names("{}").is_err());
    }

    #[test]
    fn test_progress_codec() {
        let progress = TurnProgress {
            round: 3,
            turn_index: 1,
        };
        let raw = encode_progress(progress).unwrap();
        assert_eq!(raw, r#"{"round":3,"turnIndex":1}"#);
        assert_eq!(decode_progress(&raw).unwrap(), progress);
        assert!(decode_progress(r#"{"round":0,"turnIndex":0}"#).is_err());
        assert!(decode_progress(r#"{"round":-1,"turnIndex":0}"#).is_err());
    }
}
