//! Property-based tests for entry validation and snapshot decoding

use proptest::prelude::*;

use crate::core::session::{parse_entry, Combatant, CombatantType, Condition, EntryError};
use crate::core::storage::snapshot::{
    decode_combatants, decode_known_names, decode_progress, encode_combatants,
};

fn arb_combatant() -> impl Strategy<Value = Combatant> {
    (
        "[A-Za-z][A-Za-z ]{0,12}[a-z]",
        any::<i32>(),
        prop_oneof![Just(CombatantType::Player), Just(CombatantType::Monster)],
        prop::collection::vec(0..Condition::ALL.len(), 0..4),
    )
        .prop_map(|(name, initiative, combatant_type, conditions)| {
            let mut combatant = Combatant::new(name, initiative, combatant_type);
            for i in conditions {
                combatant.toggle_condition(Condition::ALL[i]);
            }
            combatant
        })
}

proptest! {
    /// Property: any i32 parses, whatever whitespace surrounds it
    #[test]
    fn prop_integer_initiative_parses(
        value in any::<i32>(),
        pad_left in "[ \t]{0,3}",
        pad_right in "[ \t]{0,3}",
    ) {
        let raw = format!("{pad_left}{value}{pad_right}");
        let (name, initiative) = parse_entry(" Aria ", &raw).unwrap();
        prop_assert_eq!(name, "Aria");
        prop_assert_eq!(initiative, value);
    }

    /// Property: blank names are rejected before the initiative is looked at
    #[test]
    fn prop_blank_name_rejected(name in "[ \t]{0,5}", initiative in ".*") {
        prop_assert_eq!(parse_entry(&name, &initiative), Err(EntryError::EmptyName));
    }

    /// Property: non-numeric initiative is rejected
    #[test]
    fn prop_non_numeric_initiative_rejected(initiative in "[a-zA-Z.]{1,6}") {
        let is_invalid = matches!(
            parse_entry("Bob", &initiative),
            Err(EntryError::InvalidInitiative(_))
        );
        prop_assert!(is_invalid);
    }

    /// Property: decoders never panic on arbitrary text
    #[test]
    fn prop_decoders_never_panic(raw in ".{0,64}") {
        let _ = decode_combatants(&raw);
        let _ = decode_known_names(&raw);
        let _ = decode_progress(&raw);
    }

    /// Property: encoded combatants decode to the same records
    #[test]
    fn prop_encoded_combatants_decode(
        combatants in prop::collection::vec(arb_combatant(), 0..8),
    ) {
        let raw = encode_combatants(&combatants).unwrap();
        prop_assert_eq!(decode_combatants(&raw).unwrap(), combatants);
    }
}
