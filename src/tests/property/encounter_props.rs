//! Property-based tests for the Encounter turn engine

use proptest::prelude::*;

use crate::core::session::{Combatant, CombatantType, Condition, Encounter, TurnAnchor};

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

fn arb_type() -> impl Strategy<Value = CombatantType> {
    prop_oneof![Just(CombatantType::Player), Just(CombatantType::Monster)]
}

fn arb_anchor() -> impl Strategy<Value = TurnAnchor> {
    prop_oneof![Just(TurnAnchor::Combatant), Just(TurnAnchor::Position)]
}

/// Small initiative range so ties are common.
fn arb_combatant() -> impl Strategy<Value = Combatant> {
    ("[A-Z][a-z]{0,8}", -3i32..12, arb_type())
        .prop_map(|(name, initiative, combatant_type)| {
            Combatant::new(name, initiative, combatant_type)
        })
}

/// An encounter of at least `min` combatants, advanced a few turns.
fn arb_encounter(min: usize) -> impl Strategy<Value = Encounter> {
    (
        prop::collection::vec(arb_combatant(), min..10),
        arb_anchor(),
        0usize..20,
    )
        .prop_map(|(combatants, anchor, steps)| {
            let mut encounter = Encounter::new(anchor);
            for combatant in combatants {
                encounter.add_combatant(combatant);
            }
            for _ in 0..steps {
                encounter.next_turn();
            }
            encounter
        })
}

fn arb_condition() -> impl Strategy<Value = Condition> {
    (0..Condition::ALL.len()).prop_map(|i| Condition::ALL[i])
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: order is descending by initiative, ties keep insertion order
    #[test]
    fn prop_order_is_sorted_and_stable(
        combatants in prop::collection::vec(arb_combatant(), 0..15),
        anchor in arb_anchor(),
    ) {
        let mut encounter = Encounter::new(anchor);
        let inserted: Vec<_> = combatants.iter().map(|c| c.id.clone()).collect();
        for combatant in combatants {
            encounter.add_combatant(combatant);
        }

        let order = encounter.combatants();
        prop_assert_eq!(order.len(), inserted.len());
        for pair in order.windows(2) {
            prop_assert!(pair[0].initiative >= pair[1].initiative);
            if pair[0].initiative == pair[1].initiative {
                let first = inserted.iter().position(|id| *id == pair[0].id);
                let second = inserted.iter().position(|id| *id == pair[1].id);
                prop_assert!(first < second, "tie broke insertion order");
            }
        }
    }

    /// Property: advancing len times comes back one round later
    #[test]
    fn prop_full_cycle_adds_one_round(mut encounter in arb_encounter(1)) {
        let start = encounter.progress();
        for _ in 0..encounter.len() {
            encounter.next_turn();
        }
        prop_assert_eq!(encounter.turn_index(), start.turn_index);
        prop_assert_eq!(encounter.round(), start.round + 1);
    }

    /// Property: retreat undoes advance
    #[test]
    fn prop_retreat_undoes_advance(mut encounter in arb_encounter(1)) {
        let start = encounter.progress();
        encounter.next_turn();
        encounter.previous_turn();
        prop_assert_eq!(encounter.progress(), start);
    }

    /// Property: advance undoes retreat (the round floor may swallow a step)
    #[test]
    fn prop_advance_undoes_retreat(mut encounter in arb_encounter(1)) {
        let start = encounter.progress();
        encounter.previous_turn();
        encounter.next_turn();
        prop_assert_eq!(encounter.turn_index(), start.turn_index);
        prop_assert!(encounter.round() >= start.round);
    }

    /// Property: round never drops below 1
    #[test]
    fn prop_round_floor(
        mut encounter in arb_encounter(0),
        retreats in 0usize..40,
    ) {
        for _ in 0..retreats {
            encounter.previous_turn();
            prop_assert!(encounter.round() >= 1);
        }
    }

    /// Property: toggling a condition twice is a no-op
    #[test]
    fn prop_toggle_twice_is_identity(
        mut encounter in arb_encounter(1),
        pick in any::<prop::sample::Index>(),
        condition in arb_condition(),
    ) {
        let before = encounter.combatants().to_vec();
        let id = pick.get(&before).id.clone();

        let first = encounter.toggle_condition(&id, condition);
        let second = encounter.toggle_condition(&id, condition);

        prop_assert_eq!(first.map(|present| !present), second);
        prop_assert_eq!(encounter.combatants(), before.as_slice());
    }

    /// Property: ending always resets
    #[test]
    fn prop_end_resets(mut encounter in arb_encounter(0)) {
        encounter.end();
        prop_assert!(encounter.is_empty());
        prop_assert_eq!(encounter.turn_index(), 0);
        prop_assert_eq!(encounter.round(), 1);
    }

    /// Property: removal keeps the pointer in bounds
    #[test]
    fn prop_removal_keeps_pointer_in_bounds(
        mut encounter in arb_encounter(1),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 1..10),
    ) {
        for pick in picks {
            if encounter.is_empty() {
                break;
            }
            let id = pick.get(encounter.combatants()).id.clone();
            prop_assert!(encounter.remove_combatant(&id).is_some());

            if encounter.is_empty() {
                prop_assert_eq!(encounter.turn_index(), 0);
                prop_assert_eq!(encounter.round(), 1);
            } else {
                prop_assert!(encounter.turn_index() < encounter.len());
            }
        }
    }

    /// Property: under the combatant anchor an add never changes whose turn it is
    #[test]
    fn prop_combatant_anchor_survives_adds(
        combatants in prop::collection::vec(arb_combatant(), 1..8),
        steps in 0usize..10,
        late in prop::collection::vec(arb_combatant(), 1..5),
    ) {
        let mut encounter = Encounter::new(TurnAnchor::Combatant);
        for combatant in combatants {
            encounter.add_combatant(combatant);
        }
        for _ in 0..steps {
            encounter.next_turn();
        }

        let current = encounter.current_combatant().map(|c| c.id.clone());
        let round = encounter.round();
        for combatant in late {
            encounter.add_combatant(combatant);
        }

        prop_assert_eq!(encounter.current_combatant().map(|c| c.id.clone()), current);
        prop_assert_eq!(encounter.round(), round);
    }
}
