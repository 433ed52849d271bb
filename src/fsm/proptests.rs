//! Property-based tests for the chatbot FSM
//!
//! These verify the engine's contract across generated scenario documents,
//! including documents with dangling `next_state` targets.

use super::engine::ChatbotFsm;
use super::scenario::{ActionDef, OptionDef, ScenarioDocument, StateDef};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_option() -> impl Strategy<Value = OptionDef> {
    ("[A-Za-z ]{1,12}", "[a-z]{1,6}").prop_map(|(label, value)| OptionDef { label, value })
}

fn arb_action() -> impl Strategy<Value = ActionDef> {
    (
        0i64..10,
        "[a-z]{3,10}",
        "[A-Za-z ]{3,20}",
        proptest::collection::vec("[A-Za-z ]{3,30}".prop_map(String::from), 1..4),
        "[A-Za-z ]{3,40}",
    )
        .prop_map(|(priority, category, title, steps, why)| ActionDef {
            priority,
            category,
            title,
            steps,
            why,
        })
}

/// Scenario documents with a guaranteed `"start"` state. Transition targets
/// are drawn from the real key set plus a `"ghost"` key that never exists,
/// so generated documents exercise the dangling-target guard.
fn arb_scenario() -> impl Strategy<Value = ScenarioDocument> {
    (0usize..4).prop_flat_map(|extra_states| {
        let keys: Vec<String> = std::iter::once("start".to_string())
            .chain((0..extra_states).map(|i| format!("s{i}")))
            .collect();
        let mut target_pool = keys.clone();
        target_pool.push("ghost".to_string());

        let arb_state = (
            "[A-Za-z ?.]{1,30}",
            proptest::collection::vec(arb_option(), 0..3),
            proptest::option::of(proptest::collection::hash_map(
                "[a-z]{1,4}",
                proptest::sample::select(target_pool),
                0..3,
            )),
            any::<bool>(),
        )
            .prop_map(|(message, options, next_state, terminal)| StateDef {
                message,
                options,
                next_state,
                terminal,
            });

        (
            proptest::collection::vec(arb_state, keys.len()),
            proptest::collection::vec(arb_action(), 0..3),
        )
            .prop_map(move |(states, actions)| ScenarioDocument {
                id: "generated".to_string(),
                name: "Generated scenario".to_string(),
                description: String::new(),
                states: keys.iter().cloned().zip(states).collect(),
                actions,
            })
    })
}

/// A scenario plus a valid state key to stand at and a token to feed in.
fn arb_scenario_key_token() -> impl Strategy<Value = (ScenarioDocument, String, String)> {
    (arb_scenario(), any::<prop::sample::Index>(), "[a-z]{1,4}").prop_map(
        |(scenario, index, token)| {
            let mut keys: Vec<&String> = scenario.states.keys().collect();
            keys.sort();
            let key = keys[index.index(keys.len())].clone();
            (scenario, key, token)
        },
    )
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    // Replaying the same (state, token) pair from the same starting state
    // always lands in the same place. The engine has no hidden inputs.
    #[test]
    fn transition_is_deterministic((scenario, key, token) in arb_scenario_key_token()) {
        let mut first = ChatbotFsm::resume(&scenario, &key).expect("key drawn from states");
        let mut second = ChatbotFsm::resume(&scenario, &key).expect("key drawn from states");

        let first_ok = first.transition(&token);
        let second_ok = second.transition(&token);

        prop_assert_eq!(first_ok, second_ok);
        prop_assert_eq!(first.state_key(), second.state_key());
    }

    // A failed transition leaves the engine exactly where it was.
    #[test]
    fn failed_transition_does_not_mutate((scenario, key, token) in arb_scenario_key_token()) {
        let mut fsm = ChatbotFsm::resume(&scenario, &key).expect("key drawn from states");
        let before_message = fsm.current_message().to_string();

        if !fsm.transition(&token) {
            prop_assert_eq!(fsm.state_key(), key.as_str());
            prop_assert_eq!(fsm.current_message(), before_message);
        }
    }

    // Actions surface exactly at terminal states, in document order.
    #[test]
    fn actions_surface_only_at_terminal((scenario, key, _token) in arb_scenario_key_token()) {
        let fsm = ChatbotFsm::resume(&scenario, &key).expect("key drawn from states");

        if fsm.is_terminal() {
            prop_assert_eq!(fsm.available_actions(), scenario.actions.as_slice());
        } else {
            prop_assert!(fsm.available_actions().is_empty());
        }
    }

    // Reconstructing from a persisted key observes the same conversation as
    // the instance that produced the key.
    #[test]
    fn reconstruction_is_equivalent_to_continuation((scenario, key, token) in arb_scenario_key_token()) {
        let mut walked = ChatbotFsm::resume(&scenario, &key).expect("key drawn from states");
        walked.transition(&token);

        let resumed = ChatbotFsm::resume(&scenario, walked.state_key())
            .expect("persisted key originated from a valid lookup");

        prop_assert_eq!(resumed.current_message(), walked.current_message());
        prop_assert_eq!(resumed.current_options(), walked.current_options());
        prop_assert_eq!(resumed.is_terminal(), walked.is_terminal());
        prop_assert_eq!(resumed.available_actions(), walked.available_actions());
    }

    // A successful transition always lands on a key present in the document.
    #[test]
    fn successful_transition_lands_on_known_state((scenario, key, token) in arb_scenario_key_token()) {
        let mut fsm = ChatbotFsm::resume(&scenario, &key).expect("key drawn from states");

        if fsm.transition(&token) {
            prop_assert!(scenario.states.contains_key(fsm.state_key()));
        }
    }
}
