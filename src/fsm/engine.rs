//! Chatbot finite-state machine
//!
//! The engine is a thin wrapper over a pure lookup: it holds a reference to
//! an immutable [`ScenarioDocument`] plus the current state key, and derives
//! the current state by lookup on every read. Nothing else is cached, so an
//! engine reconstructed from a persisted key behaves identically to one that
//! walked there transition by transition.

use super::scenario::{ActionDef, OptionDef, ScenarioDocument, StateDef, START_STATE_KEY};

/// Pure transition lookup: resolve `input` against `state`'s outgoing edges.
///
/// Returns the canonical `(key, state)` entry from `scenario.states`, or
/// `None` when the state has no `next_state` mapping, the token is unmapped,
/// or the mapped target does not exist in the document. The last case guards
/// against malformed scenario data referencing a nonexistent state.
fn resolve<'a>(
    scenario: &'a ScenarioDocument,
    state: &StateDef,
    input: &str,
) -> Option<(&'a String, &'a StateDef)> {
    let target_key = state.next_state.as_ref()?.get(input)?;
    scenario.states.get_key_value(target_key)
}

/// A session's position within one scenario.
///
/// Stateless across requests: the HTTP layer persists only
/// `(scenario_id, state_key)` and rebuilds the engine per request via
/// [`ChatbotFsm::resume`].
#[derive(Debug, Clone)]
pub struct ChatbotFsm<'a> {
    scenario: &'a ScenarioDocument,
    state_key: &'a str,
    state: &'a StateDef,
}

impl<'a> ChatbotFsm<'a> {
    /// Start a fresh conversation at the `"start"` state.
    ///
    /// Returns `None` if the document has no `"start"` state, which violates
    /// the scenario invariant; callers treat that as unusable data rather
    /// than a hard failure.
    pub fn new(scenario: &'a ScenarioDocument) -> Option<Self> {
        Self::resume(scenario, START_STATE_KEY)
    }

    /// Rebuild an engine at a previously persisted state key.
    ///
    /// A persisted key must have originated from a prior valid lookup against
    /// the same document; `None` here means the caller's session no longer
    /// matches the loaded scenario and should be discarded.
    pub fn resume(scenario: &'a ScenarioDocument, state_key: &str) -> Option<Self> {
        let (state_key, state) = scenario.states.get_key_value(state_key)?;
        Some(Self {
            scenario,
            state_key,
            state,
        })
    }

    /// The key identifying the current state, suitable for persisting.
    #[must_use]
    pub fn state_key(&self) -> &'a str {
        self.state_key
    }

    /// Message of the current state.
    #[must_use]
    pub fn current_message(&self) -> &'a str {
        &self.state.message
    }

    /// Options offered at the current state (empty for most terminal states).
    #[must_use]
    pub fn current_options(&self) -> &'a [OptionDef] {
        &self.state.options
    }

    /// Whether the current state concludes the conversation.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.state.terminal
    }

    /// The scenario's recommended actions, surfaced only at a terminal state.
    #[must_use]
    pub fn available_actions(&self) -> &'a [ActionDef] {
        if self.is_terminal() {
            &self.scenario.actions
        } else {
            &[]
        }
    }

    /// Advance along the edge labeled by `input`.
    ///
    /// Returns `true` and moves to the target state if the current state maps
    /// `input` to a state that exists in the document. Otherwise returns
    /// `false` and the current state is left unchanged.
    pub fn transition(&mut self, input: &str) -> bool {
        match resolve(self.scenario, self.state, input) {
            Some((key, state)) => {
                self.state_key = key;
                self.state = state;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn two_step_scenario() -> ScenarioDocument {
        serde_json::from_value(json!({
            "id": "demo",
            "name": "Demo",
            "description": "",
            "states": {
                "start": {
                    "message": "Hi",
                    "options": [{"label": "Yes", "value": "y"}],
                    "next_state": {"y": "done"}
                },
                "done": {"message": "Bye", "terminal": true}
            },
            "actions": [{
                "priority": 1,
                "category": "safety",
                "title": "Act",
                "steps": ["step"],
                "why": "because"
            }]
        }))
        .expect("scenario fixture")
    }

    #[test]
    fn walks_to_terminal_and_surfaces_actions() {
        let doc = two_step_scenario();
        let mut fsm = ChatbotFsm::new(&doc).expect("start exists");

        assert_eq!(fsm.current_message(), "Hi");
        assert_eq!(fsm.current_options().len(), 1);
        assert!(!fsm.is_terminal());
        assert!(fsm.available_actions().is_empty());

        assert!(fsm.transition("y"));
        assert_eq!(fsm.state_key(), "done");
        assert_eq!(fsm.current_message(), "Bye");
        assert!(fsm.is_terminal());
        assert_eq!(fsm.available_actions(), doc.actions.as_slice());
    }

    #[test]
    fn unmapped_token_fails_without_moving() {
        let doc = two_step_scenario();
        let mut fsm = ChatbotFsm::new(&doc).expect("start exists");

        assert!(!fsm.transition("n"));
        assert_eq!(fsm.state_key(), "start");
        assert_eq!(fsm.current_message(), "Hi");
    }

    #[test]
    fn missing_target_state_fails_without_moving() {
        let doc: ScenarioDocument = serde_json::from_value(json!({
            "name": "Broken",
            "states": {
                "start": {
                    "message": "Hi",
                    "next_state": {"y": "missing"}
                }
            }
        }))
        .expect("scenario fixture");

        let mut fsm = ChatbotFsm::new(&doc).expect("start exists");
        assert!(!fsm.transition("y"));
        assert_eq!(fsm.state_key(), "start");
    }

    #[test]
    fn dead_end_state_rejects_all_input() {
        let doc: ScenarioDocument = serde_json::from_value(json!({
            "name": "Dead end",
            "states": {
                "start": {"message": "Stuck"}
            }
        }))
        .expect("scenario fixture");

        let mut fsm = ChatbotFsm::new(&doc).expect("start exists");
        assert!(!fsm.transition("anything"));
        assert!(!fsm.is_terminal());
        assert!(fsm.available_actions().is_empty());
    }

    #[test]
    fn resume_rejects_unknown_key() {
        let doc = two_step_scenario();
        assert!(ChatbotFsm::resume(&doc, "elsewhere").is_none());
    }

    #[test]
    fn resume_is_equivalent_to_continuation() {
        let doc = two_step_scenario();
        let mut walked = ChatbotFsm::new(&doc).expect("start exists");
        assert!(walked.transition("y"));

        let resumed = ChatbotFsm::resume(&doc, walked.state_key()).expect("key is valid");
        assert_eq!(resumed.current_message(), walked.current_message());
        assert_eq!(resumed.current_options(), walked.current_options());
        assert_eq!(resumed.is_terminal(), walked.is_terminal());
        assert_eq!(resumed.available_actions(), walked.available_actions());
    }

    #[test]
    fn missing_start_state_is_unusable() {
        let doc: ScenarioDocument = serde_json::from_value(json!({
            "name": "No entry",
            "states": {"middle": {"message": "?"}}
        }))
        .expect("scenario fixture");

        assert!(ChatbotFsm::new(&doc).is_none());
    }

    // The engine does not forbid outgoing edges on a terminal state; normal
    // flow just never consults them because callers stop at terminal.
    #[test]
    fn terminal_state_edges_still_resolve_if_asked() {
        let doc: ScenarioDocument = serde_json::from_value(json!({
            "name": "Loop",
            "states": {
                "start": {"message": "End", "terminal": true, "next_state": {"again": "start"}}
            }
        }))
        .expect("scenario fixture");

        let mut fsm = ChatbotFsm::new(&doc).expect("start exists");
        assert!(fsm.is_terminal());
        assert!(fsm.transition("again"));
        assert_eq!(fsm.state_key(), "start");
    }
}
