//! Scenario document types
//!
//! These mirror the external JSON scenario format and are consumed as-is;
//! the engine never mutates or regenerates them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// State key every scenario starts from.
pub const START_STATE_KEY: &str = "start";

/// A selectable option presented to the user at a state.
///
/// `value` is the discrete input token that labels an outgoing edge;
/// `label` is what the UI displays for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDef {
    pub label: String,
    pub value: String,
}

/// One node in the scenario's state graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDef {
    /// Message shown to the user when this state is current.
    pub message: String,

    /// Options offered at this state. Terminal states typically have none.
    #[serde(default)]
    pub options: Vec<OptionDef>,

    /// Input token -> target state key. Absent for terminal states; a
    /// non-terminal state without it is a dead end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_state: Option<HashMap<String, String>>,

    /// Whether reaching this state concludes the conversation.
    #[serde(default)]
    pub terminal: bool,
}

/// A recommended response action, surfaced once a terminal state is reached.
///
/// Actions are scenario-scoped: every terminal state of a scenario surfaces
/// the same list, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDef {
    pub priority: i64,
    pub category: String,
    pub title: String,
    pub steps: Vec<String>,
    pub why: String,
}

/// A complete triage scenario: a state graph plus its terminal actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioDocument {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub states: HashMap<String, StateDef>,
    #[serde(default)]
    pub actions: Vec<ActionDef>,
}

/// The full set of loaded scenarios, keyed by scenario ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioSet {
    scenarios: HashMap<String, ScenarioDocument>,
}

impl ScenarioSet {
    /// Look up a scenario by ID.
    pub fn get(&self, scenario_id: &str) -> Option<&ScenarioDocument> {
        self.scenarios.get(scenario_id)
    }

    #[allow(dead_code)] // Store query utility
    pub fn contains(&self, scenario_id: &str) -> bool {
        self.scenarios.contains_key(scenario_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    #[allow(dead_code)] // API completeness alongside len()
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Iterate over `(scenario_id, document)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ScenarioDocument)> {
        self.scenarios.iter()
    }

    #[cfg(test)]
    pub fn from_documents(docs: impl IntoIterator<Item = (String, ScenarioDocument)>) -> Self {
        Self {
            scenarios: docs.into_iter().collect(),
        }
    }
}
