//! Triage chatbot core: scenario data model, store, and FSM engine.
//!
//! Everything here is synchronous and side-effect free apart from the store's
//! file read; the HTTP layer owns sessions, timeouts, and persistence.

pub mod engine;
pub mod scenario;
pub mod store;

#[cfg(test)]
mod proptests;

pub use engine::ChatbotFsm;
#[allow(unused_imports)] // Public API re-exports
pub use scenario::{ActionDef, OptionDef, ScenarioDocument, ScenarioSet, StateDef, START_STATE_KEY};
#[allow(unused_imports)] // Public API re-exports
pub use store::StoreError;
