//! Per-document view-state snapshots
//!
//! A view state is an opaque snapshot of a surface's interaction state
//! (cursor, scroll, selection, folds). This layer never interprets it: it is
//! captured on every switch-away and handed back verbatim on switch-into.
//!
//! Two stores coexist: one local to each editor instance and one global to
//! the session, so reattaching a document to a *different* editor still
//! recovers its state. The global store is an explicit constructor-injected
//! `Rc<RefCell<..>>` shared handle; under the single-threaded cooperative
//! model all access is serialized at switch/close boundaries. A
//! multi-threaded port must put a mutex around it.

use crate::document::DocumentId;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Opaque interaction-state snapshot. Stored and restored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState(serde_json::Value);

impl ViewState {
    pub fn new(value: serde_json::Value) -> Self {
        ViewState(value)
    }

    pub fn value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Keyed cache of view states by document identity
#[derive(Debug, Default)]
pub struct ViewStateStore {
    states: HashMap<DocumentId, ViewState>,
}

impl ViewStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &DocumentId) -> Option<&ViewState> {
        self.states.get(id)
    }

    pub fn set(&mut self, id: DocumentId, state: ViewState) {
        self.states.insert(id, state);
    }

    pub fn remove(&mut self, id: &DocumentId) -> Option<ViewState> {
        self.states.remove(id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// The session-global store shared by every editor instance
pub type SharedViewStates = Rc<RefCell<ViewStateStore>>;

/// Create the session-global store. Created once per session, torn down
/// when the last editor handle drops.
pub fn shared_view_states() -> SharedViewStates {
    Rc::new(RefCell::new(ViewStateStore::new()))
}
