//! Lifecycle event hub
//!
//! Observers subscribe to string-named hooks and are invoked synchronously,
//! in registration order, on the one logical thread. A callback returning
//! `false` from a `will-*` hook cancels the operation before any state is
//! mutated; the return value of `did-*` hooks is ignored.
//!
//! Dispatch is not re-entrant-safe: registering or removing hooks from
//! inside a callback, or calling back into the firing component, is
//! undefined behavior at the design level and panics here (the hook map is
//! borrowed for the duration of the dispatch).

use crate::document::DocumentId;
use crate::protocol::Marker;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Identity of a live editor instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EditorId(pub u64);

impl fmt::Display for EditorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "editor#{}", self.0)
    }
}

/// Hook names fired by the controller, editor instances and coordinator
pub mod hook {
    pub const DOCUMENT_ADDED: &str = "document-added";
    pub const DOCUMENT_REMOVED: &str = "document-removed";
    pub const EDITOR_ADDED: &str = "editor-added";
    pub const EDITOR_REMOVED: &str = "editor-removed";
    pub const FOCUSED_EDITOR_CHANGED: &str = "focused-editor-changed";
    pub const WILL_OPEN_DOCUMENT: &str = "will-open-document";
    pub const DID_OPEN_DOCUMENT: &str = "did-open-document";
    pub const WILL_CLOSE_DOCUMENT: &str = "will-close-document";
    pub const DID_CLOSE_DOCUMENT: &str = "did-close-document";
    pub const DIAGNOSTICS_CHANGED: &str = "diagnostics-changed";
}

/// Arguments passed to hook callbacks
#[derive(Debug, Clone)]
pub enum EventArgs {
    DocumentAdded {
        document: DocumentId,
    },
    DocumentRemoved {
        document: DocumentId,
    },
    EditorAdded {
        editor: EditorId,
    },
    EditorRemoved {
        editor: EditorId,
    },
    /// `None` when the last editor was removed
    FocusedEditorChanged {
        editor: Option<EditorId>,
    },
    /// Cancellable when `document` is set. `None` means the surface is
    /// being cleared to its empty state; a clear is announced but cannot
    /// be vetoed.
    WillOpenDocument {
        editor: EditorId,
        document: Option<DocumentId>,
    },
    DidOpenDocument {
        editor: EditorId,
        document: DocumentId,
    },
    /// Cancellable
    WillCloseDocument {
        editor: EditorId,
        document: DocumentId,
    },
    DidCloseDocument {
        editor: EditorId,
        document: DocumentId,
    },
    /// `document` is `None` for a whole-workspace diagnostics pass
    DiagnosticsChanged {
        document: Option<DocumentId>,
        markers: Vec<Marker>,
    },
}

/// Hook callback. Returns `true` to proceed, `false` to cancel (only
/// meaningful on `will-*` hooks).
pub type EventCallback = Box<dyn Fn(&EventArgs) -> bool>;

/// Registry of hook callbacks by name
#[derive(Default)]
pub struct EventRegistry {
    hooks: RefCell<HashMap<String, Vec<EventCallback>>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for a hook name. Fired in registration order.
    pub fn add_hook(&self, name: &str, callback: EventCallback) {
        self.hooks
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .push(callback);
    }

    /// Remove all callbacks for a hook name
    pub fn remove_hooks(&self, name: &str) {
        self.hooks.borrow_mut().remove(name);
    }

    /// Run all callbacks for a hook name. Returns `false` as soon as one
    /// callback cancels; remaining callbacks are not invoked.
    pub fn run_hooks(&self, name: &str, args: &EventArgs) -> bool {
        let hooks = self.hooks.borrow();
        if let Some(callbacks) = hooks.get(name) {
            for callback in callbacks {
                if !callback(args) {
                    tracing::debug!("hook '{}' cancelled operation", name);
                    return false;
                }
            }
        }
        true
    }

    pub fn hook_count(&self, name: &str) -> usize {
        self.hooks.borrow().get(name).map(|v| v.len()).unwrap_or(0)
    }
}

/// Shared handle to the session's event hub
pub type SharedEvents = Rc<EventRegistry>;

pub fn shared_events() -> SharedEvents {
    Rc::new(EventRegistry::new())
}
