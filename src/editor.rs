//! One editor instance wrapping one editable surface
//!
//! The instance mediates every document-switch and close operation for its
//! surface: it raises the cancellable `will-*` hooks before touching any
//! state, saves the outgoing document's view state into both the local and
//! the session-global store, restores the incoming document's state
//! (local store first, global as fallback), and keeps the MRU stack of
//! identities it has shown.
//!
//! Switch state machine: Idle -> WillSwitch -> Switching -> Settled. A
//! cancelled WillSwitch leaves the active document, the MRU stack and both
//! view-state stores exactly as they were.

use crate::buffer::BufferStore;
use crate::document::{AccessMode, DocumentId, DocumentRegistry};
use crate::error::EditorError;
use crate::events::{hook, EditorId, EventArgs, SharedEvents};
use crate::protocol::{Marker, Span};
use crate::surface::EditSurface;
use crate::view_state::{SharedViewStates, ViewStateStore};

/// Read-only context a switch operation needs from the controller
pub struct SwitchCtx<'a> {
    pub buffers: &'a BufferStore,
    pub registry: &'a DocumentRegistry,
}

pub struct EditorInstance {
    id: EditorId,
    surface: Box<dyn EditSurface>,
    /// Unique identities, most-recently shown last
    mru: Vec<DocumentId>,
    view_states: ViewStateStore,
    global_view_states: SharedViewStates,
    events: SharedEvents,
}

impl EditorInstance {
    pub fn new(
        id: EditorId,
        surface: Box<dyn EditSurface>,
        global_view_states: SharedViewStates,
        events: SharedEvents,
    ) -> Self {
        Self {
            id,
            surface,
            mru: Vec::new(),
            view_states: ViewStateStore::new(),
            global_view_states,
            events,
        }
    }

    pub fn id(&self) -> EditorId {
        self.id
    }

    pub fn mru(&self) -> &[DocumentId] {
        &self.mru
    }

    /// The identity shown by the surface, or `NoActiveDocument`
    pub fn active_document(&self) -> Result<DocumentId, EditorError> {
        self.surface
            .active_document()
            .ok_or(EditorError::NoActiveDocument)
    }

    /// Switch the surface to `target`.
    ///
    /// A target with no known buffer is a silent no-op; a cancelled
    /// `will-open-document` hook aborts with nothing mutated. Returns
    /// whether the switch happened. Every completed switch moves input
    /// focus to the surface.
    pub fn open_document(&mut self, target: &DocumentId, ctx: &SwitchCtx) -> bool {
        let Some(buffer) = ctx.buffers.get(target) else {
            tracing::debug!("{}: no buffer for '{}', switch skipped", self.id, target);
            return false;
        };

        // WillSwitch: observers may cancel before anything is mutated
        let proceed = self.events.run_hooks(
            hook::WILL_OPEN_DOCUMENT,
            &EventArgs::WillOpenDocument {
                editor: self.id,
                document: Some(target.clone()),
            },
        );
        if !proceed {
            return false;
        }

        // Switching: save the outgoing document's state into both stores
        self.save_view_state();

        let read_only = ctx
            .registry
            .get(target)
            .map(|d| d.access == AccessMode::ReadOnly)
            .unwrap_or(false);
        self.surface.show(target, buffer.text());
        self.surface.set_read_only(read_only);

        // Settled: restore state captured for the target, local store first.
        // The restore happens inside this switch transaction, right after
        // the surface was pointed at the producing document, so a snapshot
        // can never land on a foreign model.
        let restored = self
            .view_states
            .get(target)
            .cloned()
            .or_else(|| self.global_view_states.borrow().get(target).cloned());
        if let Some(state) = restored {
            self.surface.restore_view_state(&state);
        }

        self.mru.retain(|d| d != target);
        self.mru.push(target.clone());

        self.events.run_hooks(
            hook::DID_OPEN_DOCUMENT,
            &EventArgs::DidOpenDocument {
                editor: self.id,
                document: target.clone(),
            },
        );
        self.surface.focus();

        tracing::debug!("{}: switched to '{}'", self.id, target);
        true
    }

    /// Open `target` and reveal a span in it (navigation, e.g. jumping to a
    /// diagnostic or a definition)
    pub fn open_at_span(&mut self, target: &DocumentId, span: &Span, ctx: &SwitchCtx) -> bool {
        if !self.open_document(target, ctx) {
            return false;
        }
        self.surface.reveal_span(span);
        true
    }

    /// Open the document a marker points into and reveal the marker's span
    pub fn open_marker(&mut self, marker: &Marker, ctx: &SwitchCtx) -> bool {
        self.open_at_span(&marker.document, &marker.span, ctx)
    }

    /// Close `target` in this editor.
    ///
    /// A target this editor never showed is a no-op reported as `false`,
    /// without consulting observers. Otherwise cancellable via
    /// `will-close-document`; on non-cancellation the identity leaves the
    /// MRU stack, and if it was the shown document the surface falls back
    /// to the new MRU tail (through the full open path) or clears to an
    /// empty state. Returns whether the close happened.
    pub fn close_document(&mut self, target: &DocumentId, ctx: &SwitchCtx) -> bool {
        let Some(position) = self.mru.iter().position(|d| d == target) else {
            return false;
        };

        let proceed = self.events.run_hooks(
            hook::WILL_CLOSE_DOCUMENT,
            &EventArgs::WillCloseDocument {
                editor: self.id,
                document: target.clone(),
            },
        );
        if !proceed {
            return false;
        }
        self.mru.remove(position);

        self.events.run_hooks(
            hook::DID_CLOSE_DOCUMENT,
            &EventArgs::DidCloseDocument {
                editor: self.id,
                document: target.clone(),
            },
        );

        if self.surface.active_document().as_ref() == Some(target) {
            self.fall_back(ctx);
        }

        tracing::debug!("{}: closed '{}'", self.id, target);
        true
    }

    /// Capture the shown document's view state into the local and global
    /// stores. Returns whether a snapshot was saved.
    pub fn save_view_state(&mut self) -> bool {
        let Some(current) = self.surface.active_document() else {
            return false;
        };
        let Some(state) = self.surface.capture_view_state() else {
            return false;
        };
        self.view_states.set(current.clone(), state.clone());
        self.global_view_states.borrow_mut().set(current, state);
        true
    }

    /// The buffer backing this document is being permanently disposed:
    /// drop the local snapshot and the MRU entry, and vacate the surface if
    /// it is showing the document. Not cancellable; disposal is owned by
    /// the controller, so a vetoed fallback open degrades to a clear rather
    /// than keeping the destroyed buffer on the surface.
    pub fn on_document_disposed(&mut self, id: &DocumentId, ctx: &SwitchCtx) {
        self.view_states.remove(id);
        self.mru.retain(|d| d != id);

        if self.surface.active_document().as_ref() == Some(id) {
            self.fall_back(ctx);
        }
    }

    /// Show the MRU tail, or vacate the surface when no fallback open
    /// completes. The document that was shown is already gone from the MRU
    /// stack (closed or disposed), so the surface must never keep naming
    /// it: a vetoed or impossible fallback clears instead.
    fn fall_back(&mut self, ctx: &SwitchCtx) {
        if let Some(previous) = self.mru.last().cloned() {
            if self.open_document(&previous, ctx) {
                return;
            }
        }
        self.vacate();
    }

    /// Clear the surface to its empty, document-less state. Observers hear
    /// a `will-open-document` with no target; the clear itself cannot be
    /// vetoed.
    fn vacate(&mut self) {
        self.events.run_hooks(
            hook::WILL_OPEN_DOCUMENT,
            &EventArgs::WillOpenDocument {
                editor: self.id,
                document: None,
            },
        );
        self.surface.clear();
    }

    /// Move input focus to the surface
    pub fn focus_surface(&mut self) {
        self.surface.focus();
    }

    #[cfg(test)]
    pub(crate) fn local_view_states(&self) -> &ViewStateStore {
        &self.view_states
    }
}
