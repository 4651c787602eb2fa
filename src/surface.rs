//! The editable-surface strategy trait
//!
//! The host widget delegates document-switch and close operations into this
//! trait instead of the bridge patching the host's own methods. One surface
//! shows at most one document at a time; [`crate::editor::EditorInstance`]
//! owns the surface and drives it exclusively through these calls, so the
//! surface never needs to know about MRU stacks, view-state stores or
//! events.

use crate::document::DocumentId;
use crate::protocol::Span;
use crate::view_state::ViewState;

pub trait EditSurface {
    /// Point the surface at a document's buffer content
    fn show(&mut self, document: &DocumentId, text: &str);

    /// Clear the surface to an empty, document-less state
    fn clear(&mut self);

    /// Transfer input focus to the surface
    fn focus(&mut self);

    /// Toggle the read-only attribute of the surface
    fn set_read_only(&mut self, read_only: bool);

    /// The document currently shown, if any
    fn active_document(&self) -> Option<DocumentId>;

    /// Snapshot the surface's interaction state for the active document.
    /// `None` when there is nothing meaningful to capture.
    fn capture_view_state(&self) -> Option<ViewState>;

    /// Hand a previously captured snapshot back verbatim. Only ever called
    /// immediately after `show` pointed the surface at the document that
    /// produced the snapshot.
    fn restore_view_state(&mut self, state: &ViewState);

    /// Scroll the span into view and place the cursor at its start
    fn reveal_span(&mut self, span: &Span);
}
