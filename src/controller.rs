//! Session controller: documents, buffers and the live editors
//!
//! The controller is the single owner of the document registry, the buffer
//! store and every [`EditorInstance`]. Hosts create documents and editors
//! here and route user actions through it; the controller keeps the focused
//! editor, wires disposal notifications into every instance, and fires the
//! session-level hooks.
//!
//! The buffer store and the event hub are handed out as shared handles
//! (`buffers()`, `events()`) so the change coordinator can observe versions
//! and fire hooks without going back through the controller.

use crate::buffer::{shared_buffers, BufferVersion, SharedBuffers};
use crate::document::{Document, DocumentId, DocumentRegistry};
use crate::editor::{EditorInstance, SwitchCtx};
use crate::error::EditorError;
use crate::events::{hook, shared_events, EditorId, EventArgs, SharedEvents};
use crate::protocol::{Marker, Span, TextChange};
use crate::surface::EditSurface;
use crate::view_state::{shared_view_states, SharedViewStates};

pub struct EditorController {
    registry: DocumentRegistry,
    buffers: SharedBuffers,
    editors: Vec<EditorInstance>,
    focused: Option<EditorId>,
    next_editor_id: u64,
    events: SharedEvents,
    global_view_states: SharedViewStates,
}

impl Default for EditorController {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorController {
    pub fn new() -> Self {
        Self {
            registry: DocumentRegistry::new(),
            buffers: shared_buffers(),
            editors: Vec::new(),
            focused: None,
            next_editor_id: 0,
            events: shared_events(),
            global_view_states: shared_view_states(),
        }
    }

    /// Shared handle to the buffer store, for the change coordinator
    pub fn buffers(&self) -> SharedBuffers {
        self.buffers.clone()
    }

    /// Shared handle to the session's event hub
    pub fn events(&self) -> SharedEvents {
        self.events.clone()
    }

    pub fn registry(&self) -> &DocumentRegistry {
        &self.registry
    }

    pub fn focused_editor(&self) -> Option<EditorId> {
        self.focused
    }

    pub fn editor(&self, id: EditorId) -> Option<&EditorInstance> {
        self.editors.iter().find(|e| e.id() == id)
    }

    pub fn editor_count(&self) -> usize {
        self.editors.len()
    }

    /// Track a new document: create its buffer and baseline, register the
    /// metadata and fire `document-added`. Re-adding a known identity is a
    /// no-op; returns whether the document was actually added.
    pub fn add_document(&mut self, document: Document, content: &str) -> bool {
        let id = document.id.clone();
        if !self.buffers.borrow_mut().insert(id.clone(), content) {
            tracing::debug!("document '{}' already tracked", id);
            return false;
        }
        // The registry cannot disagree with the buffer store here; both are
        // only ever mutated together.
        self.registry
            .add(document)
            .unwrap_or_else(|_| unreachable!("registry out of step with buffer store"));

        self.events.run_hooks(
            hook::DOCUMENT_ADDED,
            &EventArgs::DocumentAdded { document: id },
        );
        true
    }

    /// Stop tracking a document: destroy its buffer and baseline, purge its
    /// view states everywhere, vacate any editor showing it and fire
    /// `document-removed`. Returns whether a removal occurred.
    pub fn remove_document(&mut self, id: &DocumentId) -> bool {
        if !self.buffers.borrow_mut().remove(id) {
            return false;
        }
        self.registry.remove(id);
        self.global_view_states.borrow_mut().remove(id);

        let buffers = self.buffers.borrow();
        let ctx = SwitchCtx {
            buffers: &buffers,
            registry: &self.registry,
        };
        for editor in &mut self.editors {
            editor.on_document_disposed(id, &ctx);
        }
        drop(buffers);

        self.events.run_hooks(
            hook::DOCUMENT_REMOVED,
            &EventArgs::DocumentRemoved {
                document: id.clone(),
            },
        );
        tracing::debug!("removed document '{}'", id);
        true
    }

    /// The live text of a document's buffer
    pub fn document_content(&self, id: &DocumentId) -> Result<String, EditorError> {
        self.buffers
            .borrow()
            .get(id)
            .map(|b| b.text().to_string())
            .ok_or_else(|| EditorError::DocumentNotFound(id.clone()))
    }

    /// Whether the buffer diverges from its baseline (content comparison,
    /// length first)
    pub fn is_document_dirty(&self, id: &DocumentId) -> Result<bool, EditorError> {
        self.buffers
            .borrow()
            .is_dirty(id)
            .ok_or_else(|| EditorError::DocumentNotFound(id.clone()))
    }

    /// Apply an ordered edit batch to a document's buffer. This is the only
    /// local mutation entry point; the returned version is what the change
    /// coordinator compares analysis results against.
    pub fn apply_edits(
        &mut self,
        id: &DocumentId,
        changes: &[TextChange],
    ) -> Result<BufferVersion, EditorError> {
        let mut buffers = self.buffers.borrow_mut();
        let buffer = buffers
            .get_mut(id)
            .ok_or_else(|| EditorError::DocumentNotFound(id.clone()))?;
        Ok(buffer.apply_batch(changes))
    }

    /// Create an editor around a host surface, optionally pointing it at an
    /// initial document, and focus it. The previously focused editor's view
    /// state is saved first so a later switch in that editor restores it.
    pub fn add_editor(
        &mut self,
        surface: Box<dyn EditSurface>,
        initial: Option<&DocumentId>,
    ) -> EditorId {
        if let Some(focused) = self.focused_instance_mut() {
            focused.save_view_state();
        }

        let id = EditorId(self.next_editor_id);
        self.next_editor_id += 1;
        let mut editor = EditorInstance::new(
            id,
            surface,
            self.global_view_states.clone(),
            self.events.clone(),
        );

        if let Some(target) = initial {
            let buffers = self.buffers.borrow();
            let ctx = SwitchCtx {
                buffers: &buffers,
                registry: &self.registry,
            };
            editor.open_document(target, &ctx);
        }
        self.editors.push(editor);

        self.events
            .run_hooks(hook::EDITOR_ADDED, &EventArgs::EditorAdded { editor: id });
        self.set_focus(Some(id));
        tracing::debug!("{}: added", id);
        id
    }

    /// Tear an editor down. If it held focus, the most recently added
    /// survivor takes it (or focus clears); exactly one
    /// `focused-editor-changed` fires in that case.
    pub fn remove_editor(&mut self, id: EditorId) -> Result<(), EditorError> {
        let position = self
            .editors
            .iter()
            .position(|e| e.id() == id)
            .ok_or(EditorError::EditorNotFound(id))?;
        self.editors.remove(position);

        self.events
            .run_hooks(hook::EDITOR_REMOVED, &EventArgs::EditorRemoved { editor: id });

        if self.focused == Some(id) {
            let successor = self.editors.last().map(|e| e.id());
            self.set_focus(successor);
            if let Some(successor) = successor {
                if let Some(editor) = self.instance_mut(successor) {
                    editor.focus_surface();
                }
            }
        }
        tracing::debug!("{}: removed", id);
        Ok(())
    }

    /// Move session focus to an editor. Re-focusing the already focused
    /// editor fires nothing.
    pub fn focus_editor(&mut self, id: EditorId) -> Result<(), EditorError> {
        if self.instance_mut(id).is_none() {
            return Err(EditorError::EditorNotFound(id));
        }
        if self.focused != Some(id) {
            self.set_focus(Some(id));
            if let Some(editor) = self.instance_mut(id) {
                editor.focus_surface();
            }
        }
        Ok(())
    }

    /// Switch an editor to a document. Returns whether the switch happened.
    pub fn open_in(&mut self, editor: EditorId, target: &DocumentId) -> Result<bool, EditorError> {
        let buffers = self.buffers.borrow();
        let ctx = SwitchCtx {
            buffers: &buffers,
            registry: &self.registry,
        };
        let instance = self
            .editors
            .iter_mut()
            .find(|e| e.id() == editor)
            .ok_or(EditorError::EditorNotFound(editor))?;
        Ok(instance.open_document(target, &ctx))
    }

    /// Switch an editor to a document and reveal a span in it
    pub fn open_at_span_in(
        &mut self,
        editor: EditorId,
        target: &DocumentId,
        span: &Span,
    ) -> Result<bool, EditorError> {
        let buffers = self.buffers.borrow();
        let ctx = SwitchCtx {
            buffers: &buffers,
            registry: &self.registry,
        };
        let instance = self
            .editors
            .iter_mut()
            .find(|e| e.id() == editor)
            .ok_or(EditorError::EditorNotFound(editor))?;
        Ok(instance.open_at_span(target, span, &ctx))
    }

    /// Jump an editor to the document and span a diagnostic points into
    pub fn open_marker_in(
        &mut self,
        editor: EditorId,
        marker: &Marker,
    ) -> Result<bool, EditorError> {
        self.open_at_span_in(editor, &marker.document, &marker.span)
    }

    /// Close a document in an editor. Returns whether the close happened.
    pub fn close_in(&mut self, editor: EditorId, target: &DocumentId) -> Result<bool, EditorError> {
        let buffers = self.buffers.borrow();
        let ctx = SwitchCtx {
            buffers: &buffers,
            registry: &self.registry,
        };
        let instance = self
            .editors
            .iter_mut()
            .find(|e| e.id() == editor)
            .ok_or(EditorError::EditorNotFound(editor))?;
        Ok(instance.close_document(target, &ctx))
    }

    fn instance_mut(&mut self, id: EditorId) -> Option<&mut EditorInstance> {
        self.editors.iter_mut().find(|e| e.id() == id)
    }

    fn focused_instance_mut(&mut self) -> Option<&mut EditorInstance> {
        let focused = self.focused?;
        self.instance_mut(focused)
    }

    fn set_focus(&mut self, target: Option<EditorId>) {
        if self.focused == target {
            return;
        }
        self.focused = target;
        self.events.run_hooks(
            hook::FOCUSED_EDITOR_CHANGED,
            &EventArgs::FocusedEditorChanged { editor: target },
        );
    }
}
