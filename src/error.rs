//! Error taxonomy for the editor/workspace bridge
//!
//! Structural violations (duplicate add, missing lookup) are reported
//! synchronously to the immediate caller. Backend transport failures live in
//! [`BackendError`] and are caught at the coordinator boundary. A stale
//! analysis result is *not* an error; see [`crate::sync::Outcome`].

use crate::document::DocumentId;
use crate::events::EditorId;
use thiserror::Error;

/// Errors raised by the document registry, editor instances and controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// A document with this identity is already registered
    #[error("document '{0}' is already registered")]
    DuplicateDocument(DocumentId),

    /// No document with this identity is known
    #[error("document '{0}' not found")]
    DocumentNotFound(DocumentId),

    /// No editor instance with this id is registered
    #[error("editor {0} not found")]
    EditorNotFound(EditorId),

    /// The editor surface is not showing any document
    #[error("no document is active in this editor")]
    NoActiveDocument,
}

/// Failures crossing the compiler-workspace boundary.
///
/// Cancellation is a clean outcome, not a session-ending failure: callers
/// discard the in-flight work and let the next coalescing trigger retry
/// naturally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Transport-level failure reaching the workspace
    #[error("compiler workspace unavailable: {0}")]
    Unavailable(String),

    /// The call was cancelled before a result was delivered
    #[error("request cancelled")]
    Cancelled,
}
