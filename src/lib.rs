//! Editor/document lifecycle against a remote compiler workspace
//!
//! This crate is the glue between editor surfaces and an asynchronous
//! analysis backend. It tracks documents and their in-memory buffers,
//! multiplexes any number of editor surfaces over them (MRU stacks, view
//! state save/restore, focus), and coordinates buffer changes with the
//! backend: edits are forwarded immediately, diagnostics and classification
//! passes coalesce behind restartable timers, and every position-addressed
//! result is applied under a buffer-version staleness guard.
//!
//! Everything runs on one logical thread; shared state is passed around as
//! `Rc` handles and async calls never hold a borrow across a suspension
//! point.

pub mod backend;
pub mod buffer;
pub mod config;
pub mod controller;
pub mod document;
pub mod editor;
pub mod error;
pub mod events;
pub mod protocol;
pub mod surface;
pub mod sync;
pub mod timer;
pub mod view_state;

pub use backend::{AnalysisBackend, CancellationToken};
pub use buffer::{shared_buffers, BufferStore, BufferVersion, SharedBuffers, TextBuffer};
pub use config::SyncConfig;
pub use controller::EditorController;
pub use document::{AccessMode, Document, DocumentId, DocumentRegistry};
pub use editor::{EditorInstance, SwitchCtx};
pub use error::{BackendError, EditorError};
pub use events::{hook, EditorId, EventArgs, EventRegistry, SharedEvents};
pub use protocol::{
    ChangeBufferRequest, ClassifiedSpan, ClassifyRequest, ClassifyResponse, CodeCheckRequest,
    CodeCheckResponse, Marker, MarkerSeverity, Span, TextChange,
};
pub use surface::EditSurface;
pub use sync::{ChangeCoordinator, CheckScope, DiagnosticsStore, Outcome};
pub use timer::CoalescingTimer;
pub use view_state::{shared_view_states, SharedViewStates, ViewState, ViewStateStore};
