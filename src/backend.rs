//! The compiler-workspace call surface
//!
//! The analysis backend is an external collaborator reached only through
//! this async boundary. It may be slow and it may race with local edits;
//! callers coordinate against it with buffer versions (see
//! [`crate::sync`]), never by reaching into it.

use crate::error::BackendError;
use crate::protocol::{
    ChangeBufferRequest, ClassifyRequest, ClassifyResponse, CodeCheckRequest, CodeCheckResponse,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cancellation handle for one in-flight backend call
///
/// Cloneable; cancelling any clone is observable by the call before its
/// result is delivered. Cancelling stops result application but never rolls
/// back already-applied local edits.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Async call surface of the language-analysis service
///
/// Change batches for a given document must be submitted in the order they
/// were produced locally; the coordinator guarantees this by forwarding
/// them immediately and never coalescing the edits themselves.
///
/// Futures are not required to be `Send`; the whole bridge runs on one
/// logical thread.
#[async_trait(?Send)]
pub trait AnalysisBackend {
    /// Apply an ordered batch of edits to the backend's copy of a buffer
    async fn apply_changes(
        &self,
        request: ChangeBufferRequest,
        cancel: &CancellationToken,
    ) -> Result<(), BackendError>;

    /// Run diagnostics for one document or the whole workspace
    async fn code_check(
        &self,
        request: CodeCheckRequest,
        cancel: &CancellationToken,
    ) -> Result<CodeCheckResponse, BackendError>;

    /// Classify token spans for a document (position-addressed result;
    /// callers must apply it under the staleness guard)
    async fn classify(
        &self,
        request: ClassifyRequest,
        cancel: &CancellationToken,
    ) -> Result<ClassifyResponse, BackendError>;
}
