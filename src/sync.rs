//! Change coordination and diagnostics
//!
//! The coordinator sits between local buffer mutations and the analysis
//! backend. Edits are forwarded immediately and in production order; only
//! the *analysis triggers* coalesce, through two restartable timers: a fast
//! per-document one and a slow whole-workspace one. Every analysis result
//! is position-addressed into a buffer that may have moved on while the
//! call was in flight, so results are applied under a staleness guard: the
//! buffer version captured at issue time must still be current, or the
//! result is discarded.
//!
//! Staleness, cancellation and advisory-timeout expiry are clean outcomes,
//! not errors. Discarded work is never retried here; the next coalescing
//! trigger covers it.

use crate::backend::{AnalysisBackend, CancellationToken};
use crate::buffer::{BufferVersion, SharedBuffers};
use crate::config::SyncConfig;
use crate::document::DocumentId;
use crate::error::BackendError;
use crate::events::{hook, EventArgs, SharedEvents};
use crate::protocol::{
    ChangeBufferRequest, ClassifyRequest, ClassifyResponse, CodeCheckRequest, Marker, Span,
    TextChange,
};
use crate::timer::CoalescingTimer;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::time::Instant;

/// What a diagnostics pass covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckScope {
    Document(DocumentId),
    Workspace,
}

/// Result of one guarded backend round-trip.
///
/// `Stale` and `Cancelled` are ordinary outcomes: the local state simply
/// outran the call. Only `Failed` carries an actual backend failure, and
/// even that leaves decoration state untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Applied(T),
    Stale,
    Cancelled,
    Failed(BackendError),
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }
}

/// Applied diagnostics per document, with the buffer version they address
#[derive(Debug, Default)]
pub struct DiagnosticsStore {
    markers: HashMap<DocumentId, (BufferVersion, Vec<Marker>)>,
}

impl DiagnosticsStore {
    pub fn markers(&self, id: &DocumentId) -> &[Marker] {
        self.markers.get(id).map(|(_, m)| m.as_slice()).unwrap_or(&[])
    }

    /// The buffer version the stored markers address
    pub fn version_of(&self, id: &DocumentId) -> Option<BufferVersion> {
        self.markers.get(id).map(|(v, _)| *v)
    }

    fn set(&mut self, id: DocumentId, version: BufferVersion, markers: Vec<Marker>) {
        self.markers.insert(id, (version, markers));
    }

    fn remove(&mut self, id: &DocumentId) {
        self.markers.remove(id);
    }
}

pub struct ChangeCoordinator {
    backend: Box<dyn AnalysisBackend>,
    config: SyncConfig,
    buffers: SharedBuffers,
    events: SharedEvents,
    /// One fast timer per document that has seen an edit
    fast_timers: HashMap<DocumentId, CoalescingTimer>,
    slow_timer: CoalescingTimer,
    diagnostics: DiagnosticsStore,
}

impl ChangeCoordinator {
    pub fn new(
        backend: Box<dyn AnalysisBackend>,
        config: SyncConfig,
        buffers: SharedBuffers,
        events: SharedEvents,
    ) -> Self {
        let slow_timer = CoalescingTimer::new(config.workspace_check_delay());
        Self {
            backend,
            config,
            buffers,
            events,
            fast_timers: HashMap::new(),
            slow_timer,
            diagnostics: DiagnosticsStore::default(),
        }
    }

    pub fn diagnostics(&self) -> &DiagnosticsStore {
        &self.diagnostics
    }

    /// The earliest pending trigger, for hosts that sleep instead of polling
    pub fn next_deadline(&self) -> Option<Instant> {
        self.fast_timers
            .values()
            .filter_map(|t| t.next_deadline())
            .chain(self.slow_timer.next_deadline())
            .min()
    }

    /// Forward an edit batch that was just applied locally.
    ///
    /// An empty batch is a dirty-bit flip from the host, not an edit; it is
    /// ignored entirely. Otherwise the batch goes to the backend right away
    /// (edits are never debounced, never reordered) and both analysis
    /// timers restart. A forwarding failure propagates without restarting
    /// the timers.
    pub async fn on_edits(
        &mut self,
        document: &DocumentId,
        changes: &[TextChange],
        now: Instant,
    ) -> Result<(), BackendError> {
        if changes.is_empty() {
            return Ok(());
        }

        let request = ChangeBufferRequest {
            document: document.clone(),
            changes: changes.to_vec(),
            apply_changes_together: changes.len() > 1,
        };
        let token = CancellationToken::new();
        if let Err(err) = self
            .guarded(self.backend.apply_changes(request, &token))
            .await
        {
            tracing::warn!("forwarding edits for '{}' failed: {}", document, err);
            return Err(err);
        }

        self.fast_timers
            .entry(document.clone())
            .or_insert_with(|| CoalescingTimer::new(self.config.check_delay()))
            .restart(now);
        self.slow_timer.restart(now);
        Ok(())
    }

    /// A document joined the workspace; schedule a whole-workspace pass
    pub fn on_document_added(&mut self, now: Instant) {
        self.slow_timer.restart(now);
    }

    /// A document left the workspace; drop its trigger and its markers
    pub fn on_document_removed(&mut self, document: &DocumentId) {
        self.fast_timers.remove(document);
        self.diagnostics.remove(document);
    }

    /// Drain every timer whose deadline has passed into check work items.
    /// Document scopes come out in identity order, the workspace scope last.
    pub fn due_checks(&mut self, now: Instant) -> Vec<CheckScope> {
        let mut due: Vec<DocumentId> = self
            .fast_timers
            .iter_mut()
            .filter_map(|(id, timer)| timer.fire_due(now).then(|| id.clone()))
            .collect();
        due.sort();

        let mut scopes: Vec<CheckScope> = due.into_iter().map(CheckScope::Document).collect();
        if self.slow_timer.fire_due(now) {
            scopes.push(CheckScope::Workspace);
        }
        scopes
    }

    /// Run one diagnostics pass.
    ///
    /// Buffer versions for the addressed documents are captured at issue
    /// time. On completion the response is partitioned by document and each
    /// group is applied only if its captured version is still current;
    /// stale groups are discarded without touching previously applied
    /// markers. A document-scoped pass whose response carries no marker for
    /// the document clears that document's markers; a workspace pass only
    /// ever updates documents the response mentions.
    ///
    /// Returns the number of documents whose markers were updated, or
    /// `Stale` when every group was discarded.
    pub async fn run_check(
        &mut self,
        scope: CheckScope,
        cancel: &CancellationToken,
    ) -> Outcome<usize> {
        let issued: HashMap<DocumentId, BufferVersion> = {
            let buffers = self.buffers.borrow();
            match &scope {
                CheckScope::Document(id) => match buffers.version_of(id) {
                    Some(version) => HashMap::from([(id.clone(), version)]),
                    // The document is gone; nothing to decorate
                    None => return Outcome::Stale,
                },
                CheckScope::Workspace => buffers
                    .ids()
                    .map(|id| (id.clone(), buffers.version_of(id).unwrap_or(0)))
                    .collect(),
            }
        };

        let request = CodeCheckRequest {
            document: match &scope {
                CheckScope::Document(id) => Some(id.clone()),
                CheckScope::Workspace => None,
            },
        };
        let response = match self.guarded(self.backend.code_check(request, cancel)).await {
            Ok(response) => response,
            Err(BackendError::Cancelled) => return Outcome::Cancelled,
            Err(err) => {
                tracing::warn!("diagnostics pass failed: {}", err);
                return Outcome::Failed(err);
            }
        };
        if cancel.is_cancelled() {
            return Outcome::Cancelled;
        }

        let mut groups: BTreeMap<DocumentId, Vec<Marker>> = BTreeMap::new();
        if let CheckScope::Document(id) = &scope {
            groups.insert(id.clone(), Vec::new());
        }
        for marker in response.markers {
            groups.entry(marker.document.clone()).or_default().push(marker);
        }

        let mut applied_markers = Vec::new();
        let mut applied_docs = 0usize;
        {
            let buffers = self.buffers.borrow();
            for (id, markers) in groups {
                let Some(issued_version) = issued.get(&id) else {
                    // Not addressed by this pass; never apply blind
                    continue;
                };
                if buffers.version_of(&id) != Some(*issued_version) {
                    tracing::debug!("discarding stale markers for '{}'", id);
                    continue;
                }
                applied_markers.extend(markers.iter().cloned());
                self.diagnostics.set(id, *issued_version, markers);
                applied_docs += 1;
            }
        }

        if applied_docs == 0 {
            return Outcome::Stale;
        }
        self.events.run_hooks(
            hook::DIAGNOSTICS_CHANGED,
            &EventArgs::DiagnosticsChanged {
                document: match &scope {
                    CheckScope::Document(id) => Some(id.clone()),
                    CheckScope::Workspace => None,
                },
                markers: applied_markers,
            },
        );
        Outcome::Applied(applied_docs)
    }

    /// Single-shot staleness-guarded token classification. The response is
    /// position-addressed, so it is only handed back if the buffer did not
    /// move while the call was in flight.
    pub async fn classify(
        &mut self,
        document: &DocumentId,
        range: Option<Span>,
        cancel: &CancellationToken,
    ) -> Outcome<ClassifyResponse> {
        let Some(issued_version) = self.buffers.borrow().version_of(document) else {
            return Outcome::Stale;
        };

        let request = ClassifyRequest {
            document: document.clone(),
            range,
        };
        let response = match self.guarded(self.backend.classify(request, cancel)).await {
            Ok(response) => response,
            Err(BackendError::Cancelled) => return Outcome::Cancelled,
            Err(err) => {
                tracing::warn!("classification for '{}' failed: {}", document, err);
                return Outcome::Failed(err);
            }
        };
        if cancel.is_cancelled() {
            return Outcome::Cancelled;
        }

        if self.buffers.borrow().version_of(document) != Some(issued_version) {
            tracing::debug!("discarding stale classification for '{}'", document);
            return Outcome::Stale;
        }
        Outcome::Applied(response)
    }

    /// Apply the advisory timeout to a backend call. Expiry is treated as
    /// cancellation: the work is discarded and never retried here.
    async fn guarded<T>(
        &self,
        call: impl Future<Output = Result<T, BackendError>>,
    ) -> Result<T, BackendError> {
        match self.config.backend_timeout() {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(BackendError::Cancelled),
            },
            None => call.await,
        }
    }
}
