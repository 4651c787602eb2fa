//! Shared test doubles: a recording edit surface and a scripted backend
#![allow(dead_code)]

use async_trait::async_trait;
use codesync::{
    AnalysisBackend, BackendError, CancellationToken, ChangeBufferRequest, ClassifyRequest,
    ClassifyResponse, CodeCheckRequest, CodeCheckResponse, DocumentId, EditSurface, Marker,
    MarkerSeverity, Span, ViewState,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;
use std::time::Duration;

static TRACING: Once = Once::new();

/// Route log output through the test harness, honoring `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Everything a host surface would have been told to do
#[derive(Default)]
pub struct SurfaceState {
    pub shown: Option<DocumentId>,
    pub text: String,
    pub read_only: bool,
    pub focus_count: usize,
    pub restored: Vec<ViewState>,
    pub revealed: Vec<Span>,
    /// Snapshot handed out by the next capture_view_state call
    pub next_capture: Option<ViewState>,
}

pub struct RecordingSurface(pub Rc<RefCell<SurfaceState>>);

impl RecordingSurface {
    pub fn create() -> (Box<dyn EditSurface>, Rc<RefCell<SurfaceState>>) {
        let state = Rc::new(RefCell::new(SurfaceState::default()));
        (Box::new(RecordingSurface(state.clone())), state)
    }
}

impl EditSurface for RecordingSurface {
    fn show(&mut self, document: &DocumentId, text: &str) {
        let mut s = self.0.borrow_mut();
        s.shown = Some(document.clone());
        s.text = text.to_string();
    }

    fn clear(&mut self) {
        self.0.borrow_mut().shown = None;
    }

    fn focus(&mut self) {
        self.0.borrow_mut().focus_count += 1;
    }

    fn set_read_only(&mut self, read_only: bool) {
        self.0.borrow_mut().read_only = read_only;
    }

    fn active_document(&self) -> Option<DocumentId> {
        self.0.borrow().shown.clone()
    }

    fn capture_view_state(&self) -> Option<ViewState> {
        self.0.borrow().next_capture.clone()
    }

    fn restore_view_state(&mut self, state: &ViewState) {
        self.0.borrow_mut().restored.push(state.clone());
    }

    fn reveal_span(&mut self, span: &Span) {
        self.0.borrow_mut().revealed.push(*span);
    }
}

#[derive(Default)]
pub struct BackendLog {
    pub change_requests: Vec<ChangeBufferRequest>,
    pub check_requests: Vec<CodeCheckRequest>,
}

/// Scripted analysis backend. Each diagnostics call answers with the next
/// queued response (an empty one once the queue runs dry); `while_busy`
/// runs mid-call, standing in for local work racing the round-trip.
pub struct ScriptedBackend {
    pub log: Rc<RefCell<BackendLog>>,
    check_responses: RefCell<Vec<Result<CodeCheckResponse, BackendError>>>,
    while_busy: Option<Box<dyn Fn()>>,
    latency: Duration,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(BackendLog::default())),
            check_responses: RefCell::new(Vec::new()),
            while_busy: None,
            latency: Duration::ZERO,
        }
    }

    pub fn with_check(self, response: CodeCheckResponse) -> Self {
        self.check_responses.borrow_mut().push(Ok(response));
        self
    }

    pub fn with_while_busy(mut self, hook: impl Fn() + 'static) -> Self {
        self.while_busy = Some(Box::new(hook));
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl AnalysisBackend for ScriptedBackend {
    async fn apply_changes(
        &self,
        request: ChangeBufferRequest,
        _cancel: &CancellationToken,
    ) -> Result<(), BackendError> {
        self.log.borrow_mut().change_requests.push(request);
        Ok(())
    }

    async fn code_check(
        &self,
        request: CodeCheckRequest,
        _cancel: &CancellationToken,
    ) -> Result<CodeCheckResponse, BackendError> {
        self.log.borrow_mut().check_requests.push(request);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if let Some(hook) = &self.while_busy {
            hook();
        }
        let mut queue = self.check_responses.borrow_mut();
        if queue.is_empty() {
            return Ok(CodeCheckResponse { markers: vec![] });
        }
        queue.remove(0)
    }

    async fn classify(
        &self,
        _request: ClassifyRequest,
        _cancel: &CancellationToken,
    ) -> Result<ClassifyResponse, BackendError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if let Some(hook) = &self.while_busy {
            hook();
        }
        Ok(ClassifyResponse { spans: vec![] })
    }
}

pub fn error_marker(doc: &str, message: &str) -> Marker {
    Marker {
        document: DocumentId::from(doc),
        severity: MarkerSeverity::Error,
        message: message.to_string(),
        span: Span::new(0, 0, 0, 1),
    }
}
