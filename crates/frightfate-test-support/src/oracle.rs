//! Test oracles — scripted `NarrativeOracle` implementations for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use frightfate_core::oracle::{NarrativeOracle, OracleError, OracleRequest};

type Responder = dyn Fn(&OracleRequest, usize) -> Result<String, OracleError> + Send + Sync;

/// An oracle whose replies are computed by a closure from the request and
/// the zero-based call index. Records every request it receives.
pub struct ScriptedOracle {
    responder: Box<Responder>,
    calls: AtomicUsize,
    requests: Mutex<Vec<OracleRequest>>,
}

impl ScriptedOracle {
    /// Replies to every call with `text`.
    #[must_use]
    pub fn always(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::responding(move |_, _| Ok(text.clone()))
    }

    /// Replies to call `i` with `replies[i]`; calls past the end fail with
    /// `OracleError::Unavailable`.
    #[must_use]
    pub fn sequence(replies: Vec<Result<String, OracleError>>) -> Self {
        Self::responding(move |_, index| {
            replies
                .get(index)
                .cloned()
                .unwrap_or_else(|| Err(OracleError::Unavailable("script exhausted".into())))
        })
    }

    /// Replies using `responder`.
    #[must_use]
    pub fn responding<F>(responder: F) -> Self
    where
        F: Fn(&OracleRequest, usize) -> Result<String, OracleError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of `generate` calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Snapshot of every request received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requests(&self) -> Vec<OracleRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl std::fmt::Debug for ScriptedOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedOracle")
            .field("calls", &self.call_count())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl NarrativeOracle for ScriptedOracle {
    async fn generate(&self, request: &OracleRequest) -> Result<String, OracleError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        (self.responder)(request, index)
    }
}

/// An oracle that is always unreachable.
#[derive(Debug, Default)]
pub struct FailingOracle {
    calls: AtomicUsize,
}

impl FailingOracle {
    /// Number of `generate` calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NarrativeOracle for FailingOracle {
    async fn generate(&self, _request: &OracleRequest) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(OracleError::Unavailable("connection refused".into()))
    }
}

/// An oracle that never answers. Pair with a paused tokio clock to exercise
/// time budgets.
#[derive(Debug, Default)]
pub struct StallingOracle;

#[async_trait]
impl NarrativeOracle for StallingOracle {
    async fn generate(&self, _request: &OracleRequest) -> Result<String, OracleError> {
        std::future::pending::<()>().await;
        Err(OracleError::Unavailable("unreachable".into()))
    }
}
