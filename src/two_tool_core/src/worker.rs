//! A background thread answering search requests over channels.

use crate::{
    database::AlgDatabase,
    method::DepthConfig,
    moves::Scramble,
    search,
    solution::Solution,
};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use log::{debug, trace};
use std::{
    fmt,
    sync::Arc,
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};
use thiserror::Error;

/// Identifies a request. Ids increase with every submission, so a larger id
/// is always the more recent request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub scramble: Scramble,
    pub eg_depth: u8,
    pub tcll_depth: u8,
    pub ls_depth: u8,
}

impl SearchRequest {
    /// The alg cutoff in `depths` only matters for display and is not sent.
    #[must_use]
    pub fn new(scramble: Scramble, depths: &DepthConfig) -> Self {
        Self {
            scramble,
            eg_depth: depths.eg,
            tcll_depth: depths.tcll,
            ls_depth: depths.ls,
        }
    }

    #[must_use]
    pub fn depths(&self) -> DepthConfig {
        DepthConfig {
            eg: self.eg_depth,
            tcll: self.tcll_depth,
            ls: self.ls_depth,
            ..DepthConfig::default()
        }
    }
}

/// The raw, unranked solutions for one request.
#[derive(Debug, Clone)]
pub struct SearchResponse {
    pub id: RequestId,
    pub solutions: Vec<Solution>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BoundaryError {
    #[error("No response within {0:?}")]
    Timeout(Duration),
    #[error("The solver thread has stopped")]
    Disconnected,
}

/// Handle to the solver thread. Requests are answered in the order they were
/// submitted. Dropping the handle stops the thread once it finishes its
/// current request.
pub struct SolverWorker {
    request_tx: Option<Sender<(RequestId, SearchRequest)>>,
    response_rx: Receiver<SearchResponse>,
    handle: Option<JoinHandle<()>>,
    next_id: u64,
    latest: Option<RequestId>,
}

impl SolverWorker {
    #[must_use]
    pub fn spawn(database: Arc<AlgDatabase>) -> Self {
        let (request_tx, request_rx) = unbounded::<(RequestId, SearchRequest)>();
        let (response_tx, response_rx) = unbounded::<SearchResponse>();

        let handle = thread::spawn(move || solver_loop(&database, &request_rx, &response_tx));

        Self {
            request_tx: Some(request_tx),
            response_rx,
            handle: Some(handle),
            next_id: 0,
            latest: None,
        }
    }

    /// Queue a request and return its id.
    ///
    /// # Errors
    ///
    /// If the solver thread has stopped.
    pub fn submit(&mut self, request: SearchRequest) -> Result<RequestId, BoundaryError> {
        let id = RequestId(self.next_id);
        self.request_tx
            .as_ref()
            .ok_or(BoundaryError::Disconnected)?
            .send((id, request))
            .map_err(|_| BoundaryError::Disconnected)?;
        self.next_id += 1;
        self.latest = Some(id);
        debug!("Submitted request {id}");
        Ok(id)
    }

    /// The id of the most recent submission.
    #[must_use]
    pub fn latest(&self) -> Option<RequestId> {
        self.latest
    }

    /// The next response, whichever request it answers.
    ///
    /// # Errors
    ///
    /// `Timeout` if nothing arrives within `timeout`, `Disconnected` if the
    /// solver thread has stopped.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<SearchResponse, BoundaryError> {
        self.response_rx
            .recv_timeout(timeout)
            .map_err(|e| match e {
                RecvTimeoutError::Timeout => BoundaryError::Timeout(timeout),
                RecvTimeoutError::Disconnected => BoundaryError::Disconnected,
            })
    }

    /// The response to the most recent submission. Responses to earlier
    /// requests are discarded.
    ///
    /// # Errors
    ///
    /// As `recv_timeout`. Nothing having been submitted times out.
    pub fn recv_latest(&self, timeout: Duration) -> Result<SearchResponse, BoundaryError> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let response = self
                .recv_timeout(remaining)
                .map_err(|e| match e {
                    BoundaryError::Timeout(_) => BoundaryError::Timeout(timeout),
                    BoundaryError::Disconnected => e,
                })?;
            if Some(response.id) == self.latest {
                return Ok(response);
            }
            debug!("Discarding stale response {}", response.id);
        }
    }
}

impl Drop for SolverWorker {
    fn drop(&mut self) {
        drop(self.request_tx.take());
        if let Some(handle) = self.handle.take() {
            // A panic on the solver thread has already been reported there
            let _ = handle.join();
        }
    }
}

fn solver_loop(
    database: &AlgDatabase,
    request_rx: &Receiver<(RequestId, SearchRequest)>,
    response_tx: &Sender<SearchResponse>,
) {
    for (id, request) in request_rx {
        trace!("Solving request {id}: {request:?}");
        let solutions = search(database, &request.scramble, &request.depths());
        if response_tx.send(SearchResponse { id, solutions }).is_err() {
            break;
        }
    }
    debug!("Solver thread stopping");
}
