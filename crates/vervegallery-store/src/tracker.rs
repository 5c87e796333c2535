//! Per-request status tracking
//!
//! Every store action registers a request that starts as
//! [`RequestState::Loading`] and ends as `Succeeded` or `Failed(message)`.
//! Loading and error flags for a view are derived from these records rather
//! than kept as shared booleans, so overlapping actions cannot clobber each
//! other's status.

use std::{
    future::Future,
    sync::atomic::{AtomicU64, Ordering},
};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{debug, warn};
use vervegallery_core::domain::RequestId;

use crate::StoreError;

/// Finished records kept before the oldest are evicted
const MAX_FINISHED: usize = 64;

/// Lifecycle state of a tracked request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    Loading,
    Succeeded,
    Failed(String),
}

/// A tracked request
#[derive(Debug, Clone)]
pub struct RequestRecord {
    /// Store action name, e.g. `"fetch_all_photos"`
    pub action: &'static str,
    pub state: RequestState,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Completion order; 0 while loading
    finished_seq: u64,
}

/// Registry of in-flight and recently finished requests
#[derive(Debug, Default)]
pub struct RequestTracker {
    requests: DashMap<RequestId, RequestRecord>,
    next_seq: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new request in the `Loading` state
    pub fn begin(&self, action: &'static str) -> RequestId {
        let id = RequestId::new();
        self.requests.insert(
            id,
            RequestRecord {
                action,
                state: RequestState::Loading,
                started_at: Utc::now(),
                finished_at: None,
                finished_seq: 0,
            },
        );
        debug!(request_id = %id, action, "Request started");
        id
    }

    /// Marks a request as succeeded
    pub fn succeed(&self, id: RequestId) {
        self.finish(id, RequestState::Succeeded);
    }

    /// Marks a request as failed with a user-facing message
    pub fn fail(&self, id: RequestId, message: impl Into<String>) {
        self.finish(id, RequestState::Failed(message.into()));
    }

    fn finish(&self, id: RequestId, state: RequestState) {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(mut record) = self.requests.get_mut(&id) {
            record.state = state;
            record.finished_at = Some(Utc::now());
            record.finished_seq = seq;
        }
        self.evict_finished();
    }

    fn evict_finished(&self) {
        let mut finished: Vec<(u64, RequestId)> = self
            .requests
            .iter()
            .filter(|r| r.finished_seq > 0)
            .map(|r| (r.finished_seq, *r.key()))
            .collect();
        if finished.len() <= MAX_FINISHED {
            return;
        }
        finished.sort_unstable_by_key(|(seq, _)| *seq);
        let excess = finished.len() - MAX_FINISHED;
        for (_, id) in finished.into_iter().take(excess) {
            self.requests.remove(&id);
        }
    }

    /// Runs `action` as a tracked request
    ///
    /// On failure the error's [`StoreError::user_message`] is recorded and
    /// the error is returned unchanged.
    pub async fn track<T, F>(&self, action: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        let id = self.begin(action);
        match fut.await {
            Ok(value) => {
                self.succeed(id);
                Ok(value)
            }
            Err(err) => {
                warn!(request_id = %id, action, error = %err, "Request failed");
                self.fail(id, err.user_message());
                Err(err)
            }
        }
    }

    /// Returns the record for `id`, if it is still retained
    pub fn get(&self, id: &RequestId) -> Option<RequestRecord> {
        self.requests.get(id).map(|r| r.clone())
    }

    /// Returns true while any request is in flight
    pub fn is_loading(&self) -> bool {
        self.requests
            .iter()
            .any(|r| r.state == RequestState::Loading)
    }

    /// Number of requests in flight
    pub fn in_flight(&self) -> usize {
        self.requests
            .iter()
            .filter(|r| r.state == RequestState::Loading)
            .count()
    }

    /// Message of the most recently failed request
    pub fn last_error(&self) -> Option<String> {
        self.requests
            .iter()
            .filter_map(|r| match &r.state {
                RequestState::Failed(message) => Some((r.finished_seq, message.clone())),
                _ => None,
            })
            .max_by_key(|(seq, _)| *seq)
            .map(|(_, message)| message)
    }

    /// State of the most recently finished request for `action`
    pub fn last_state(&self, action: &str) -> Option<RequestState> {
        self.requests
            .iter()
            .filter(|r| r.action == action && r.finished_seq > 0)
            .max_by_key(|r| r.finished_seq)
            .map(|r| r.state.clone())
    }
}
