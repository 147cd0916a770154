//! Fire-and-forget search query logging
//!
//! A catalog lookup must never fail or slow down because its search could
//! not be recorded. The logger therefore decouples the request path from
//! the store write with a bounded channel and a single background worker:
//! enqueueing is non-blocking, a full buffer drops the record, and store
//! failures inside the worker are logged and swallowed. At-most-once, no
//! retries.

use std::sync::Arc;

use storepulse_core::events::SearchQuery;
use storepulse_core::store::EventStore;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Queued records before enqueueing starts dropping
const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Background recorder for search query records
pub struct SearchQueryLogger {
    tx: mpsc::Sender<SearchQuery>,
    worker_handle: JoinHandle<()>,
}

/// Cloneable enqueue handle held by request handlers
#[derive(Clone)]
pub struct SearchLogHandle {
    tx: mpsc::Sender<SearchQuery>,
}

impl SearchLogHandle {
    /// Enqueue one record (non-blocking, fire-and-forget).
    ///
    /// Returns false when the record was dropped because the buffer is full
    /// or the worker is gone. Callers are free to discard the result; drops
    /// are surfaced in logs either way.
    pub fn log(&self, record: SearchQuery) -> bool {
        match self.tx.try_send(record) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!("Search log buffer full, dropping record");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::error!("Search logger worker is gone, dropping record");
                false
            }
        }
    }
}

impl SearchQueryLogger {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self::with_buffer_size(store, DEFAULT_BUFFER_SIZE)
    }

    pub fn with_buffer_size(store: Arc<dyn EventStore>, buffer_size: usize) -> Self {
        let (tx, rx) = mpsc::channel(buffer_size);

        let worker_handle = tokio::spawn(async move {
            Self::worker_loop(rx, store).await;
        });

        Self { tx, worker_handle }
    }

    /// New enqueue handle for request handlers
    pub fn handle(&self) -> SearchLogHandle {
        SearchLogHandle {
            tx: self.tx.clone(),
        }
    }

    async fn worker_loop(mut rx: mpsc::Receiver<SearchQuery>, store: Arc<dyn EventStore>) {
        while let Some(record) = rx.recv().await {
            // At-most-once: a failed write is logged and dropped, not retried
            if let Err(e) = store.record_search_query(record).await {
                tracing::warn!(error = %e, "Failed to record search query");
            }
        }

        tracing::debug!("Search logger worker loop exited");
    }

    /// Gracefully shut down, draining records already queued.
    ///
    /// Completes once every [`SearchLogHandle`] clone has been dropped and
    /// the worker has written out the remaining queue.
    pub async fn shutdown(self) {
        let Self { tx, worker_handle } = self;
        drop(tx);

        if let Err(e) = worker_handle.await {
            tracing::error!(error = %e, "Search logger worker task failed");
        }

        tracing::info!("Search logger shutdown complete");
    }
}
