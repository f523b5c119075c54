//! Async range-request orchestrator.
//!
//! Runs the filter → aggregate pipeline in a tokio task. The UI sends a
//! [`RangeRequest`] whenever the date control changes and receives a
//! [`DashboardUpdate`] back through an `mpsc` channel, so the event loop
//! never shares mutable state with the computation.

use bikeshare_core::models::DateRange;
use bikeshare_data::analysis::DashboardSnapshot;
use tokio::sync::mpsc;

use crate::data_manager::DatasetHandle;

/// Capacity of both request and update channels.
const CHANNEL_CAPACITY: usize = 16;

// ── Public types ──────────────────────────────────────────────────────────────

/// A date-range change coming from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRequest {
    /// Monotonic id chosen by the sender; echoed back in the update.
    pub id: u64,
    pub range: DateRange,
}

/// A computed snapshot forwarded to the presentation layer.
#[derive(Debug, Clone)]
pub struct DashboardUpdate {
    /// Id of the request this answers. `0` for the initial snapshot.
    pub request_id: u64,
    pub snapshot: DashboardSnapshot,
}

// ── DashboardOrchestrator ─────────────────────────────────────────────────────

/// Background coordinator answering range requests.
///
/// Requests that queue up while a snapshot is being computed are coalesced:
/// only the newest one is answered, since the older ranges are already stale
/// from the user's point of view.
pub struct DashboardOrchestrator {
    dataset: DatasetHandle,
    top_n: usize,
    initial_range: Option<DateRange>,
}

impl DashboardOrchestrator {
    /// Create a new orchestrator.
    ///
    /// When `initial_range` is set, a snapshot for it is sent as soon as the
    /// task starts, before any request arrives.
    pub fn new(dataset: DatasetHandle, top_n: usize, initial_range: Option<DateRange>) -> Self {
        Self {
            dataset,
            top_n,
            initial_range,
        }
    }

    /// Spawn the request loop.
    ///
    /// Returns the request sender, the update receiver and a handle that can
    /// abort the loop. The loop also ends on its own once every request
    /// sender has been dropped.
    pub fn start(
        self,
    ) -> (
        mpsc::Sender<RangeRequest>,
        mpsc::Receiver<DashboardUpdate>,
        OrchestratorHandle,
    ) {
        let (request_tx, request_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (update_tx, update_rx) = mpsc::channel(CHANNEL_CAPACITY);

        let handle = tokio::spawn(async move {
            self.request_loop(request_rx, update_tx).await;
        });

        (request_tx, update_rx, OrchestratorHandle { handle })
    }

    // ── Private implementation ────────────────────────────────────────────

    async fn request_loop(
        self,
        mut requests: mpsc::Receiver<RangeRequest>,
        updates: mpsc::Sender<DashboardUpdate>,
    ) {
        if let Some(range) = self.initial_range {
            if !self.answer(0, range, &updates).await {
                return;
            }
        }

        while let Some(mut request) = requests.recv().await {
            // Skip anything superseded while we were busy.
            while let Ok(newer) = requests.try_recv() {
                tracing::trace!(skipped = request.id, "coalescing stale range request");
                request = newer;
            }

            if !self.answer(request.id, request.range, &updates).await {
                return;
            }
        }

        tracing::debug!("range request channel closed; exiting loop");
    }

    /// Compute and send one snapshot. Returns `false` once the receiver is gone.
    async fn answer(
        &self,
        request_id: u64,
        range: DateRange,
        updates: &mpsc::Sender<DashboardUpdate>,
    ) -> bool {
        let snapshot = self.dataset.analyze(range, self.top_n);
        let update = DashboardUpdate {
            request_id,
            snapshot,
        };

        if let Err(e) = updates.send(update).await {
            tracing::warn!(error = %e, "failed to send dashboard update; receiver dropped");
            return false;
        }
        true
    }
}

// ── OrchestratorHandle ────────────────────────────────────────────────────────

/// A handle to the background request loop.
pub struct OrchestratorHandle {
    handle: tokio::task::JoinHandle<()>,
}

impl OrchestratorHandle {
    /// Immediately abort the request loop.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// `true` once the loop has exited or been aborted.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bikeshare_core::models::{Key, Record, Table};
    use chrono::NaiveDate;
    use std::time::Duration;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn dataset() -> DatasetHandle {
        DatasetHandle::from_table(Table::from_records(vec![
            Record::new(Key::Int(1), d(2011, 1, 1), Key::Int(0), 10),
            Record::new(Key::Int(1), d(2011, 1, 2), Key::Int(0), 5),
            Record::new(Key::Int(2), d(2011, 1, 2), Key::Int(1), 20),
            Record::new(Key::Int(3), d(2011, 1, 4), Key::Int(0), 8),
        ]))
    }

    async fn next_update(rx: &mut mpsc::Receiver<DashboardUpdate>) -> DashboardUpdate {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for update")
            .expect("channel closed before receiving update")
    }

    #[tokio::test]
    async fn test_sends_initial_snapshot() {
        let data = dataset();
        let initial = data.default_range();
        let (_tx, mut rx, handle) = DashboardOrchestrator::new(data, 5, initial).start();

        let update = next_update(&mut rx).await;
        assert_eq!(update.request_id, 0);
        assert_eq!(update.snapshot.summary.total_sharing, 43);
        assert_eq!(update.snapshot.records_in_range, 4);

        handle.abort();
    }

    #[tokio::test]
    async fn test_answers_range_request() {
        let (tx, mut rx, handle) = DashboardOrchestrator::new(dataset(), 5, None).start();

        tx.send(RangeRequest {
            id: 7,
            range: DateRange::single_day(d(2011, 1, 2)),
        })
        .await
        .unwrap();

        let update = next_update(&mut rx).await;
        assert_eq!(update.request_id, 7);
        assert_eq!(update.snapshot.summary.total_sharing, 25);
        assert_eq!(update.snapshot.rfm.len(), 2);

        handle.abort();
    }

    #[tokio::test]
    async fn test_inverted_range_yields_empty_snapshot() {
        let (tx, mut rx, handle) = DashboardOrchestrator::new(dataset(), 5, None).start();

        tx.send(RangeRequest {
            id: 1,
            range: DateRange::new(d(2011, 1, 4), d(2011, 1, 1)),
        })
        .await
        .unwrap();

        let update = next_update(&mut rx).await;
        assert!(update.snapshot.is_empty());
        assert_eq!(update.snapshot.summary.average_recency, None);

        handle.abort();
    }

    #[tokio::test]
    async fn test_queued_requests_are_coalesced() {
        let (tx, mut rx, _handle) = DashboardOrchestrator::new(dataset(), 5, None).start();

        // Queue several requests before the task gets a chance to run.
        for id in 1..=3 {
            tx.send(RangeRequest {
                id,
                range: DateRange::single_day(d(2011, 1, 1)),
            })
            .await
            .unwrap();
        }
        drop(tx);

        let mut ids = Vec::new();
        while let Some(update) = rx.recv().await {
            ids.push(update.request_id);
        }

        // The newest request is always answered.
        assert_eq!(ids.last(), Some(&3));
        assert!(ids.len() <= 3);
    }

    #[tokio::test]
    async fn test_loop_exits_when_sender_dropped() {
        let (tx, mut rx, handle) = DashboardOrchestrator::new(dataset(), 5, None).start();
        drop(tx);

        let closed = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("loop did not exit");
        assert!(closed.is_none());
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(handle.is_finished());
    }

    #[tokio::test]
    async fn test_start_and_abort() {
        let (_tx, _rx, handle) = DashboardOrchestrator::new(dataset(), 5, None).start();
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.abort();
    }
}
