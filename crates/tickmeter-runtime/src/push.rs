//! Periodic push scheduler.
//!
//! One tokio task per active push. Each tick copies every pushable value into a
//! [`Snapshot`], diffs counters against the snapshot retained from the previous
//! flush, and hands the batch to the backend. No metric state is held while the
//! backend runs.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use tickmeter_core::error::MetricsError;
use tickmeter_core::{MetricSet, Snapshot};

use crate::backend::{Backend, Batch, FlushKind};

/// Failures buffered per push; beyond this they are only logged.
const FAILURE_QUEUE: usize = 64;

/// Push lifecycle. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PushState {
    Idle,
    Running,
    Stopped,
}

pub(crate) fn set_state(state: &Mutex<PushState>, next: PushState) {
    *state.lock().unwrap_or_else(|e| e.into_inner()) = next;
}

/// A batch the backend rejected.
#[derive(Debug)]
pub struct PushFailure {
    pub seq: u64,
    pub kind: FlushKind,
    pub error: MetricsError,
}

struct Scheduler {
    set: Arc<MetricSet>,
    backend: Arc<dyn Backend>,
    previous: Option<Snapshot>,
    seq: u64,
    failures: mpsc::Sender<PushFailure>,
    state: Arc<Mutex<PushState>>,
}

impl Scheduler {
    async fn run(mut self, period: Duration, mut shutdown: watch::Receiver<bool>) {
        // first tick after one full period
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                // Err means the handle was dropped; treat it as stop.
                _ = shutdown.changed() => break,
                _ = ticker.tick() => self.flush(FlushKind::Tick).await,
            }
        }

        self.flush(FlushKind::Final).await;
        tracing::info!(flushes = self.seq, "metrics push stopped");
    }

    async fn flush(&mut self, kind: FlushKind) {
        let current = Snapshot::capture(&self.set);
        self.seq += 1;
        let batch = Batch {
            seq: self.seq,
            kind,
            observations: current.observations(self.previous.as_ref()),
        };
        // Delta base is local state, independent of whether the backend accepts.
        self.previous = Some(current);

        match self.backend.report(&batch).await {
            Ok(()) => {
                tracing::debug!(
                    seq = batch.seq,
                    kind = ?kind,
                    count = batch.observations.len(),
                    "metrics pushed"
                );
            }
            Err(error) => {
                tracing::warn!(seq = batch.seq, kind = ?kind, %error, "metrics push failed");
                let failure = PushFailure {
                    seq: batch.seq,
                    kind,
                    error,
                };
                if let Err(mpsc::error::TrySendError::Full(_)) = self.failures.try_send(failure) {
                    tracing::warn!(seq = batch.seq, "push failure queue full; dropping report");
                }
            }
        }
    }
}

// Runs on normal exit and when the runtime drops the task mid-await, so the
// registry never stays `Running` without a live scheduler.
impl Drop for Scheduler {
    fn drop(&mut self) {
        set_state(&self.state, PushState::Stopped);
    }
}

/// Controls a running push. Dropping it stops the scheduler as `stop` would,
/// without waiting for it.
#[must_use = "dropping the handle stops the push"]
pub struct PushHandle {
    shutdown: watch::Sender<bool>,
    task: tokio::sync::Mutex<Option<JoinHandle<()>>>,
    failures: Mutex<Option<mpsc::Receiver<PushFailure>>>,
    state: Arc<Mutex<PushState>>,
}

impl PushHandle {
    pub(crate) fn spawn(
        rt: &tokio::runtime::Handle,
        set: Arc<MetricSet>,
        backend: Arc<dyn Backend>,
        period: Duration,
        state: Arc<Mutex<PushState>>,
    ) -> Self {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let (failures_tx, failures_rx) = mpsc::channel(FAILURE_QUEUE);

        let scheduler = Scheduler {
            set,
            backend,
            previous: None,
            seq: 0,
            failures: failures_tx,
            state: Arc::clone(&state),
        };
        let task = rt.spawn(scheduler.run(period, shutdown_rx));

        Self {
            shutdown,
            task: tokio::sync::Mutex::new(Some(task)),
            failures: Mutex::new(Some(failures_rx)),
            state,
        }
    }

    /// Stop pushing. Waits for an in-flight flush and the final flush.
    /// Idempotent: later calls return once the first has finished.
    pub async fn stop(&self) {
        let _ = self.shutdown.send(true);

        let mut task = self.task.lock().await;
        if let Some(handle) = task.take() {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "metrics push task ended abnormally");
            }
        }
        set_state(&self.state, PushState::Stopped);
    }

    /// Receiver for backend failures. Returns `None` after the first call.
    pub fn take_failures(&self) -> Option<mpsc::Receiver<PushFailure>> {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }

    pub fn is_stopped(&self) -> bool {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) == PushState::Stopped
    }
}
