//! Push backends: where each tick's batch of observations goes.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;

use tickmeter_core::error::{MetricsError, Result};
use tickmeter_core::{Identity, Observation};

/// Why a batch was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlushKind {
    /// Regular scheduled tick.
    Tick,
    /// Last batch submitted while the scheduler shuts down.
    Final,
}

/// Observations for one flush.
#[derive(Debug, Clone, Serialize)]
pub struct Batch {
    /// 1-based; ticks and the final flush share the sequence.
    pub seq: u64,
    pub kind: FlushKind,
    pub observations: Vec<Observation>,
}

impl Batch {
    pub fn value_of(&self, identity: &Identity) -> Option<i64> {
        self.observations
            .iter()
            .find(|o| &o.identity == identity)
            .map(|o| o.value)
    }
}

/// External reporting backend. One call per batch; failures are not retried.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn report(&self, batch: &Batch) -> Result<()>;
}

/// Keeps every batch in memory. Useful for embedding and tests.
#[derive(Default)]
pub struct MemoryBackend {
    batches: Mutex<Vec<Batch>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches(&self) -> Vec<Batch> {
        self.batches
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of scheduled ticks received (final flushes excluded).
    pub fn ticks(&self) -> usize {
        self.batches
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|b| b.kind == FlushKind::Tick)
            .count()
    }

    /// Value from the most recent batch that carried `identity`.
    pub fn last_value(&self, identity: &Identity) -> Option<i64> {
        self.batches
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .rev()
            .find_map(|b| b.value_of(identity))
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn report(&self, batch: &Batch) -> Result<()> {
        self.batches
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(batch.clone());
        Ok(())
    }
}

/// Emits each batch as one structured `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogBackend;

#[async_trait]
impl Backend for LogBackend {
    async fn report(&self, batch: &Batch) -> Result<()> {
        let body = serde_json::to_string(&batch.observations)
            .map_err(|e| MetricsError::Backend(format!("encode batch failed: {e}")))?;
        tracing::info!(
            target: "tickmeter::push",
            seq = batch.seq,
            kind = ?batch.kind,
            count = batch.observations.len(),
            observations = %body,
            "metrics batch"
        );
        Ok(())
    }
}
