//! Scalar metrics: an atomic `i64` plus its resolved identity.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::error::{MetricsError, Result};
use crate::labels::Labels;

/// Metric kind as reported to backends and in `# TYPE` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Counter,
    Gauge,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Counter => "counter",
            Kind::Gauge => "gauge",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name plus fully-resolved label set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Identity {
    pub name: String,
    pub labels: Labels,
}

impl Identity {
    pub fn new(name: impl Into<String>, labels: Labels) -> Self {
        Self {
            name: name.into(),
            labels,
        }
    }
}

struct Cell {
    identity: Identity,
    value: AtomicI64,
}

impl Cell {
    fn new(identity: Identity) -> Arc<Self> {
        Arc::new(Self {
            identity,
            value: AtomicI64::new(0),
        })
    }
}

/// Monotonically non-decreasing counter.
#[derive(Clone)]
pub struct Counter {
    cell: Arc<Cell>,
}

impl Counter {
    /// Increment by 1.
    pub fn inc(&self) {
        self.bump(1);
    }

    /// Increment by `n`; negative deltas are rejected. Saturates at
    /// `i64::MAX` so the value never goes backwards.
    pub fn add(&self, n: i64) -> Result<()> {
        if n < 0 {
            return Err(MetricsError::InvalidArgument(format!(
                "counter {} cannot be decremented (add {n})",
                self.cell.identity.name
            )));
        }
        self.bump(n);
        Ok(())
    }

    fn bump(&self, n: i64) {
        // closure always returns Some, so the update cannot fail
        let _ = self
            .cell
            .value
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| Some(v.saturating_add(n)));
    }

    pub fn load(&self) -> i64 {
        self.cell.value.load(Ordering::Relaxed)
    }

    pub fn identity(&self) -> &Identity {
        &self.cell.identity
    }

    /// True when both handles refer to the same underlying series.
    pub fn same_instance(&self, other: &Counter) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

/// Arbitrary up/down value.
#[derive(Clone)]
pub struct Gauge {
    cell: Arc<Cell>,
}

impl Gauge {
    /// Increment by 1.
    pub fn inc(&self) {
        self.add(1);
    }
    /// Decrement by 1.
    pub fn dec(&self) {
        self.add(-1);
    }

    /// Add an arbitrary signed delta.
    pub fn add(&self, n: i64) {
        self.cell.value.fetch_add(n, Ordering::Relaxed);
    }

    /// Overwrite the value; last store wins.
    pub fn store(&self, n: i64) {
        self.cell.value.store(n, Ordering::Relaxed);
    }

    pub fn load(&self) -> i64 {
        self.cell.value.load(Ordering::Relaxed)
    }

    pub fn identity(&self) -> &Identity {
        &self.cell.identity
    }

    pub fn same_instance(&self, other: &Gauge) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

impl fmt::Debug for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Counter")
            .field("identity", self.identity())
            .field("value", &self.load())
            .finish()
    }
}

impl fmt::Debug for Gauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gauge")
            .field("identity", self.identity())
            .field("value", &self.load())
            .finish()
    }
}

/// A registered series of either kind, as stored in the metric set.
#[derive(Clone, Debug)]
pub enum Instrument {
    Counter(Counter),
    Gauge(Gauge),
}

impl Instrument {
    pub fn kind(&self) -> Kind {
        match self {
            Instrument::Counter(_) => Kind::Counter,
            Instrument::Gauge(_) => Kind::Gauge,
        }
    }

    /// Single atomic read.
    pub fn load(&self) -> i64 {
        match self {
            Instrument::Counter(c) => c.load(),
            Instrument::Gauge(g) => g.load(),
        }
    }
}

/// Implemented by Counter and Gauge so vectors and the metric set can be
/// generic over the scalar they hold.
pub trait Scalar: Clone + Send + Sync + 'static {
    const KIND: Kind;

    fn create(identity: Identity) -> Self;
    fn to_instrument(&self) -> Instrument;
    fn from_instrument(instrument: &Instrument) -> Option<Self>;
}

impl Scalar for Counter {
    const KIND: Kind = Kind::Counter;

    fn create(identity: Identity) -> Self {
        Counter {
            cell: Cell::new(identity),
        }
    }

    fn to_instrument(&self) -> Instrument {
        Instrument::Counter(self.clone())
    }

    fn from_instrument(instrument: &Instrument) -> Option<Self> {
        match instrument {
            Instrument::Counter(c) => Some(c.clone()),
            Instrument::Gauge(_) => None,
        }
    }
}

impl Scalar for Gauge {
    const KIND: Kind = Kind::Gauge;

    fn create(identity: Identity) -> Self {
        Gauge {
            cell: Cell::new(identity),
        }
    }

    fn to_instrument(&self) -> Instrument {
        Instrument::Gauge(self.clone())
    }

    fn from_instrument(instrument: &Instrument) -> Option<Self> {
        match instrument {
            Instrument::Gauge(g) => Some(g.clone()),
            Instrument::Counter(_) => None,
        }
    }
}
