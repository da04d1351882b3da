//! tickmeter core: runtime-free metric primitives.
//!
//! Counters, gauges, their label-keyed vectors, the shared metric set, the
//! snapshot/delta math used for push, and Prometheus text rendering. Nothing
//! here spawns tasks or touches I/O, so the scheduler and HTTP surface live
//! in `tickmeter-runtime`.
//!
//! # Defensive guarantees
//! `unwrap`, `expect` and `panic!` are compile-denied here. The one deliberate
//! panic is [`vector::Vector::must_get`], which is documented as such.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod expose;
pub mod labels;
pub mod metric;
pub mod opts;
pub mod set;
pub mod snapshot;
pub mod vector;

pub use error::{ErrorKind, MetricsError, Result, ValidationError};
pub use labels::{labels, Labels};
pub use metric::{Counter, Gauge, Identity, Instrument, Kind, Scalar};
pub use opts::{Desc, Opts};
pub use set::MetricSet;
pub use snapshot::{Observation, Snapshot};
pub use vector::{CounterVector, GaugeVector, Vector};
