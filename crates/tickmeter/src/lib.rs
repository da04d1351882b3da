//! Top-level facade crate for tickmeter.
//!
//! Re-exports the core primitives and the runtime so users can depend on a single crate.

pub mod core {
    pub use tickmeter_core::*;
}

pub mod runtime {
    pub use tickmeter_runtime::*;
}

pub use tickmeter_runtime::{Backend, PushHandle, Registry, RegistryOption};
pub use tickmeter_core::{Counter, CounterVector, Gauge, GaugeVector, Labels, MetricsError, Opts};
