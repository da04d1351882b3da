//! tickmeter runtime library entry.
//!
//! Wires the core metric primitives into a [`Registry`] with a periodic push
//! scheduler, pluggable backends, YAML config loading and the `/metrics` HTTP
//! surface. Consumed by the `tickmeter-agent` binary and by embedding services.

pub mod backend;
pub mod config;
pub mod ops;
pub mod push;
pub mod registry;

pub use backend::{Backend, Batch, FlushKind, LogBackend, MemoryBackend};
pub use push::{PushFailure, PushHandle};
pub use registry::{Registry, RegistryOption};
