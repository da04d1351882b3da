//! The registry: metric namespace, constant labels and push lifecycle.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tickmeter_core::error::{MetricsError, Result};
use tickmeter_core::{
    expose, Counter, CounterVector, Desc, Gauge, GaugeVector, Labels, MetricSet, Opts, Scalar,
};

use crate::backend::Backend;
use crate::push::{PushHandle, PushState};

/// Options accepted by [`Registry::new`].
#[derive(Debug, Clone)]
pub enum RegistryOption {
    /// Constant labels applied to every metric created afterwards.
    Labeled(Labels),
}

/// Explicit, cheaply clonable registry handle. There is no global instance;
/// pass it to whatever needs to declare or export metrics.
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

struct RegistryInner {
    set: Arc<MetricSet>,
    const_labels: Labels,
    push: Arc<Mutex<PushState>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new([])
    }
}

impl Registry {
    /// Build a registry. No background work starts until [`Registry::push`].
    /// Labels are validated when metrics are declared.
    pub fn new(options: impl IntoIterator<Item = RegistryOption>) -> Self {
        let mut const_labels = Labels::new();
        for opt in options {
            match opt {
                RegistryOption::Labeled(labels) => const_labels.extend(labels),
            }
        }

        Self {
            inner: Arc::new(RegistryInner {
                set: Arc::new(MetricSet::new()),
                const_labels,
                push: Arc::new(Mutex::new(PushState::Idle)),
            }),
        }
    }

    pub fn const_labels(&self) -> &Labels {
        &self.inner.const_labels
    }

    pub fn new_counter(&self, opts: Opts) -> Result<Counter> {
        self.scalar(opts)
    }

    pub fn new_gauge(&self, opts: Opts) -> Result<Gauge> {
        self.scalar(opts)
    }

    pub fn new_counter_vector(&self, opts: Opts) -> Result<CounterVector> {
        let desc = Desc::vector(&self.inner.const_labels, opts)?;
        tracing::debug!(
            name = %desc.name(),
            labels = ?desc.variable_labels(),
            "counter vector declared"
        );
        CounterVector::new(desc, Arc::clone(&self.inner.set))
    }

    pub fn new_gauge_vector(&self, opts: Opts) -> Result<GaugeVector> {
        let desc = Desc::vector(&self.inner.const_labels, opts)?;
        tracing::debug!(
            name = %desc.name(),
            labels = ?desc.variable_labels(),
            "gauge vector declared"
        );
        GaugeVector::new(desc, Arc::clone(&self.inner.set))
    }

    fn scalar<M: Scalar>(&self, opts: Opts) -> Result<M> {
        let desc = Desc::scalar(&self.inner.const_labels, opts)?;
        let metric = self.inner.set.register::<M>(&desc, desc.const_labels().clone())?;
        tracing::debug!(name = %desc.name(), kind = M::KIND.as_str(), "metric declared");
        Ok(metric)
    }

    /// Start pushing to `backend` every `interval`. Must be called from within
    /// a tokio runtime. A registry pushes at most once over its lifetime.
    pub fn push(&self, backend: Arc<dyn Backend>, interval: Duration) -> Result<PushHandle> {
        if interval.is_zero() {
            return Err(MetricsError::InvalidArgument(
                "push interval must be greater than zero".into(),
            ));
        }
        let rt = tokio::runtime::Handle::try_current()
            .map_err(|e| MetricsError::Runtime(format!("push needs a tokio runtime: {e}")))?;

        {
            let mut state = self.inner.push.lock().unwrap_or_else(|e| e.into_inner());
            match *state {
                PushState::Idle => *state = PushState::Running,
                PushState::Running => return Err(MetricsError::AlreadyStarted),
                PushState::Stopped => return Err(MetricsError::PushStopped),
            }
        }

        tracing::info!(interval_ms = interval.as_millis() as u64, "metrics push starting");
        Ok(PushHandle::spawn(
            &rt,
            Arc::clone(&self.inner.set),
            backend,
            interval,
            Arc::clone(&self.inner.push),
        ))
    }

    /// Current absolute values in Prometheus text format.
    pub fn export_text(&self) -> String {
        expose::render(&self.inner.set)
    }

    /// Number of registered series (vector members included).
    pub fn len(&self) -> usize {
        self.inner.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.set.is_empty()
    }
}
