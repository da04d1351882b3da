//! Point-in-time copies of the metric set, and the delta math used for push.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::metric::{Identity, Kind};
use crate::set::MetricSet;

/// One value reported to a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    pub identity: Identity,
    pub kind: Kind,
    pub value: i64,
}

/// Immutable copy of every pushable series' absolute value.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    values: BTreeMap<Identity, (Kind, i64)>,
}

impl Snapshot {
    /// One atomic load per series; no series is held while others are read.
    /// Series declared with `disable_push` are left out.
    pub fn capture(set: &MetricSet) -> Self {
        let mut values = BTreeMap::new();
        set.for_each(|identity, instrument, push| {
            if push {
                values.insert(identity.clone(), (instrument.kind(), instrument.load()));
            }
        });
        Self { values }
    }

    pub fn get(&self, identity: &Identity) -> Option<i64> {
        self.values.get(identity).map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Observations for this snapshot: counters as deltas against `previous`
    /// (full value when absent, clamped at 0), gauges as absolute values.
    pub fn observations(&self, previous: Option<&Snapshot>) -> Vec<Observation> {
        self.values
            .iter()
            .map(|(identity, &(kind, current))| {
                let value = match kind {
                    Kind::Gauge => current,
                    Kind::Counter => {
                        let before = previous.and_then(|p| p.get(identity)).unwrap_or(0);
                        let delta = current.saturating_sub(before);
                        if delta < 0 {
                            tracing::debug!(
                                name = %identity.name,
                                current,
                                before,
                                "counter went backwards; reporting 0"
                            );
                            0
                        } else {
                            delta
                        }
                    }
                };
                Observation {
                    identity: identity.clone(),
                    kind,
                    value,
                }
            })
            .collect()
    }
}
