//! The metric set: every registered series keyed by identity.
//!
//! Two `DashMap`s back it. `families` reserves a metric name for one kind and
//! carries the help text; `instruments` holds the series themselves. A guard
//! on one map is never held while the other is locked.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::{MetricsError, Result};
use crate::labels::Labels;
use crate::metric::{Identity, Instrument, Kind, Scalar};
use crate::opts::Desc;

struct Family {
    kind: Kind,
    help: String,
}

struct Slot {
    instrument: Instrument,
    push: bool,
}

#[derive(Default)]
pub struct MetricSet {
    families: DashMap<String, Family>,
    instruments: DashMap<Identity, Slot>,
}

impl MetricSet {
    pub fn new() -> Self {
        Self {
            families: DashMap::new(),
            instruments: DashMap::new(),
        }
    }

    /// Reserve `desc`'s name for `kind`. Re-claiming with the same kind is a no-op.
    pub fn claim_family(&self, desc: &Desc, kind: Kind) -> Result<()> {
        let family = self
            .families
            .entry(desc.name().to_string())
            .or_insert_with(|| Family {
                kind,
                help: desc.help().to_string(),
            });
        if family.kind != kind {
            return Err(MetricsError::Duplicate {
                name: desc.name().to_string(),
                existing: family.kind.as_str(),
            });
        }
        Ok(())
    }

    /// Create the series for `labels`, or return the one already registered
    /// under the same identity.
    pub fn register<M: Scalar>(&self, desc: &Desc, labels: Labels) -> Result<M> {
        self.claim_family(desc, M::KIND)?;

        match self.instruments.entry(Identity::new(desc.name(), labels)) {
            Entry::Occupied(e) => {
                let existing = &e.get().instrument;
                M::from_instrument(existing).ok_or_else(|| MetricsError::Duplicate {
                    name: desc.name().to_string(),
                    existing: existing.kind().as_str(),
                })
            }
            Entry::Vacant(e) => {
                let metric = M::create(e.key().clone());
                e.insert(Slot {
                    instrument: metric.to_instrument(),
                    push: desc.push_enabled(),
                });
                Ok(metric)
            }
        }
    }

    /// Visit every series. `f` receives the push flag alongside the instrument.
    pub fn for_each(&self, mut f: impl FnMut(&Identity, &Instrument, bool)) {
        for r in self.instruments.iter() {
            f(r.key(), &r.value().instrument, r.value().push);
        }
    }

    /// Help text and kind for a metric name.
    pub fn family(&self, name: &str) -> Option<(Kind, String)> {
        self.families
            .get(name)
            .map(|f| (f.kind, f.help.clone()))
    }

    /// Number of registered series.
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::labels::labels;
    use crate::metric::{Counter, Gauge};
    use crate::opts::Opts;

    #[test]
    fn same_identity_same_kind_returns_existing() {
        let set = MetricSet::new();
        let d = Desc::scalar(&Labels::new(), Opts::new("hits", "Hits.")).unwrap();
        let a: Counter = set.register(&d, Labels::new()).unwrap();
        let b: Counter = set.register(&d, Labels::new()).unwrap();
        a.inc();
        assert!(a.same_instance(&b));
        assert_eq!(b.load(), 1);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn kind_collision_is_duplicate() {
        let set = MetricSet::new();
        let d = Desc::scalar(&Labels::new(), Opts::new("hits", "Hits.")).unwrap();
        let _: Counter = set.register(&d, labels([("a", "b")])).unwrap();

        let err = set.register::<Gauge>(&d, Labels::new()).unwrap_err();
        match err {
            MetricsError::Duplicate { name, existing } => {
                assert_eq!(name, "hits");
                assert_eq!(existing, "counter");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
