//! Vectors: lazily populated families of scalars keyed by variable label values.

use std::sync::Arc;

use dashmap::DashMap;

use crate::error::Result;
use crate::metric::{Counter, Gauge, Scalar};
use crate::opts::Desc;
use crate::set::MetricSet;

/// A family of `M` sharing name and const labels.
///
/// The member map's entry lock is the single-flight guard: the first caller
/// for a tuple creates and registers the scalar while holding it, so racing
/// callers observe either nothing or the finished instance.
pub struct Vector<M: Scalar> {
    desc: Arc<Desc>,
    set: Arc<MetricSet>,
    members: DashMap<Vec<String>, M>,
}

pub type CounterVector = Vector<Counter>;
pub type GaugeVector = Vector<Gauge>;

impl<M: Scalar> Vector<M> {
    /// Claims the family name in `set`; members are created on first `get`.
    pub fn new(desc: Desc, set: Arc<MetricSet>) -> Result<Self> {
        set.claim_family(&desc, M::KIND)?;
        Ok(Self {
            desc: Arc::new(desc),
            set,
            members: DashMap::new(),
        })
    }

    /// Resolve the scalar bound to `values`, creating it on first use.
    pub fn get(&self, values: &[&str]) -> Result<M> {
        let key: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        if let Some(m) = self.members.get(&key) {
            return Ok(m.value().clone());
        }

        let labels = self.desc.bind(values)?;
        let member = self
            .members
            .entry(key)
            .or_try_insert_with(|| self.set.register::<M>(&self.desc, labels))?;
        Ok(member.value().clone())
    }

    /// Like [`Vector::get`], for label values known to be valid up front.
    ///
    /// # Panics
    /// Panics on wrong arity or an invalid label value.
    #[allow(clippy::panic)]
    pub fn must_get(&self, values: &[&str]) -> M {
        match self.get(values) {
            Ok(m) => m,
            Err(e) => panic!("{}: {e}", self.desc.name()),
        }
    }

    pub fn desc(&self) -> &Desc {
        &self.desc
    }

    /// Number of bound tuples.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
