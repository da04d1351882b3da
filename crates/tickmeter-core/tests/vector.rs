//! Vector binding, single-creation and validation.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::{Arc, Barrier, Mutex};
use std::thread;

use tickmeter_core::{
    labels, CounterVector, Desc, ErrorKind, GaugeVector, Labels, MetricSet, MetricsError, Opts,
    ValidationError,
};

fn gauge_vector(set: &Arc<MetricSet>) -> GaugeVector {
    let d = Desc::vector(
        &labels([("service", "users")]),
        Opts::new("test_gauge", "Some help.")
            .const_label("foo", "bar")
            .variable_labels(["baz"]),
    )
    .unwrap();
    GaugeVector::new(d, Arc::clone(set)).unwrap()
}

#[test]
fn get_binds_identity_and_reuses_instance() {
    let set = Arc::new(MetricSet::new());
    let vec = gauge_vector(&set);

    let g = vec.get(&["a"]).unwrap();
    assert_eq!(g.identity().name, "test_gauge");
    assert_eq!(
        g.identity().labels,
        labels([("baz", "a"), ("foo", "bar"), ("service", "users")])
    );

    g.store(11);
    vec.must_get(&["a"]).add(2);
    vec.must_get(&["a"]).inc();
    assert_eq!(g.load(), 14);
    assert!(g.same_instance(&vec.get(&["a"]).unwrap()));

    let other = vec.get(&["b"]).unwrap();
    assert!(!g.same_instance(&other));
    assert_eq!(vec.len(), 2);
    assert_eq!(set.len(), 2);
}

#[test]
fn concurrent_first_access_creates_one_instance() {
    let set = Arc::new(MetricSet::new());
    let opts = Opts::new("hits", "Hits.").variable_labels(["route"]);
    let d = Desc::vector(&Labels::new(), opts).unwrap();
    let vec = CounterVector::new(d, Arc::clone(&set)).unwrap();

    let barrier = Barrier::new(100);
    let seen = Mutex::new(Vec::new());
    thread::scope(|s| {
        for _ in 0..100 {
            s.spawn(|| {
                barrier.wait();
                let c = vec.get(&["/users"]).unwrap();
                c.inc();
                seen.lock().unwrap().push(c);
            });
        }
    });

    let seen = seen.into_inner().unwrap();
    assert_eq!(seen.len(), 100);
    assert!(seen.iter().all(|c| c.same_instance(&seen[0])));
    assert_eq!(seen[0].load(), 100);
    assert_eq!(vec.len(), 1);
    assert_eq!(set.len(), 1);
}

#[test]
fn invalid_label_values_are_rejected() {
    let set = Arc::new(MetricSet::new());
    let opts = Opts::new("test_counter", "Some help.").variable_labels(["foo"]);
    let d = Desc::vector(&Labels::new(), opts).unwrap();
    let vec = GaugeVector::new(d, set).unwrap();

    match vec.get(&["foo:"]) {
        Err(MetricsError::Validation(ValidationError::InvalidLabelValue { label, value })) => {
            assert_eq!(label, "foo");
            assert_eq!(value, "foo:");
        }
        other => panic!("expected invalid label value, got {other:?}"),
    }

    let err = vec.get(&["bar", "baz"]).expect_err("too many values");
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(matches!(
        err,
        MetricsError::Validation(ValidationError::Arity { expected: 1, got: 2 })
    ));

    assert!(vec.get(&[]).is_err());
    assert!(vec.get(&[""]).is_err());
    assert!(vec.is_empty());
}

#[test]
#[should_panic]
fn must_get_panics_on_invalid_value() {
    let set = Arc::new(MetricSet::new());
    let d = Desc::vector(&Labels::new(), Opts::new("v", "h").variable_labels(["foo"])).unwrap();
    let vec = GaugeVector::new(d, set).unwrap();
    vec.must_get(&["foo:"]);
}

#[test]
#[should_panic]
fn must_get_panics_on_wrong_arity() {
    let set = Arc::new(MetricSet::new());
    let d = Desc::vector(&Labels::new(), Opts::new("v", "h").variable_labels(["foo"])).unwrap();
    let vec = GaugeVector::new(d, set).unwrap();
    vec.must_get(&["bar", "baz"]);
}

#[test]
fn vector_name_reserved_for_its_kind() {
    let set = Arc::new(MetricSet::new());
    let d = Desc::vector(&Labels::new(), Opts::new("v", "h").variable_labels(["foo"])).unwrap();
    let _counters = CounterVector::new(d.clone(), Arc::clone(&set)).unwrap();

    let err = GaugeVector::new(d, set).err().expect("kind collision");
    assert_eq!(err.kind(), ErrorKind::Duplicate);
}
