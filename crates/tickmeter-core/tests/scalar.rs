//! Counter and gauge behaviour under concurrent mutation.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::thread;

use tickmeter_core::{Counter, Desc, ErrorKind, Gauge, Labels, MetricSet, Opts};

fn counter(set: &MetricSet, name: &str) -> Counter {
    let d = Desc::scalar(&Labels::new(), Opts::new(name, "help")).unwrap();
    set.register(&d, Labels::new()).unwrap()
}

fn gauge(set: &MetricSet, name: &str) -> Gauge {
    let d = Desc::scalar(&Labels::new(), Opts::new(name, "help")).unwrap();
    set.register(&d, Labels::new()).unwrap()
}

#[test]
fn fresh_metrics_load_zero() {
    let set = MetricSet::new();
    assert_eq!(counter(&set, "c").load(), 0);
    assert_eq!(gauge(&set, "g").load(), 0);
}

#[test]
fn concurrent_adds_are_not_lost() {
    let set = MetricSet::new();
    let c = counter(&set, "requests_total");

    thread::scope(|s| {
        for t in 0..8i64 {
            let c = c.clone();
            s.spawn(move || {
                for i in 0..1000i64 {
                    c.add(i % 3 + t).unwrap();
                    c.inc();
                }
            });
        }
    });

    let per_thread = |t: i64| (0..1000i64).map(|i| i % 3 + t + 1).sum::<i64>();
    let expected: i64 = (0..8).map(per_thread).sum();
    assert_eq!(c.load(), expected);
}

#[test]
fn counter_rejects_negative_add() {
    let set = MetricSet::new();
    let c = counter(&set, "c");
    c.add(2).unwrap();

    let err = c.add(-1).expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(c.load(), 2);
}

#[test]
fn gauge_store_wins_over_earlier_adds() {
    let set = MetricSet::new();
    let g = Arc::new(gauge(&set, "in_flight"));

    thread::scope(|s| {
        for _ in 0..4 {
            let g = Arc::clone(&g);
            s.spawn(move || {
                for _ in 0..500 {
                    g.inc();
                    g.add(3);
                    g.dec();
                }
            });
        }
    });
    assert_eq!(g.load(), 4 * 500 * 3);

    g.store(42);
    assert_eq!(g.load(), 42);
    g.add(-50);
    assert_eq!(g.load(), -8);
}

#[test]
fn counter_saturates_instead_of_wrapping() {
    let set = MetricSet::new();
    let c = counter(&set, "bytes_total");

    c.add(i64::MAX - 1).unwrap();
    c.inc();
    assert_eq!(c.load(), i64::MAX);
    c.inc();
    c.add(10).unwrap();
    assert_eq!(c.load(), i64::MAX);
}
