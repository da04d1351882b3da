//! Prometheus text exposition rendering.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::labels::{escape_help, write_label_block, Labels};
use crate::set::MetricSet;

/// Render every series as absolute values, grouped per metric name.
///
/// Names are sorted, and so are the instances under each name, so two
/// renders of an unchanged set are byte-identical.
pub fn render(set: &MetricSet) -> String {
    let mut by_name: BTreeMap<String, BTreeMap<Labels, i64>> = BTreeMap::new();
    set.for_each(|identity, instrument, _| {
        by_name
            .entry(identity.name.clone())
            .or_default()
            .insert(identity.labels.clone(), instrument.load());
    });

    let mut out = String::new();
    for (name, series) in &by_name {
        let Some((kind, help)) = set.family(name) else {
            continue;
        };
        let _ = writeln!(out, "# HELP {} {}", name, escape_help(&help));
        let _ = writeln!(out, "# TYPE {} {}", name, kind);
        for (labels, value) in series {
            out.push_str(name);
            write_label_block(&mut out, labels);
            let _ = writeln!(out, " {}", value);
        }
    }
    out
}
