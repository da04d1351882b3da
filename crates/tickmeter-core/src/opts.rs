//! Metric options and their validated form.

use std::collections::HashSet;

use crate::error::{Result, ValidationError};
use crate::labels::{is_valid_label_value, is_valid_name, Labels};

/// Options supplied when declaring a metric.
#[derive(Debug, Clone, Default)]
pub struct Opts {
    pub name: String,
    pub help: String,
    /// Fixed labels baked into every instance.
    pub const_labels: Labels,
    /// Label names bound per instance; vectors only.
    pub variable_labels: Vec<String>,
    /// Export in text only; never include in push batches.
    pub disable_push: bool,
}

impl Opts {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            ..Self::default()
        }
    }

    pub fn const_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.const_labels.insert(name.into(), value.into());
        self
    }

    pub fn variable_labels<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variable_labels = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn disable_push(mut self) -> Self {
        self.disable_push = true;
        self
    }
}

/// Validated descriptor: registry labels merged into the metric's own.
#[derive(Debug, Clone)]
pub struct Desc {
    name: String,
    help: String,
    const_labels: Labels,
    variable_labels: Vec<String>,
    push: bool,
}

impl Desc {
    /// Validate options for a Counter or Gauge.
    pub fn scalar(registry_labels: &Labels, opts: Opts) -> Result<Self> {
        if !opts.variable_labels.is_empty() {
            return Err(ValidationError::UnexpectedVariableLabels(opts.name).into());
        }
        Self::build(registry_labels, opts)
    }

    /// Validate options for a CounterVector or GaugeVector.
    pub fn vector(registry_labels: &Labels, opts: Opts) -> Result<Self> {
        if opts.variable_labels.is_empty() {
            return Err(ValidationError::NoVariableLabels(opts.name).into());
        }
        Self::build(registry_labels, opts)
    }

    fn build(registry_labels: &Labels, opts: Opts) -> Result<Self> {
        if !is_valid_name(&opts.name) {
            return Err(ValidationError::InvalidName(opts.name).into());
        }
        if opts.help.trim().is_empty() {
            return Err(ValidationError::EmptyHelp(opts.name).into());
        }

        let mut const_labels = Labels::new();
        for (k, v) in registry_labels.iter().chain(opts.const_labels.iter()) {
            if !is_valid_name(k) {
                return Err(ValidationError::InvalidLabelName(k.clone()).into());
            }
            if !is_valid_label_value(v) {
                return Err(ValidationError::InvalidLabelValue {
                    label: k.clone(),
                    value: v.clone(),
                }
                .into());
            }
            if const_labels.insert(k.clone(), v.clone()).is_some() {
                return Err(ValidationError::LabelConflict(k.clone()).into());
            }
        }

        let mut seen = HashSet::new();
        for l in &opts.variable_labels {
            if !is_valid_name(l) {
                return Err(ValidationError::InvalidLabelName(l.clone()).into());
            }
            if const_labels.contains_key(l) || !seen.insert(l.as_str()) {
                return Err(ValidationError::LabelConflict(l.clone()).into());
            }
        }

        Ok(Self {
            name: opts.name,
            help: opts.help,
            const_labels,
            variable_labels: opts.variable_labels,
            push: !opts.disable_push,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn help(&self) -> &str {
        &self.help
    }
    /// Registry and metric constant labels, merged.
    pub fn const_labels(&self) -> &Labels {
        &self.const_labels
    }
    pub fn variable_labels(&self) -> &[String] {
        &self.variable_labels
    }
    pub fn push_enabled(&self) -> bool {
        self.push
    }

    /// Resolve the full label set for one tuple of variable values.
    pub(crate) fn bind(&self, values: &[&str]) -> std::result::Result<Labels, ValidationError> {
        if values.len() != self.variable_labels.len() {
            return Err(ValidationError::Arity {
                expected: self.variable_labels.len(),
                got: values.len(),
            });
        }
        let mut resolved = self.const_labels.clone();
        for (label, value) in self.variable_labels.iter().zip(values) {
            if !is_valid_label_value(value) {
                return Err(ValidationError::InvalidLabelValue {
                    label: label.clone(),
                    value: value.to_string(),
                });
            }
            resolved.insert(label.clone(), value.to_string());
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::error::MetricsError;
    use crate::labels::labels;

    fn validation(r: Result<Desc>) -> ValidationError {
        match r {
            Err(MetricsError::Validation(v)) => v,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn merges_registry_labels() {
        let reg = labels([("service", "users")]);
        let opts = Opts::new("test_gauge", "Some help.").const_label("foo", "bar");
        let d = Desc::scalar(&reg, opts).unwrap();
        assert_eq!(d.const_labels(), &labels([("foo", "bar"), ("service", "users")]));
        assert!(d.push_enabled());
    }

    #[test]
    fn rejects_malformed_opts() {
        let none = Labels::new();
        assert_eq!(
            validation(Desc::scalar(&none, Opts::new("bad-name", "h"))),
            ValidationError::InvalidName("bad-name".into())
        );
        assert_eq!(
            validation(Desc::scalar(&none, Opts::new("ok", " "))),
            ValidationError::EmptyHelp("ok".into())
        );
        assert!(matches!(
            validation(Desc::scalar(&none, Opts::new("ok", "h").const_label("x", "a b"))),
            ValidationError::InvalidLabelValue { .. }
        ));
        assert_eq!(
            validation(Desc::scalar(&none, Opts::new("ok", "h").variable_labels(["x"]))),
            ValidationError::UnexpectedVariableLabels("ok".into())
        );
    }

    #[test]
    fn label_conflicts() {
        let reg = labels([("service", "users")]);
        assert_eq!(
            validation(Desc::scalar(&reg, Opts::new("ok", "h").const_label("service", "other"))),
            ValidationError::LabelConflict("service".into())
        );
        assert_eq!(
            validation(Desc::vector(&reg, Opts::new("ok", "h").variable_labels(["service"]))),
            ValidationError::LabelConflict("service".into())
        );
        assert_eq!(
            validation(Desc::vector(&reg, Opts::new("ok", "h").variable_labels(["a", "a"]))),
            ValidationError::LabelConflict("a".into())
        );
        assert_eq!(
            validation(Desc::vector(&reg, Opts::new("ok", "h"))),
            ValidationError::NoVariableLabels("ok".into())
        );
    }

    #[test]
    fn bind_checks_arity_and_values() {
        let d = Desc::vector(&Labels::new(), Opts::new("v", "h").variable_labels(["baz"])).unwrap();
        assert_eq!(d.bind(&["a"]).unwrap(), labels([("baz", "a")]));
        assert_eq!(d.bind(&["a", "b"]), Err(ValidationError::Arity { expected: 1, got: 2 }));
        assert!(matches!(d.bind(&["foo:"]), Err(ValidationError::InvalidLabelValue { .. })));
    }
}
