//! Shared error type across tickmeter crates.

use thiserror::Error;

/// Stable error codes for programmatic checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed name, label or label value; wrong arity.
    Validation,
    /// Name or identity already registered with another kind.
    Duplicate,
    /// A push schedule is already running.
    AlreadyStarted,
    /// The push schedule already ran and was stopped.
    PushStopped,
    /// Argument outside the accepted domain.
    InvalidArgument,
    /// No async runtime available.
    Runtime,
    /// Backend rejected a batch.
    Backend,
    /// Configuration could not be loaded.
    Config,
}

impl ErrorKind {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::Duplicate => "DUPLICATE",
            ErrorKind::AlreadyStarted => "ALREADY_STARTED",
            ErrorKind::PushStopped => "PUSH_STOPPED",
            ErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ErrorKind::Runtime => "RUNTIME",
            ErrorKind::Backend => "BACKEND",
            ErrorKind::Config => "CONFIG",
        }
    }
}

/// Input rejected while declaring a metric or binding vector labels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid metric name {0:?}")]
    InvalidName(String),
    #[error("metric {0:?} has empty help text")]
    EmptyHelp(String),
    #[error("invalid label name {0:?}")]
    InvalidLabelName(String),
    #[error("invalid value {value:?} for label {label:?}")]
    InvalidLabelValue { label: String, value: String },
    #[error("label {0:?} is declared more than once")]
    LabelConflict(String),
    #[error("vector {0:?} declares no variable labels")]
    NoVariableLabels(String),
    #[error("scalar metric {0:?} cannot declare variable labels")]
    UnexpectedVariableLabels(String),
    #[error("expected {expected} label values, got {got}")]
    Arity { expected: usize, got: usize },
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Unified error type used by core and runtime.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),
    #[error("metric {name:?} already registered as a {existing}")]
    Duplicate { name: String, existing: &'static str },
    #[error("push already started")]
    AlreadyStarted,
    #[error("push was stopped and cannot be restarted")]
    PushStopped,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("runtime: {0}")]
    Runtime(String),
    #[error("backend: {0}")]
    Backend(String),
    #[error("config: {0}")]
    Config(String),
}

impl MetricsError {
    /// Map to a stable error code.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MetricsError::Validation(_) => ErrorKind::Validation,
            MetricsError::Duplicate { .. } => ErrorKind::Duplicate,
            MetricsError::AlreadyStarted => ErrorKind::AlreadyStarted,
            MetricsError::PushStopped => ErrorKind::PushStopped,
            MetricsError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            MetricsError::Runtime(_) => ErrorKind::Runtime,
            MetricsError::Backend(_) => ErrorKind::Backend,
            MetricsError::Config(_) => ErrorKind::Config,
        }
    }
}
