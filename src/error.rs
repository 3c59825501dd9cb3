//! Error taxonomy of the report generator.

use thiserror::Error;

/// Errors raised while loading, summarizing or tabulating sensor readings.
///
/// All of them are fatal: the tool reports the message on a single line and exits.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    /// The series has no samples.
    #[error("empty input: the series has no samples")]
    EmptyInput,

    /// A sample is not a finite number.
    #[error("type mismatch: element {index} is not a finite number ({value})")]
    TypeMismatch { index: usize, value: f64 },

    /// The window scale maps to less than one sample.
    #[error("invalid scale: scale {scale} with sampling interval {interval} gives no samples per window")]
    InvalidScale { scale: f64, interval: f64 },

    /// The input document does not have the expected structure.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Two quantities do not share the same metric names.
    #[error("inconsistent metric set: {first:?} has {first_names:?}, but {other:?} has {other_names:?}")]
    InconsistentMetricSet {
        first: String,
        first_names: Vec<String>,
        other: String,
        other_names: Vec<String>,
    },

    /// The command line was used incorrectly.
    #[error("usage error: {0}")]
    Usage(String),
}
