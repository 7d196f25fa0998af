//! Error types for the series-assembly pipeline.
//!
//! Whole-input failures (no records, a record without `_t`, a bad window)
//! abort a pipeline call. Per-variable failures are isolated by the
//! render plan builder and reported next to the plans that did succeed.

use crate::models::Timestamp;

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Error type for pipeline operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    /// No records were supplied, or an empty series reached a summarizer.
    #[error("Empty input: {what}")]
    EmptyInput { what: String },

    /// A record carries no `_t` field.
    #[error("Record {index} has no timestamp")]
    MissingTimestamp { index: usize },

    /// A record carries a `_t` field that is not an integer timestamp.
    #[error("Record {index} has an invalid timestamp: {value}")]
    InvalidTimestamp { index: usize, value: String },

    /// The time window is inverted.
    #[error("Invalid window: tmin {tmin} is after tmax {tmax}")]
    InvalidWindow { tmin: Timestamp, tmax: Timestamp },

    /// The gap threshold is negative.
    #[error("Invalid maxgap: {maxgap} must not be negative")]
    InvalidMaxGap { maxgap: i64 },

    /// The significant digit count is outside the supported range.
    #[error("Invalid precision {precision} for {code}: must be between 1 and {max}")]
    InvalidPrecision { code: String, precision: u32, max: u32 },

    /// The variable code is not in the catalog.
    #[error("Unknown variable: {code}")]
    UnknownVariable { code: String },

    /// The input payload does not have the `{d: [...]}` shape.
    #[error("Payload error: {0}")]
    Payload(String),

    /// A catalog file could not be read or parsed.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// A configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Create an empty input error.
    pub fn empty_input(what: impl Into<String>) -> Self {
        Self::EmptyInput { what: what.into() }
    }

    /// Create an unknown variable error.
    pub fn unknown_variable(code: impl Into<String>) -> Self {
        Self::UnknownVariable { code: code.into() }
    }

    /// Stable machine-readable code, used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput { .. } => "EMPTY_INPUT",
            Self::MissingTimestamp { .. } => "MISSING_TIMESTAMP",
            Self::InvalidTimestamp { .. } => "INVALID_TIMESTAMP",
            Self::InvalidWindow { .. } => "INVALID_WINDOW",
            Self::InvalidMaxGap { .. } => "INVALID_MAXGAP",
            Self::InvalidPrecision { .. } => "INVALID_PRECISION",
            Self::UnknownVariable { .. } => "UNKNOWN_VARIABLE",
            Self::Payload(_) => "INVALID_PAYLOAD",
            Self::Catalog(_) => "CATALOG_ERROR",
            Self::Config(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Whether the error comes from the caller's input rather than from
    /// server-side catalog or configuration state.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Self::Catalog(_) | Self::Config(_))
    }
}
