//! # Error Hierarchy
//!
//! Structured error types for the codec stack, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Analysis paths never surface these as faults: a malformed identifier
//! becomes a `valid = false` result carrying a [`FormatFailure`]. The
//! generator records per-item errors instead of aborting the batch.
//!
//! [`FormatFailure`]: crate::identity::FormatFailure

use thiserror::Error;

/// Top-level error type for the codec stack.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CccdError {
    /// Input to the checksum codec is not the expected run of ASCII digits.
    #[error("malformed input: {reason}")]
    MalformedInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// Requested era (or the era derived from a birth year) is outside
    /// the era/sex table.
    #[error("unsupported era {era} (supported eras 20-24, birth years 1900-2399)")]
    UnsupportedEra {
        /// The offending era value.
        era: i32,
    },

    /// A requested count exceeded its configured ceiling. Callers record
    /// this and proceed with the capped value.
    #[error("{operation}: requested {requested} exceeds limit {limit}")]
    LimitExceeded {
        /// The operation whose ceiling was breached.
        operation: String,
        /// The count the caller asked for.
        requested: usize,
        /// The configured ceiling.
        limit: usize,
    },

    /// A freshly generated identifier failed its own checksum. Indicates a
    /// defect in the codec, never bad user data.
    #[error("internal consistency alarm: generated identifier {identifier} fails verification")]
    InternalConsistencyAlarm {
        /// The identifier that failed re-verification.
        identifier: String,
    },

    /// Domain primitive validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CccdError {
    /// Stable snake_case code for machine-readable error records.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedInput { .. } => "malformed_input",
            Self::UnsupportedEra { .. } => "unsupported_era",
            Self::LimitExceeded { .. } => "limit_exceeded",
            Self::InternalConsistencyAlarm { .. } => "internal_consistency_alarm",
            Self::Validation(_) => "validation",
            Self::Config(_) => "config",
        }
    }
}

/// Validation errors for domain primitive newtypes.
///
/// Each error carries the rejected input so that callers can report it
/// back without re-deriving it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Jurisdiction code is not exactly three ASCII digits.
    #[error("invalid jurisdiction code: \"{0}\" (expected 3 digits)")]
    InvalidJurisdictionCode(String),

    /// Jurisdiction code is well-formed but absent from the table.
    #[error("unknown jurisdiction code: \"{0}\"")]
    UnknownJurisdiction(String),

    /// Identifier fails format or checksum validation.
    #[error("invalid identifier: \"{value}\" ({reason})")]
    InvalidIdentifier {
        /// The rejected string.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Year, month and day do not form a calendar date.
    #[error("invalid birth date: {year:04}-{month:02}-{day:02}")]
    InvalidDate {
        /// Full birth year.
        year: i32,
        /// Month, 1-based.
        month: u32,
        /// Day of month, 1-based.
        day: u32,
    },

    /// Sequence is outside 0-99.
    #[error("invalid sequence: {0} (expected 0-99)")]
    InvalidSequence(u32),

    /// Sex string not recognised.
    #[error("invalid sex: \"{0}\" (expected male or female)")]
    InvalidSex(String),
}

/// Errors while loading or checking configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable holds a value that does not parse.
    #[error("invalid value for {var}: \"{value}\"")]
    InvalidValue {
        /// Variable name.
        var: String,
        /// Raw value found.
        value: String,
    },

    /// Individually valid settings contradict each other.
    #[error("inconsistent configuration: {0}")]
    Inconsistent(String),
}
