//! Validation error types.

use thiserror::Error;

/// Errors raised while validating request options, before any I/O.
///
/// These surface synchronously from request construction and never reach
/// the download pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The instrument does not resolve in the catalog.
    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),

    /// The granularity string is not one of the supported forms.
    #[error("invalid granularity '{0}', expected one of: ticks, m1, h1, d1")]
    InvalidGranularity(String),

    /// The price side string is not one of the supported forms.
    #[error("invalid price side '{0}', expected one of: bid, ask, mid")]
    InvalidPriceType(String),

    /// A field that must be a positive integer was zero or negative.
    #[error("{field} must be a positive integer, got {value}")]
    InvalidPositiveInteger {
        /// The offending field name.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },

    /// A field that must be a non-negative integer was negative.
    #[error("{field} must be a non-negative integer, got {value}")]
    InvalidNonNegativeInteger {
        /// The offending field name.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },

    /// The retry delay was negative.
    #[error("retry delay must be a non-negative integer number of milliseconds, got {0}")]
    InvalidRetryDelay(i64),

    /// Neither an instant range nor a date range was provided.
    #[error("either both 'from' and 'to' or a date range must be provided")]
    MissingDateRange,

    /// The provided range is malformed.
    #[error("invalid date range: {0}")]
    InvalidDateRange(String),
}
