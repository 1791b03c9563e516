//! Error types for directive and timestamp parsing.

use thiserror::Error;

/// Error returned when an HTTP timestamp cannot be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    /// The message carries no `Date` header.
    ///
    /// Freshness cannot be computed without a timestamp, so a cached response
    /// in this condition is always classified as stale.
    #[error("no Date header found")]
    Missing,

    /// The value is not in the fixed HTTP date format
    /// (`Sun, 06 Nov 1994 08:49:37 GMT`).
    #[error("malformed HTTP date {0:?}")]
    Malformed(String),
}

/// Error returned when a delta-seconds directive has an unusable value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    /// The directive value is not an integer number of seconds.
    #[error("directive `{name}` has non-numeric value {value:?}")]
    NotSeconds {
        /// Directive name, e.g. `max-age`.
        name: String,
        /// Raw value as it appeared in the header.
        value: String,
    },
}
