//! Error types for consel-core.
//!
//! Two families of errors live here:
//!
//! - [`SelectError`]: the outcome of a failed resolution. By the time a
//!   resolver returns one, the console session has already been told why, so
//!   callers branch on the variant and never echo the message again.
//! - [`Error`]: everything else (configuration loading, argument tokenizing,
//!   I/O), returned through the [`Result`] alias.
//!
//! [`CatalogError`] is what catalog implementations hand back; resolvers wrap
//! it into [`SelectError::Catalog`] when an enumeration cannot proceed.

use thiserror::Error;

use crate::args::ArgsError;

/// Reason a resolution produced no entity.
///
/// ## Reporting contract
///
/// Every variant is reported to the session exactly once, where it is
/// detected. The payload is a short subject (usually the entity kind or the
/// offending value) kept for logging, not for display.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// The named entity is absent from the catalog, configuration or live registry.
    #[error("not found: {0}")]
    NotFound(String),

    /// The access predicate denied the entity.
    ///
    /// Always fatal to the current resolution and never retried silently.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A malformed value such as a non-integer range bound or an invalid name.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Nothing was left to choose from after filtering.
    #[error("selection list for \"{0}\" is empty")]
    EmptyCandidateSet(String),

    /// The choice needs interaction but the console runs in batch mode.
    #[error("multiple choices for \"{0}\" are not selectable in batch mode")]
    AmbiguousInBatchMode(String),

    /// Input ended, the user typed the abort token, or declined a confirmation.
    #[error("selection aborted")]
    UserAborted,

    /// The catalog could not enumerate or fetch records.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl SelectError {
    /// Static identifier for logging and exit code mapping.
    ///
    /// ```rust
    /// use consel_core::SelectError;
    ///
    /// assert_eq!(SelectError::UserAborted.category(), "aborted");
    /// assert_eq!(SelectError::NotFound("Pool".into()).category(), "not_found");
    /// ```
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Unauthorized(_) => "unauthorized",
            Self::InvalidInput(_) => "invalid_input",
            Self::EmptyCandidateSet(_) => "empty",
            Self::AmbiguousInBatchMode(_) => "ambiguous",
            Self::UserAborted => "aborted",
            Self::Catalog(_) => "catalog",
        }
    }
}

/// Failure reported by a [`Catalog`](crate::collab::Catalog) implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The backing store cannot be reached.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    /// A query ran but failed.
    #[error("query failed: {0}")]
    Query(String),
}

/// General error type for non-selection operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O failure while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is missing, unreadable or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A command line could not be tokenized.
    #[error("Argument error: {0}")]
    Args(#[from] ArgsError),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Static identifier for logging and exit code mapping.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
            Self::Args(_) => "usage",
        }
    }
}

/// Convenience alias for `std::result::Result<T, consel_core::Error>`.
pub type Result<T> = std::result::Result<T, Error>;
