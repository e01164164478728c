//! CLI error handling with semantic exit codes.
//!
//! # Exit Code Categories
//!
//! | Code | Category | Description |
//! |------|----------|-------------|
//! | 0 | Success | Command completed successfully |
//! | 1 | `Internal` | Unexpected/internal error, catalog failure |
//! | 2 | `Usage` | Invalid arguments, unknown command, bad configuration |
//! | 3 | `NotFound` | Named entity does not exist |
//! | 4 | `Unauthorized` | Entity exists but this console may not use it |
//! | 5 | `Ambiguous` | A choice was needed but the console runs in batch mode |
//! | 6 | `Aborted` | The user aborted, declined, or input ended |
//! | 7 | `Empty` | Nothing was left to choose from |
//!
//! # Usage
//!
//! ```bash
//! consel --batch mount
//! case $? in
//!     0) echo "mounted" ;;
//!     5) echo "name a storage=, batch mode cannot ask" ;;
//!     *) echo "other error" ;;
//! esac
//! ```

use std::fmt;
use std::process::ExitCode;

use consel_core::SelectError;

/// Semantic error category determining the exit code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Unexpected or internal error (exit code 1).
    Internal = 1,

    /// Invalid arguments or configuration (exit code 2).
    Usage = 2,

    /// Requested entity not found (exit code 3).
    NotFound = 3,

    /// Access control denied the entity (exit code 4).
    Unauthorized = 4,

    /// Interaction needed in batch mode (exit code 5).
    Ambiguous = 5,

    /// The user aborted the dialog (exit code 6).
    Aborted = 6,

    /// The candidate list was empty (exit code 7).
    Empty = 7,
}

impl ErrorCategory {
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn as_exit_code(self) -> ExitCode {
        ExitCode::from(self.exit_code())
    }

    /// Get a short description of this error category.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Internal => "internal error",
            Self::Usage => "usage error",
            Self::NotFound => "not found",
            Self::Unauthorized => "unauthorized",
            Self::Ambiguous => "ambiguous in batch mode",
            Self::Aborted => "aborted",
            Self::Empty => "nothing to select",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl From<&SelectError> for ErrorCategory {
    fn from(err: &SelectError) -> Self {
        match err {
            SelectError::NotFound(_) => Self::NotFound,
            SelectError::Unauthorized(_) => Self::Unauthorized,
            SelectError::InvalidInput(_) => Self::Usage,
            SelectError::EmptyCandidateSet(_) => Self::Empty,
            SelectError::AmbiguousInBatchMode(_) => Self::Ambiguous,
            SelectError::UserAborted => Self::Aborted,
            SelectError::Catalog(_) => Self::Internal,
        }
    }
}

impl From<&consel_core::Error> for ErrorCategory {
    fn from(err: &consel_core::Error) -> Self {
        match err {
            consel_core::Error::Config(_)
            | consel_core::Error::Serialization(_)
            | consel_core::Error::Args(_) => Self::Usage,
            consel_core::Error::Io(_) => Self::Internal,
        }
    }
}

/// A CLI error with a semantic category for exit code mapping.
///
/// Wraps an `anyhow::Error` so context chains survive, while the category
/// decides the exit code.
#[derive(Debug)]
pub struct CliError {
    pub category: ErrorCategory,
    pub source: anyhow::Error,
    /// The message was already shown through the console session.
    pub reported: bool,
}

impl CliError {
    pub fn new(category: ErrorCategory, source: impl Into<anyhow::Error>) -> Self {
        Self {
            category,
            source: source.into(),
            reported: false,
        }
    }

    pub fn usage(source: impl Into<anyhow::Error>) -> Self {
        Self::new(ErrorCategory::Usage, source)
    }

    /// A resolution failure; the resolver already told the user why.
    pub fn selection(err: SelectError) -> Self {
        Self {
            category: ErrorCategory::from(&err),
            source: err.into(),
            reported: true,
        }
    }

    pub fn core(err: consel_core::Error) -> Self {
        Self::new(ErrorCategory::from(&err), err)
    }

    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.category.exit_code()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Exit code for any error; uncategorized errors are internal.
#[must_use]
pub fn exit_code_from_error(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<CliError>()
        .map_or(ErrorCategory::Internal.exit_code(), CliError::exit_code)
}

/// Whether the error still needs to be printed.
#[must_use]
pub fn needs_report(err: &anyhow::Error) -> bool {
    err.downcast_ref::<CliError>().is_none_or(|e| !e.reported)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use anyhow::anyhow;
    use consel_core::CatalogError;

    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ErrorCategory::Internal.exit_code(), 1);
        assert_eq!(ErrorCategory::Usage.exit_code(), 2);
        assert_eq!(ErrorCategory::NotFound.exit_code(), 3);
        assert_eq!(ErrorCategory::Unauthorized.exit_code(), 4);
        assert_eq!(ErrorCategory::Ambiguous.exit_code(), 5);
        assert_eq!(ErrorCategory::Aborted.exit_code(), 6);
        assert_eq!(ErrorCategory::Empty.exit_code(), 7);
    }

    #[test]
    fn test_selection_errors_map_to_categories() {
        let cases = [
            (SelectError::NotFound("Pool".into()), ErrorCategory::NotFound),
            (SelectError::Unauthorized("Job".into()), ErrorCategory::Unauthorized),
            (SelectError::InvalidInput("5-3".into()), ErrorCategory::Usage),
            (SelectError::EmptyCandidateSet("Pool".into()), ErrorCategory::Empty),
            (SelectError::AmbiguousInBatchMode("Storage".into()), ErrorCategory::Ambiguous),
            (SelectError::UserAborted, ErrorCategory::Aborted),
            (
                SelectError::Catalog(CatalogError::Unavailable("down".into())),
                ErrorCategory::Internal,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ErrorCategory::from(&err), expected, "{err}");
        }
    }

    #[test]
    fn test_selection_errors_are_already_reported() {
        let err: anyhow::Error = CliError::selection(SelectError::UserAborted).into();

        assert_eq!(exit_code_from_error(&err), 6);
        assert!(!needs_report(&err));
    }

    #[test]
    fn test_plain_errors_are_internal_and_printed() {
        let err = anyhow!("something broke");

        assert_eq!(exit_code_from_error(&err), 1);
        assert!(needs_report(&err));
    }

    #[test]
    fn test_config_errors_are_usage() {
        let err = CliError::core(consel_core::Error::Config("bad".into()));
        assert_eq!(err.category, ErrorCategory::Usage);
        assert_eq!(err.to_string(), "Configuration error: bad");
    }
}
