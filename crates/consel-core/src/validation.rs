//! Resource and volume name validation.

use thiserror::Error;

/// Longest accepted name, in characters.
pub const MAX_NAME_LENGTH: usize = 127;

/// Punctuation allowed in names besides ASCII letters and digits.
const NAME_PUNCTUATION: &[char] = &['-', '_', '.', ':', ' '];

/// Why a name was rejected. The display text is shown to the console user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("Volume name must be at least one character long.")]
    Empty,

    #[error("Name too long.")]
    TooLong,

    #[error("Illegal character \"{0}\" in name.")]
    IllegalCharacter(char),
}

/// Check a name against the naming rules.
///
/// Rules:
/// - Non-empty
/// - At most [`MAX_NAME_LENGTH`] characters
/// - ASCII alphanumerics plus `-`, `_`, `.`, `:` and space
///
/// ```rust
/// use consel_core::validation::{NameError, validate_name};
///
/// assert!(validate_name("Full-0001").is_ok());
/// assert_eq!(validate_name("a/b"), Err(NameError::IllegalCharacter('/')));
/// ```
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !NAME_PUNCTUATION.contains(c))
    {
        return Err(NameError::IllegalCharacter(bad));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(NameError::TooLong);
    }
    Ok(())
}
