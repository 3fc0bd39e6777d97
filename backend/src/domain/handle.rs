//! Account handle primitive.
//!
//! Handles identify accounts everywhere: as document keys in the identity
//! store, as members of the social sets, and in API paths. Uniqueness is
//! case-insensitive, so the constructor normalises input (trim + lowercase)
//! before validation and all comparisons happen on the normalised form.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Minimum allowed length for a handle.
pub const HANDLE_MIN: usize = 3;
/// Maximum allowed length for a handle.
pub const HANDLE_MAX: usize = 30;

/// Validation errors returned by [`Handle::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleValidationError {
    Empty,
    TooShort { min: usize },
    TooLong { max: usize },
    InvalidCharacters,
}

impl fmt::Display for HandleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "username must not be empty"),
            Self::TooShort { min } => {
                write!(f, "username must be at least {min} characters")
            }
            Self::TooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::InvalidCharacters => write!(
                f,
                "username may only contain letters, numbers, or underscores",
            ),
        }
    }
}

impl std::error::Error for HandleValidationError {}

static HANDLE_RE: OnceLock<Regex> = OnceLock::new();

fn handle_regex() -> &'static Regex {
    HANDLE_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        let pattern = "^[a-z0-9_]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("handle regex failed to compile: {error}"))
    })
}

/// Normalised account handle.
///
/// ## Invariants
/// - Stored lowercase with surrounding whitespace removed.
/// - Between [`HANDLE_MIN`] and [`HANDLE_MAX`] characters of
///   `[a-z0-9_]` after normalisation.
///
/// # Examples
/// ```
/// use backend::domain::Handle;
///
/// let handle = Handle::new("  Alice_90 ").unwrap();
/// assert_eq!(handle.as_ref(), "alice_90");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    /// Normalise and validate a handle from raw input.
    pub fn new(handle: impl AsRef<str>) -> Result<Self, HandleValidationError> {
        Self::from_owned(handle.as_ref().to_owned())
    }

    fn from_owned(handle: String) -> Result<Self, HandleValidationError> {
        let normalised = handle.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(HandleValidationError::Empty);
        }

        let length = normalised.chars().count();
        if length < HANDLE_MIN {
            return Err(HandleValidationError::TooShort { min: HANDLE_MIN });
        }
        if length > HANDLE_MAX {
            return Err(HandleValidationError::TooLong { max: HANDLE_MAX });
        }

        if !handle_regex().is_match(&normalised) {
            return Err(HandleValidationError::InvalidCharacters);
        }

        Ok(Self(normalised))
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Handle> for String {
    fn from(value: Handle) -> Self {
        value.0
    }
}

impl TryFrom<String> for Handle {
    type Error = HandleValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}
