//! Authentication primitives such as login credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::account::{AccountValidationError, DisplayName, Email};
use super::handle::{Handle, HandleValidationError};

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Email failed shape validation.
    Email(AccountValidationError),
    /// Handle failed format validation.
    Handle(HandleValidationError),
    /// Display name failed validation.
    DisplayName(AccountValidationError),
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(err) => write!(f, "{err}"),
            Self::Handle(err) => write!(f, "{err}"),
            Self::DisplayName(err) => write!(f, "{err}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Validated login credentials used by the credential service.
///
/// ## Invariants
/// - `email` is normalised (trimmed, lowercased) and shape-checked.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Dave@example.com", "hunter2").unwrap();
/// assert_eq!(creds.email().as_ref(), "dave@example.com");
/// assert_eq!(creds.password(), "hunter2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialValidationError> {
        let email = Email::new(email).map_err(CredentialValidationError::Email)?;
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email address used for the account lookup.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration payload.
///
/// A blank display name is treated as absent rather than rejected, matching
/// how sign-up forms submit optional fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    handle: Handle,
    email: Email,
    display_name: Option<DisplayName>,
    password: Zeroizing<String>,
}

impl Registration {
    /// Construct a registration from raw form inputs.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Self, CredentialValidationError> {
        let handle = Handle::new(username).map_err(CredentialValidationError::Handle)?;
        let email = Email::new(email).map_err(CredentialValidationError::Email)?;
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        let display_name = display_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| DisplayName::new(name).map_err(CredentialValidationError::DisplayName))
            .transpose()?;
        Ok(Self {
            handle,
            email,
            display_name,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised handle requested by the registrant.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Normalised email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Optional public display name.
    pub fn display_name(&self) -> Option<&DisplayName> {
        self.display_name.as_ref()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
