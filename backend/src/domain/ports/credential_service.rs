//! Driving port for account credential use-cases.
//!
//! Inbound adapters call this port for registration, verification, login,
//! and password-reset flows without knowing the backing store, hasher, or
//! mailer. Handler tests substitute the mock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Account, Email, Error, Handle, LoginCredentials, Registration};

/// Public projection of an account, safe to return to its owner.
///
/// Never carries the password hash or any pending one-time code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: Uuid,
    #[schema(value_type = String, example = "alice_90")]
    pub username: Handle,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    #[schema(value_type = Option<String>, example = "Alice")]
    pub display_name: Option<String>,
    #[schema(value_type = String, example = "alice@example.com")]
    pub email: Email,
    pub verified: bool,
    #[schema(value_type = String, example = "2024-05-01T12:00:00Z")]
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id(),
            username: account.handle().clone(),
            display_name: account.display_name().map(|name| name.as_ref().to_owned()),
            email: account.email().clone(),
            verified: account.is_verified(),
            created_at: account.created_at(),
        }
    }
}

/// Successful login: a bearer token plus the account it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    pub token: String,
    pub user: AccountSummary,
}

/// Identity extracted from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    handle: Handle,
}

impl AuthenticatedIdentity {
    /// Wrap a verified handle.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Handle of the authenticated account.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }
}

/// Domain use-case port for credential management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialService: Send + Sync {
    /// Create an unverified account and dispatch a verification code.
    async fn register(&self, registration: &Registration) -> Result<AccountSummary, Error>;

    /// Confirm an emailed verification code. Idempotent once verified.
    async fn verify_code(&self, email: &Email, code: &str) -> Result<(), Error>;

    /// Validate credentials and issue a bearer token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error>;

    /// Store and dispatch a password-reset code.
    async fn request_password_reset(&self, email: &Email) -> Result<(), Error>;

    /// Replace the password after checking the emailed reset code.
    async fn reset_password(
        &self,
        email: &Email,
        code: &str,
        new_password: &str,
    ) -> Result<(), Error>;

    /// Verify a bearer token's signature and expiry.
    ///
    /// Pure check, no store lookup. `None` covers every failure mode so
    /// callers cannot distinguish a forged token from an expired one.
    async fn authenticate(&self, token: &str) -> Option<AuthenticatedIdentity>;
}
