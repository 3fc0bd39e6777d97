//! Credential domain service.
//!
//! Owns the account lifecycle: registration with emailed verification codes,
//! login with bearer token issue, and password reset. Password hashes use
//! argon2 PHC strings; one-time codes are six digits with a ten-minute
//! validity checked lazily at use.

use std::sync::Arc;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;

use crate::domain::account::OneTimeCode;
use crate::domain::ports::{
    AccountSummary, AuthenticatedIdentity, CodePurpose, CredentialService, LoginOutcome, Mailer,
    UserStore, UserStoreError,
};
use crate::domain::token::TokenSigner;
use crate::domain::{Account, Email, Error, LoginCredentials, Registration};

/// Single message for every login failure so responses do not reveal whether
/// the email exists, the password matched, or verification is pending.
const LOGIN_FAILED: &str = "invalid credentials or account not verified";

const INVALID_CODE: &str = "invalid or expired code";

/// Credential service implementing the driving port.
pub struct CredentialServiceImpl<S, M> {
    store: Arc<S>,
    mailer: Arc<M>,
    clock: Arc<dyn Clock>,
    signer: TokenSigner,
}

impl<S, M> CredentialServiceImpl<S, M> {
    /// Create a new service over the given store, mailer, clock, and signer.
    pub fn new(store: Arc<S>, mailer: Arc<M>, clock: Arc<dyn Clock>, signer: TokenSigner) -> Self {
        Self {
            store,
            mailer,
            clock,
            signer,
        }
    }
}

impl<S, M> CredentialServiceImpl<S, M>
where
    S: UserStore,
    M: Mailer,
{
    fn map_store_error(error: UserStoreError) -> Error {
        Error::internal(error.to_string())
    }

    fn hash_password(password: &str) -> Result<String, Error> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| Error::internal(format!("password hashing failed: {err}")))
    }

    fn password_matches(stored_hash: &str, password: &str) -> Result<bool, Error> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|err| Error::internal(format!("stored password hash is invalid: {err}")))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(Error::internal(format!(
                "password verification failed: {err}"
            ))),
        }
    }

    async fn load_by_email(&self, email: &Email) -> Result<Option<Account>, Error> {
        self.store
            .find_by_email(email)
            .await
            .map_err(Self::map_store_error)
    }

    /// Issue a fresh code, mail it, and stage it on the account.
    ///
    /// Dispatch happens before the account is persisted so a failed delivery
    /// never leaves a code the user can not have received.
    async fn stage_code(&self, account: &mut Account, purpose: CodePurpose) -> Result<(), Error> {
        let code = OneTimeCode::issue(self.clock.utc());
        self.mailer
            .send_one_time_code(account.email(), purpose, code.code())
            .await
            .map_err(|err| Error::internal(err.to_string()))?;
        account.set_one_time_code(code);
        Ok(())
    }

    fn consume_code(account: &mut Account, candidate: &str, now: DateTime<Utc>) -> Result<(), Error> {
        let valid = account
            .one_time_code()
            .is_some_and(|code| code.matches(candidate, now));
        if !valid {
            return Err(Error::invalid_operation(INVALID_CODE));
        }
        account.clear_one_time_code();
        Ok(())
    }
}

#[async_trait]
impl<S, M> CredentialService for CredentialServiceImpl<S, M>
where
    S: UserStore,
    M: Mailer,
{
    async fn register(&self, registration: &Registration) -> Result<AccountSummary, Error> {
        if self.load_by_email(registration.email()).await?.is_some() {
            return Err(Error::invalid_operation("email already registered"));
        }
        let existing = self
            .store
            .find_by_handle(registration.handle())
            .await
            .map_err(Self::map_store_error)?;
        if existing.is_some() {
            return Err(Error::invalid_operation("username already taken"));
        }

        let mut account = Account::new(
            registration.handle().clone(),
            registration.email().clone(),
            registration.display_name().cloned(),
            Self::hash_password(registration.password())?,
            self.clock.utc(),
        );
        self.stage_code(&mut account, CodePurpose::Verification)
            .await?;

        let summary = AccountSummary::from(&account);
        self.store.put(account).await.map_err(Self::map_store_error)?;
        Ok(summary)
    }

    async fn verify_code(&self, email: &Email, code: &str) -> Result<(), Error> {
        let Some(mut account) = self.load_by_email(email).await? else {
            return Err(Error::not_found("user not found"));
        };
        if account.is_verified() {
            return Ok(());
        }
        Self::consume_code(&mut account, code, self.clock.utc())?;
        account.mark_verified();
        self.store.put(account).await.map_err(Self::map_store_error)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error> {
        let Some(account) = self.load_by_email(credentials.email()).await? else {
            return Err(Error::unauthorized(LOGIN_FAILED));
        };
        if !Self::password_matches(account.password_hash(), credentials.password())? {
            return Err(Error::unauthorized(LOGIN_FAILED));
        }
        if !account.is_verified() {
            return Err(Error::unauthorized(LOGIN_FAILED));
        }

        let token = self.signer.issue(account.handle(), self.clock.utc())?;
        Ok(LoginOutcome {
            token,
            user: AccountSummary::from(&account),
        })
    }

    async fn request_password_reset(&self, email: &Email) -> Result<(), Error> {
        let Some(mut account) = self.load_by_email(email).await? else {
            return Err(Error::not_found("user not found"));
        };
        self.stage_code(&mut account, CodePurpose::PasswordReset)
            .await?;
        self.store.put(account).await.map_err(Self::map_store_error)
    }

    async fn reset_password(
        &self,
        email: &Email,
        code: &str,
        new_password: &str,
    ) -> Result<(), Error> {
        if new_password.is_empty() {
            return Err(Error::invalid_request("password must not be empty"));
        }
        let Some(mut account) = self.load_by_email(email).await? else {
            return Err(Error::not_found("user not found"));
        };
        Self::consume_code(&mut account, code, self.clock.utc())?;

        account.set_password_hash(Self::hash_password(new_password)?);
        // Completing a reset proves control of the mailbox.
        account.mark_verified();
        self.store.put(account).await.map_err(Self::map_store_error)
    }

    async fn authenticate(&self, token: &str) -> Option<AuthenticatedIdentity> {
        self.signer
            .verify(token, self.clock.utc())
            .map(AuthenticatedIdentity::new)
    }
}
