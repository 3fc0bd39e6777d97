//! Port for account persistence.
//!
//! The [`UserStore`] trait is the driven-side contract for the identity
//! store: one document per account, keyed by the normalised handle. Adapters
//! provide durable storage; services stay free of persistence detail.

use async_trait::async_trait;

use crate::domain::{Account, Email, Handle};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account store adapters.
    pub enum UserStoreError {
        /// Reading or writing the backing medium failed.
        Io { message: String } =>
            "account store io failed: {message}",
        /// A stored document could not be serialised or deserialised.
        Serialisation { message: String } =>
            "account store serialisation failed: {message}",
    }
}

/// Port for account storage and retrieval.
///
/// Writes are upserts keyed by the account's normalised handle. Lookups by
/// email scan the store; the account population is small enough that no
/// secondary index is kept.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch the account with the given handle, if present.
    async fn find_by_handle(&self, handle: &Handle) -> Result<Option<Account>, UserStoreError>;

    /// Fetch the account registered under the given email, if present.
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, UserStoreError>;

    /// Insert or replace one account document.
    async fn put(&self, account: Account) -> Result<(), UserStoreError>;

    /// Insert or replace two account documents in a single transaction.
    ///
    /// Both updates become visible together and are persisted together; a
    /// failed persistence attempt leaves the previous durable state intact.
    /// Callers must pass accounts with distinct handles.
    async fn put_pair(&self, first: Account, second: Account) -> Result<(), UserStoreError>;

    /// All accounts whose handle contains `query` (case-insensitively).
    ///
    /// Result order is unspecified; callers sort and cap as needed.
    async fn search_by_handle(&self, query: &str) -> Result<Vec<Account>, UserStoreError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn error_constructors_render_messages() {
        let err = UserStoreError::io("disk full");
        assert_eq!(err.to_string(), "account store io failed: disk full");

        let err = UserStoreError::serialisation("bad json");
        assert_eq!(
            err.to_string(),
            "account store serialisation failed: bad json"
        );
    }

    #[tokio::test]
    async fn mock_store_round_trips_an_account() {
        use chrono::Utc;

        let mut store = MockUserStore::new();
        let handle = Handle::new("alice").expect("valid handle");
        let account = Account::new(
            handle.clone(),
            Email::new("alice@example.com").expect("valid email"),
            None,
            "$argon2id$stub".to_owned(),
            Utc::now(),
        );
        let stored = account.clone();
        store
            .expect_find_by_handle()
            .returning(move |_| Ok(Some(stored.clone())));

        let found = store
            .find_by_handle(&handle)
            .await
            .expect("lookup succeeds")
            .expect("account present");
        assert_eq!(found, account);
    }
}
