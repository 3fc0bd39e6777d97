//! JSON-file document store backing the account and review ports.
//!
//! One document per account keyed by the normalised handle, with the social
//! and catalog sets embedded, plus an append-only review collection. The
//! whole state sits behind a single `tokio::sync::RwLock`; every mutation
//! runs under the write lock, applies to a copy, and snapshots the full
//! state to disk via a temp file and an atomic rename before committing.
//! A failed snapshot write therefore leaves both the in-memory state and
//! the previous on-disk snapshot intact.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ReviewStore, ReviewStoreError, UserStore, UserStoreError};
use crate::domain::{Account, CatalogItemId, Email, Handle, Review};

/// Serialised shape of the whole store.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct StoreState {
    accounts: HashMap<String, Account>,
    reviews: HashMap<Uuid, Review>,
}

enum PersistError {
    Io(String),
    Serialisation(String),
}

impl From<PersistError> for UserStoreError {
    fn from(err: PersistError) -> Self {
        match err {
            PersistError::Io(message) => Self::io(message),
            PersistError::Serialisation(message) => Self::serialisation(message),
        }
    }
}

impl From<PersistError> for ReviewStoreError {
    fn from(err: PersistError) -> Self {
        match err {
            PersistError::Io(message) => Self::io(message),
            PersistError::Serialisation(message) => Self::serialisation(message),
        }
    }
}

/// JSON-file document store for accounts and reviews.
pub struct JsonDocumentStore {
    state: RwLock<StoreState>,
    snapshot: Option<PathBuf>,
}

impl JsonDocumentStore {
    /// Open a store persisted at `path`, loading any existing snapshot.
    ///
    /// A missing file is an empty store; the snapshot appears on the first
    /// write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, UserStoreError> {
        let path = path.into();
        let state = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|err| UserStoreError::serialisation(err.to_string()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => StoreState::default(),
            Err(err) => return Err(UserStoreError::io(err.to_string())),
        };
        Ok(Self {
            state: RwLock::new(state),
            snapshot: Some(path),
        })
    }

    /// In-memory store with no snapshot file.
    #[must_use]
    pub fn ephemeral() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            snapshot: None,
        }
    }

    async fn persist(&self, state: &StoreState) -> Result<(), PersistError> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(state)
            .map_err(|err| PersistError::Serialisation(err.to_string()))?;
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| PersistError::Io(err.to_string()))?;
        }
        let staging = path.with_extension("tmp");
        tokio::fs::write(&staging, &bytes)
            .await
            .map_err(|err| PersistError::Io(err.to_string()))?;
        tokio::fs::rename(&staging, path)
            .await
            .map_err(|err| PersistError::Io(err.to_string()))?;
        debug!(path = %path.display(), bytes = bytes.len(), "store snapshot written");
        Ok(())
    }
}

fn key_of(account: &Account) -> String {
    account.handle().as_ref().to_owned()
}

#[async_trait]
impl UserStore for JsonDocumentStore {
    async fn find_by_handle(&self, handle: &Handle) -> Result<Option<Account>, UserStoreError> {
        let state = self.state.read().await;
        Ok(state.accounts.get(handle.as_ref()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, UserStoreError> {
        let state = self.state.read().await;
        Ok(state
            .accounts
            .values()
            .find(|account| account.email() == email)
            .cloned())
    }

    async fn put(&self, account: Account) -> Result<(), UserStoreError> {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        next.accounts.insert(key_of(&account), account);
        self.persist(&next).await?;
        *state = next;
        Ok(())
    }

    async fn put_pair(&self, first: Account, second: Account) -> Result<(), UserStoreError> {
        // One lock acquisition and one snapshot keep both sides together.
        let mut state = self.state.write().await;
        let mut next = state.clone();
        next.accounts.insert(key_of(&first), first);
        next.accounts.insert(key_of(&second), second);
        self.persist(&next).await?;
        *state = next;
        Ok(())
    }

    async fn search_by_handle(&self, query: &str) -> Result<Vec<Account>, UserStoreError> {
        // Handles are stored lowercase, so lowercasing the needle suffices.
        let needle = query.to_lowercase();
        let state = self.state.read().await;
        Ok(state
            .accounts
            .values()
            .filter(|account| account.handle().as_ref().contains(&needle))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReviewStore for JsonDocumentStore {
    async fn add(&self, review: Review) -> Result<(), ReviewStoreError> {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        next.reviews.insert(review.id(), review);
        self.persist(&next).await?;
        *state = next;
        Ok(())
    }

    async fn reviews_for_item(&self, item: CatalogItemId) -> Result<Vec<Review>, ReviewStoreError> {
        let state = self.state.read().await;
        Ok(state
            .reviews
            .values()
            .filter(|review| review.item() == item)
            .cloned()
            .collect())
    }

    async fn reviews_by(&self, reviewer: &Handle) -> Result<Vec<Review>, ReviewStoreError> {
        let state = self.state.read().await;
        Ok(state
            .reviews
            .values()
            .filter(|review| review.reviewer() == reviewer)
            .cloned()
            .collect())
    }
}
