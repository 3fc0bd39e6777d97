//! Port for review persistence.

use async_trait::async_trait;

use crate::domain::{CatalogItemId, Handle, Review};

use super::define_port_error;

define_port_error! {
    /// Errors raised by review store adapters.
    pub enum ReviewStoreError {
        /// Reading or writing the backing medium failed.
        Io { message: String } =>
            "review store io failed: {message}",
        /// A stored document could not be serialised or deserialised.
        Serialisation { message: String } =>
            "review store serialisation failed: {message}",
    }
}

/// Port for review storage and retrieval.
///
/// Reviews are append-only: the port has no update or delete operation.
/// Result order is unspecified; callers sort as needed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Append one review.
    async fn add(&self, review: Review) -> Result<(), ReviewStoreError>;

    /// All reviews of the given catalog item.
    async fn reviews_for_item(&self, item: CatalogItemId) -> Result<Vec<Review>, ReviewStoreError>;

    /// All reviews written by the given account.
    async fn reviews_by(&self, reviewer: &Handle) -> Result<Vec<Review>, ReviewStoreError>;
}
