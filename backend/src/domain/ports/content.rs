//! Driving ports for catalog interaction: saved/watched sets and reviews.

use async_trait::async_trait;

use crate::domain::{CatalogItemId, Error, Handle, Rating, Review};

/// Validated input for a new review.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub rating: Rating,
    pub comment: Option<String>,
}

impl NewReview {
    /// Bundle a validated rating with an optional comment.
    pub fn new(rating: Rating, comment: Option<String>) -> Self {
        Self { rating, comment }
    }
}

/// Domain use-case port for catalog set mutations and review creation.
///
/// Set operations are idempotent and report whether the set changed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentCommand: Send + Sync {
    /// Add `item` to the caller's saved set.
    async fn save_item(&self, actor: &Handle, item: CatalogItemId) -> Result<bool, Error>;

    /// Remove `item` from the caller's saved set.
    async fn remove_saved(&self, actor: &Handle, item: CatalogItemId) -> Result<bool, Error>;

    /// Add `item` to the caller's watched set.
    async fn mark_watched(&self, actor: &Handle, item: CatalogItemId) -> Result<bool, Error>;

    /// Remove `item` from the caller's watched set.
    async fn remove_watched(&self, actor: &Handle, item: CatalogItemId) -> Result<bool, Error>;

    /// Create an immutable review of `item`.
    async fn add_review(
        &self,
        actor: &Handle,
        item: CatalogItemId,
        review: NewReview,
    ) -> Result<Review, Error>;
}

/// Domain use-case port for catalog set and review reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentQuery: Send + Sync {
    /// The caller's own saved set.
    async fn saved_items(&self, actor: &Handle) -> Result<Vec<CatalogItemId>, Error>;

    /// The caller's own watched set.
    async fn watched_items(&self, actor: &Handle) -> Result<Vec<CatalogItemId>, Error>;

    /// Another user's saved set; requires approved-follower status.
    async fn saved_items_of(
        &self,
        viewer: &Handle,
        target: &Handle,
    ) -> Result<Vec<CatalogItemId>, Error>;

    /// Another user's watched set; requires approved-follower status.
    async fn watched_items_of(
        &self,
        viewer: &Handle,
        target: &Handle,
    ) -> Result<Vec<CatalogItemId>, Error>;

    /// The caller's own reviews, newest first.
    async fn reviews_by(&self, actor: &Handle) -> Result<Vec<Review>, Error>;

    /// All reviews of a catalog item, newest first. Public.
    async fn reviews_for_item(&self, item: CatalogItemId) -> Result<Vec<Review>, Error>;
}
