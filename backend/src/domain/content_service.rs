//! Content domain service.
//!
//! Backs the saved and watched catalog sets plus the append-only review
//! ledger. Set mutations are idempotent: the account is only rewritten when
//! membership actually changed, and the caller learns which case applied.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    ContentCommand, ContentQuery, NewReview, ReviewStore, ReviewStoreError, UserStore,
    UserStoreError,
};
use crate::domain::{Account, CatalogItemId, Error, Handle, Review};

/// Content service implementing the command and query ports.
pub struct ContentService<S, R> {
    store: Arc<S>,
    reviews: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<S, R> ContentService<S, R> {
    /// Create a new service over the given account store and review ledger.
    pub fn new(store: Arc<S>, reviews: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            reviews,
            clock,
        }
    }
}

impl<S, R> ContentService<S, R>
where
    S: UserStore,
    R: ReviewStore,
{
    fn map_store_error(error: UserStoreError) -> Error {
        Error::internal(error.to_string())
    }

    fn map_review_error(error: ReviewStoreError) -> Error {
        Error::internal(error.to_string())
    }

    async fn load(&self, handle: &Handle) -> Result<Account, Error> {
        self.store
            .find_by_handle(handle)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    /// Apply a set mutation, persisting only when membership changed.
    async fn mutate_sets<F>(&self, actor: &Handle, apply: F) -> Result<bool, Error>
    where
        F: FnOnce(&mut Account) -> bool,
    {
        let mut account = self.load(actor).await?;
        let changed = apply(&mut account);
        if changed {
            self.store
                .put(account)
                .await
                .map_err(Self::map_store_error)?;
        }
        Ok(changed)
    }

    /// Gate another user's sets behind approved-follower status.
    async fn load_visible_to(&self, viewer: &Handle, target: &Handle) -> Result<Account, Error> {
        let account = self.load(target).await?;
        if !account.permits_gated_view(Some(viewer)) {
            return Err(Error::forbidden(
                "must be an approved follower to view these movies",
            ));
        }
        Ok(account)
    }

    fn newest_first(mut reviews: Vec<Review>) -> Vec<Review> {
        reviews.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        reviews
    }
}

#[async_trait]
impl<S, R> ContentCommand for ContentService<S, R>
where
    S: UserStore,
    R: ReviewStore,
{
    async fn save_item(&self, actor: &Handle, item: CatalogItemId) -> Result<bool, Error> {
        self.mutate_sets(actor, |account| account.save_item(item))
            .await
    }

    async fn remove_saved(&self, actor: &Handle, item: CatalogItemId) -> Result<bool, Error> {
        self.mutate_sets(actor, |account| account.remove_saved(item))
            .await
    }

    async fn mark_watched(&self, actor: &Handle, item: CatalogItemId) -> Result<bool, Error> {
        self.mutate_sets(actor, |account| account.mark_watched(item))
            .await
    }

    async fn remove_watched(&self, actor: &Handle, item: CatalogItemId) -> Result<bool, Error> {
        self.mutate_sets(actor, |account| account.remove_watched(item))
            .await
    }

    async fn add_review(
        &self,
        actor: &Handle,
        item: CatalogItemId,
        review: NewReview,
    ) -> Result<Review, Error> {
        let review = Review::new(
            actor.clone(),
            item,
            review.rating,
            review.comment,
            self.clock.utc(),
        );
        self.reviews
            .add(review.clone())
            .await
            .map_err(Self::map_review_error)?;
        Ok(review)
    }
}

#[async_trait]
impl<S, R> ContentQuery for ContentService<S, R>
where
    S: UserStore,
    R: ReviewStore,
{
    async fn saved_items(&self, actor: &Handle) -> Result<Vec<CatalogItemId>, Error> {
        Ok(self.load(actor).await?.saved().to_vec())
    }

    async fn watched_items(&self, actor: &Handle) -> Result<Vec<CatalogItemId>, Error> {
        Ok(self.load(actor).await?.watched().to_vec())
    }

    async fn saved_items_of(
        &self,
        viewer: &Handle,
        target: &Handle,
    ) -> Result<Vec<CatalogItemId>, Error> {
        Ok(self.load_visible_to(viewer, target).await?.saved().to_vec())
    }

    async fn watched_items_of(
        &self,
        viewer: &Handle,
        target: &Handle,
    ) -> Result<Vec<CatalogItemId>, Error> {
        Ok(self
            .load_visible_to(viewer, target)
            .await?
            .watched()
            .to_vec())
    }

    async fn reviews_by(&self, actor: &Handle) -> Result<Vec<Review>, Error> {
        self.reviews
            .reviews_by(actor)
            .await
            .map(Self::newest_first)
            .map_err(Self::map_review_error)
    }

    async fn reviews_for_item(&self, item: CatalogItemId) -> Result<Vec<Review>, Error> {
        self.reviews
            .reviews_for_item(item)
            .await
            .map(Self::newest_first)
            .map_err(Self::map_review_error)
    }
}
