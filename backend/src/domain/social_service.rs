//! Social graph domain service.
//!
//! Implements the follow-request state machine over the account store. Each
//! ordered pair of users is in exactly one of three states: no relationship,
//! pending (requester waits in the target's `follow_requests`), or approved
//! (requester in the target's `followers`, target in the requester's
//! `following`). Every transition that touches two records goes through
//! [`UserStore::put_pair`] so readers never observe half an approval.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    ProfileView, SocialGraphCommand, SocialGraphQuery, UserHit, UserStore, UserStoreError,
};
use crate::domain::{Account, Error, Handle, ports::OwnProfile};

/// Upper bound on user search hits.
const SEARCH_LIMIT: usize = 10;

/// Social graph service implementing the driving ports.
#[derive(Clone)]
pub struct SocialGraphService<S> {
    store: Arc<S>,
}

impl<S> SocialGraphService<S> {
    /// Create a new service over the given account store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S> SocialGraphService<S>
where
    S: UserStore,
{
    fn map_store_error(error: UserStoreError) -> Error {
        Error::internal(error.to_string())
    }

    async fn load(&self, handle: &Handle) -> Result<Account, Error> {
        self.store
            .find_by_handle(handle)
            .await
            .map_err(Self::map_store_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    async fn persist(&self, account: Account) -> Result<(), Error> {
        self.store.put(account).await.map_err(Self::map_store_error)
    }

    async fn persist_pair(&self, first: Account, second: Account) -> Result<(), Error> {
        self.store
            .put_pair(first, second)
            .await
            .map_err(Self::map_store_error)
    }
}

#[async_trait]
impl<S> SocialGraphCommand for SocialGraphService<S>
where
    S: UserStore,
{
    async fn send_follow_request(
        &self,
        requester: &Handle,
        target: &Handle,
    ) -> Result<bool, Error> {
        if requester == target {
            return Err(Error::invalid_operation("cannot follow yourself"));
        }
        let mut target_account = self.load(target).await?;
        if target_account.has_pending_request_from(requester)
            || target_account.has_follower(requester)
        {
            return Ok(false);
        }
        target_account.add_follow_request(requester.clone());
        self.persist(target_account).await?;
        Ok(true)
    }

    async fn accept_follow_request(
        &self,
        target: &Handle,
        requester: &Handle,
    ) -> Result<bool, Error> {
        let mut target_account = self.load(target).await?;
        if !target_account.has_pending_request_from(requester) {
            return Err(Error::invalid_operation("no such follow request"));
        }
        let mut requester_account = self.load(requester).await?;

        target_account.remove_follow_request(requester);
        target_account.add_follower(requester.clone());
        requester_account.add_following(target.clone());

        self.persist_pair(target_account, requester_account).await?;
        Ok(true)
    }

    async fn reject_follow_request(
        &self,
        target: &Handle,
        requester: &Handle,
    ) -> Result<bool, Error> {
        let mut target_account = self.load(target).await?;
        if !target_account.remove_follow_request(requester) {
            return Err(Error::invalid_operation("no such follow request"));
        }
        self.persist(target_account).await?;
        Ok(true)
    }

    async fn cancel_follow_request(
        &self,
        requester: &Handle,
        target: &Handle,
    ) -> Result<bool, Error> {
        let mut target_account = self.load(target).await?;
        if !target_account.remove_follow_request(requester) {
            return Err(Error::invalid_operation("no pending request for this user"));
        }
        self.persist(target_account).await?;
        Ok(true)
    }

    async fn unfollow(&self, actor: &Handle, target: &Handle) -> Result<bool, Error> {
        if actor == target {
            return Err(Error::invalid_operation("cannot unfollow yourself"));
        }
        let mut target_account = self.load(target).await?;
        let mut actor_account = self.load(actor).await?;
        if !actor_account.is_following(target) {
            return Err(Error::invalid_operation("not following this user"));
        }

        actor_account.remove_following(target);
        target_account.remove_follower(actor);

        self.persist_pair(actor_account, target_account).await?;
        Ok(true)
    }

    async fn remove_follower(&self, actor: &Handle, follower: &Handle) -> Result<bool, Error> {
        let mut follower_account = self.load(follower).await?;
        let mut actor_account = self.load(actor).await?;
        if !actor_account.has_follower(follower) {
            return Err(Error::invalid_operation("not a follower"));
        }

        actor_account.remove_follower(follower);
        follower_account.remove_following(actor);

        self.persist_pair(actor_account, follower_account).await?;
        Ok(true)
    }
}

#[async_trait]
impl<S> SocialGraphQuery for SocialGraphService<S>
where
    S: UserStore,
{
    async fn profile(
        &self,
        viewer: Option<Handle>,
        target: &Handle,
    ) -> Result<ProfileView, Error> {
        let target_account = self.load(target).await?;
        if target_account.permits_gated_view(viewer.as_ref()) {
            Ok(ProfileView::full(&target_account))
        } else {
            Ok(ProfileView::restricted(&target_account))
        }
    }

    async fn own_profile(&self, actor: &Handle) -> Result<OwnProfile, Error> {
        let account = self.load(actor).await?;
        Ok(OwnProfile::from(&account))
    }

    async fn followers(&self, target: &Handle) -> Result<Vec<Handle>, Error> {
        let account = self.load(target).await?;
        Ok(account.followers().to_vec())
    }

    async fn following(&self, target: &Handle) -> Result<Vec<Handle>, Error> {
        let account = self.load(target).await?;
        Ok(account.following().to_vec())
    }

    async fn pending_follow_requests(&self, actor: &Handle) -> Result<Vec<Handle>, Error> {
        let account = self.load(actor).await?;
        Ok(account.follow_requests().to_vec())
    }

    async fn search_users(&self, query: &str) -> Result<Vec<UserHit>, Error> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::invalid_request("search query must not be empty"));
        }
        let mut matches = self
            .store
            .search_by_handle(query)
            .await
            .map_err(Self::map_store_error)?;
        matches.sort_by(|a, b| a.handle().as_ref().cmp(b.handle().as_ref()));
        matches.truncate(SEARCH_LIMIT);
        Ok(matches.iter().map(UserHit::from).collect())
    }

    async fn is_username_available(&self, username: &str) -> Result<bool, Error> {
        let handle =
            Handle::new(username).map_err(|err| Error::invalid_request(err.to_string()))?;
        let existing = self
            .store
            .find_by_handle(&handle)
            .await
            .map_err(Self::map_store_error)?;
        Ok(existing.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserStore;
    use crate::domain::{Email, ErrorCode};
    use chrono::Utc;
    use rstest::rstest;
    use std::collections::HashMap;

    fn handle(value: &str) -> Handle {
        Handle::new(value).expect("valid handle")
    }

    fn account(name: &str) -> Account {
        Account::new(
            handle(name),
            Email::new(format!("{name}@example.com")).expect("valid email"),
            None,
            "$argon2id$stub".to_owned(),
            Utc::now(),
        )
    }

    /// Mock store serving lookups from the given accounts.
    fn store_with(accounts: Vec<Account>) -> MockUserStore {
        let by_handle: HashMap<Handle, Account> = accounts
            .into_iter()
            .map(|account| (account.handle().clone(), account))
            .collect();
        let mut store = MockUserStore::new();
        store
            .expect_find_by_handle()
            .returning(move |handle| Ok(by_handle.get(handle).cloned()));
        store
    }

    fn service(store: MockUserStore) -> SocialGraphService<MockUserStore> {
        SocialGraphService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn send_records_a_pending_request_without_touching_membership() {
        let mut store = store_with(vec![account("alice")]);
        store
            .expect_put()
            .times(1)
            .withf(|saved: &Account| {
                saved.handle() == &Handle::new("alice").expect("valid handle")
                    && saved.has_pending_request_from(&Handle::new("bob").expect("valid handle"))
                    && saved.followers().is_empty()
                    && saved.following().is_empty()
            })
            .returning(|_| Ok(()));

        let changed = service(store)
            .send_follow_request(&handle("bob"), &handle("alice"))
            .await
            .expect("send succeeds");
        assert!(changed);
    }

    #[tokio::test]
    async fn resending_a_pending_request_is_a_non_error_no_op() {
        let mut alice = account("alice");
        alice.add_follow_request(handle("bob"));
        let mut store = store_with(vec![alice]);
        store.expect_put().times(0);

        let changed = service(store)
            .send_follow_request(&handle("bob"), &handle("alice"))
            .await
            .expect("send succeeds");
        assert!(!changed);
    }

    #[tokio::test]
    async fn sending_to_an_approved_target_is_a_non_error_no_op() {
        let mut alice = account("alice");
        alice.add_follower(handle("bob"));
        let mut store = store_with(vec![alice]);
        store.expect_put().times(0);

        let changed = service(store)
            .send_follow_request(&handle("bob"), &handle("alice"))
            .await
            .expect("send succeeds");
        assert!(!changed);
    }

    #[tokio::test]
    async fn sending_to_yourself_is_rejected() {
        let mut store = MockUserStore::new();
        store.expect_find_by_handle().times(0);
        store.expect_put().times(0);

        let err = service(store)
            .send_follow_request(&handle("bob"), &handle("bob"))
            .await
            .expect_err("self-follow must fail");
        assert_eq!(err.code(), ErrorCode::InvalidOperation);
        assert_eq!(err.message(), "cannot follow yourself");
    }

    #[tokio::test]
    async fn sending_to_a_missing_user_is_not_found() {
        let store = store_with(vec![]);
        let err = service(store)
            .send_follow_request(&handle("bob"), &handle("ghost"))
            .await
            .expect_err("missing target must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "user not found");
    }

    #[tokio::test]
    async fn accept_moves_the_pair_into_mutual_membership_in_one_write() {
        let mut alice = account("alice");
        alice.add_follow_request(handle("bob"));
        let mut store = store_with(vec![alice, account("bob")]);
        store
            .expect_put_pair()
            .times(1)
            .withf(|target: &Account, requester: &Account| {
                let bob = Handle::new("bob").expect("valid handle");
                let alice = Handle::new("alice").expect("valid handle");
                target.handle() == &alice
                    && !target.has_pending_request_from(&bob)
                    && target.has_follower(&bob)
                    && requester.handle() == &bob
                    && requester.is_following(&alice)
            })
            .returning(|_, _| Ok(()));

        let changed = service(store)
            .accept_follow_request(&handle("alice"), &handle("bob"))
            .await
            .expect("accept succeeds");
        assert!(changed);
    }

    #[tokio::test]
    async fn accept_without_a_pending_request_is_rejected() {
        let mut store = store_with(vec![account("alice"), account("bob")]);
        store.expect_put_pair().times(0);

        let err = service(store)
            .accept_follow_request(&handle("alice"), &handle("bob"))
            .await
            .expect_err("no pending request");
        assert_eq!(err.code(), ErrorCode::InvalidOperation);
        assert_eq!(err.message(), "no such follow request");
    }

    #[tokio::test]
    async fn reject_discards_the_pending_request_only() {
        let mut alice = account("alice");
        alice.add_follow_request(handle("bob"));
        let mut store = store_with(vec![alice]);
        store
            .expect_put()
            .times(1)
            .withf(|saved: &Account| {
                saved.follow_requests().is_empty() && saved.followers().is_empty()
            })
            .returning(|_| Ok(()));

        let changed = service(store)
            .reject_follow_request(&handle("alice"), &handle("bob"))
            .await
            .expect("reject succeeds");
        assert!(changed);
    }

    #[tokio::test]
    async fn cancel_withdraws_the_callers_own_request() {
        let mut alice = account("alice");
        alice.add_follow_request(handle("bob"));
        let mut store = store_with(vec![alice]);
        store
            .expect_put()
            .times(1)
            .withf(|saved: &Account| saved.follow_requests().is_empty())
            .returning(|_| Ok(()));

        let changed = service(store)
            .cancel_follow_request(&handle("bob"), &handle("alice"))
            .await
            .expect("cancel succeeds");
        assert!(changed);
    }

    #[tokio::test]
    async fn cancel_without_a_pending_request_is_rejected() {
        let store = store_with(vec![account("alice")]);
        let err = service(store)
            .cancel_follow_request(&handle("bob"), &handle("alice"))
            .await
            .expect_err("nothing to cancel");
        assert_eq!(err.code(), ErrorCode::InvalidOperation);
        assert_eq!(err.message(), "no pending request for this user");
    }

    #[tokio::test]
    async fn unfollow_detaches_both_sides_in_one_write() {
        let mut bob = account("bob");
        bob.add_following(handle("alice"));
        let mut alice = account("alice");
        alice.add_follower(handle("bob"));
        let mut store = store_with(vec![alice, bob]);
        store
            .expect_put_pair()
            .times(1)
            .withf(|actor: &Account, target: &Account| {
                actor.following().is_empty() && target.followers().is_empty()
            })
            .returning(|_, _| Ok(()));

        let changed = service(store)
            .unfollow(&handle("bob"), &handle("alice"))
            .await
            .expect("unfollow succeeds");
        assert!(changed);
    }

    #[tokio::test]
    async fn unfollow_of_a_non_followed_target_is_rejected() {
        let mut store = store_with(vec![account("alice"), account("bob")]);
        store.expect_put_pair().times(0);

        let err = service(store)
            .unfollow(&handle("bob"), &handle("alice"))
            .await
            .expect_err("not following");
        assert_eq!(err.code(), ErrorCode::InvalidOperation);
        assert_eq!(err.message(), "not following this user");
    }

    #[tokio::test]
    async fn unfollowing_yourself_is_rejected() {
        let store = store_with(vec![account("bob")]);
        let err = service(store)
            .unfollow(&handle("bob"), &handle("bob"))
            .await
            .expect_err("self unfollow must fail");
        assert_eq!(err.code(), ErrorCode::InvalidOperation);
        assert_eq!(err.message(), "cannot unfollow yourself");
    }

    #[tokio::test]
    async fn remove_follower_detaches_both_sides() {
        let mut alice = account("alice");
        alice.add_follower(handle("carol"));
        let mut carol = account("carol");
        carol.add_following(handle("alice"));
        let mut store = store_with(vec![alice, carol]);
        store
            .expect_put_pair()
            .times(1)
            .withf(|actor: &Account, follower: &Account| {
                actor.followers().is_empty() && follower.following().is_empty()
            })
            .returning(|_, _| Ok(()));

        let changed = service(store)
            .remove_follower(&handle("alice"), &handle("carol"))
            .await
            .expect("removal succeeds");
        assert!(changed);
    }

    #[tokio::test]
    async fn removing_a_non_follower_is_rejected() {
        let mut store = store_with(vec![account("alice"), account("carol")]);
        store.expect_put_pair().times(0);

        let err = service(store)
            .remove_follower(&handle("alice"), &handle("carol"))
            .await
            .expect_err("not a follower");
        assert_eq!(err.code(), ErrorCode::InvalidOperation);
        assert_eq!(err.message(), "not a follower");
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some("carol"), true)]
    #[case(Some("bob"), false)]
    #[case(Some("alice"), false)]
    #[tokio::test]
    async fn profile_withholds_gated_lists_from_non_followers(
        #[case] viewer: Option<&str>,
        #[case] expect_restricted: bool,
    ) {
        let mut alice = account("alice");
        alice.add_follower(handle("bob"));
        let store = store_with(vec![alice]);

        let view = service(store)
            .profile(viewer.map(handle), &handle("alice"))
            .await
            .expect("profile loads");
        assert_eq!(view.restricted, expect_restricted);
        assert_eq!(view.followers.is_none(), expect_restricted);
        assert_eq!(view.username, handle("alice"));
    }

    #[tokio::test]
    async fn own_profile_returns_the_full_record() {
        let mut alice = account("alice");
        alice.add_follow_request(handle("bob"));
        let store = store_with(vec![alice]);

        let profile = service(store)
            .own_profile(&handle("alice"))
            .await
            .expect("profile loads");
        assert_eq!(profile.username, handle("alice"));
        assert_eq!(profile.follow_requests, vec![handle("bob")]);
    }

    #[tokio::test]
    async fn pending_requests_list_the_inbound_handles() {
        let mut alice = account("alice");
        alice.add_follow_request(handle("bob"));
        alice.add_follow_request(handle("carol"));
        let store = store_with(vec![alice]);

        let pending = service(store)
            .pending_follow_requests(&handle("alice"))
            .await
            .expect("pending loads");
        assert_eq!(pending, vec![handle("bob"), handle("carol")]);
    }

    #[tokio::test]
    async fn search_sorts_by_handle_and_caps_the_hits() {
        let accounts: Vec<Account> = (0..12).map(|n| account(&format!("user_{n:02}"))).collect();
        let mut store = MockUserStore::new();
        store
            .expect_search_by_handle()
            .times(1)
            .withf(|query: &str| query == "user")
            .returning(move |_| Ok(accounts.clone().into_iter().rev().collect()));

        let hits = service(store)
            .search_users("  user  ")
            .await
            .expect("search succeeds");
        assert_eq!(hits.len(), 10);
        assert_eq!(hits[0].username, handle("user_00"));
        assert_eq!(hits[9].username, handle("user_09"));
    }

    #[tokio::test]
    async fn search_rejects_a_blank_query() {
        let mut store = MockUserStore::new();
        store.expect_search_by_handle().times(0);

        let err = service(store)
            .search_users("   ")
            .await
            .expect_err("blank query must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case("alice", false)]
    #[case("newcomer", true)]
    #[tokio::test]
    async fn availability_reflects_the_store(#[case] username: &str, #[case] expected: bool) {
        let store = store_with(vec![account("alice")]);
        let available = service(store)
            .is_username_available(username)
            .await
            .expect("probe succeeds");
        assert_eq!(available, expected);
    }

    #[tokio::test]
    async fn availability_rejects_malformed_handles() {
        let store = store_with(vec![]);
        let err = service(store)
            .is_username_available("a!")
            .await
            .expect_err("malformed handle must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn store_failures_surface_as_internal_errors() {
        let mut store = MockUserStore::new();
        store
            .expect_find_by_handle()
            .returning(|_| Err(UserStoreError::io("disk full")));

        let err = service(store)
            .followers(&handle("alice"))
            .await
            .expect_err("store failure surfaces");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
