//! Driving ports for the social graph.
//!
//! Split into a command port (follow-request state machine mutations) and a
//! query port (profile and list reads with gated visibility), so handlers
//! depend only on the half they drive.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Account, CatalogItemId, Error, Handle};

/// Search hit for the user directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserHit {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: Uuid,
    #[schema(value_type = String, example = "alice_90")]
    pub username: Handle,
}

impl From<&Account> for UserHit {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id(),
            username: account.handle().clone(),
        }
    }
}

/// Another user's profile as seen by a viewer.
///
/// The four gated lists are present only when the viewer is the subject or
/// an approved follower; otherwise `restricted` is set and the lists are
/// omitted entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    #[schema(value_type = String, example = "alice_90")]
    pub username: Handle,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    #[schema(value_type = Option<String>, example = "Alice")]
    pub display_name: Option<String>,
    pub restricted: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    #[schema(value_type = Option<Vec<String>>)]
    pub followers: Option<Vec<Handle>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    #[schema(value_type = Option<Vec<String>>)]
    pub following: Option<Vec<Handle>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub saved: Option<Vec<CatalogItemId>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub watched: Option<Vec<CatalogItemId>>,
}

impl ProfileView {
    /// Full view for the subject or an approved follower.
    pub fn full(account: &Account) -> Self {
        Self {
            username: account.handle().clone(),
            display_name: account.display_name().map(|name| name.as_ref().to_owned()),
            restricted: false,
            followers: Some(account.followers().to_vec()),
            following: Some(account.following().to_vec()),
            saved: Some(account.saved().to_vec()),
            watched: Some(account.watched().to_vec()),
        }
    }

    /// Public-fields-only view for everyone else.
    pub fn restricted(account: &Account) -> Self {
        Self {
            username: account.handle().clone(),
            display_name: account.display_name().map(|name| name.as_ref().to_owned()),
            restricted: true,
            followers: None,
            following: None,
            saved: None,
            watched: None,
        }
    }
}

/// The caller's own account in full, including inbound pending requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnProfile {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: Uuid,
    #[schema(value_type = String, example = "alice_90")]
    pub username: Handle,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    #[schema(value_type = Option<String>, example = "Alice")]
    pub display_name: Option<String>,
    #[schema(value_type = String, example = "alice@example.com")]
    pub email: String,
    pub verified: bool,
    #[schema(value_type = Vec<String>)]
    pub followers: Vec<Handle>,
    #[schema(value_type = Vec<String>)]
    pub following: Vec<Handle>,
    #[schema(value_type = Vec<String>)]
    pub follow_requests: Vec<Handle>,
    pub saved: Vec<CatalogItemId>,
    pub watched: Vec<CatalogItemId>,
}

impl From<&Account> for OwnProfile {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id(),
            username: account.handle().clone(),
            display_name: account.display_name().map(|name| name.as_ref().to_owned()),
            email: account.email().as_ref().to_owned(),
            verified: account.is_verified(),
            followers: account.followers().to_vec(),
            following: account.following().to_vec(),
            follow_requests: account.follow_requests().to_vec(),
            saved: account.saved().to_vec(),
            watched: account.watched().to_vec(),
        }
    }
}

/// Domain use-case port for follow-request state machine mutations.
///
/// All operations return whether state changed; the only non-error `false`
/// is the idempotent re-send of an existing or already-approved request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialGraphCommand: Send + Sync {
    /// Ask to follow `target`. `Ok(false)` when already pending or approved.
    async fn send_follow_request(
        &self,
        requester: &Handle,
        target: &Handle,
    ) -> Result<bool, Error>;

    /// Approve a pending request from `requester`.
    async fn accept_follow_request(
        &self,
        target: &Handle,
        requester: &Handle,
    ) -> Result<bool, Error>;

    /// Decline a pending request from `requester`.
    async fn reject_follow_request(
        &self,
        target: &Handle,
        requester: &Handle,
    ) -> Result<bool, Error>;

    /// Withdraw the caller's own pending request to `target`.
    async fn cancel_follow_request(
        &self,
        requester: &Handle,
        target: &Handle,
    ) -> Result<bool, Error>;

    /// Stop following `target`.
    async fn unfollow(&self, actor: &Handle, target: &Handle) -> Result<bool, Error>;

    /// Detach `follower` from the caller's follower set.
    async fn remove_follower(&self, actor: &Handle, follower: &Handle) -> Result<bool, Error>;
}

/// Domain use-case port for social graph reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialGraphQuery: Send + Sync {
    /// A user's profile as seen by `viewer` (anonymous when `None`).
    async fn profile(
        &self,
        viewer: Option<Handle>,
        target: &Handle,
    ) -> Result<ProfileView, Error>;

    /// The caller's own account in full.
    async fn own_profile(&self, actor: &Handle) -> Result<OwnProfile, Error>;

    /// Approved followers of `target`, visible to any authenticated caller.
    async fn followers(&self, target: &Handle) -> Result<Vec<Handle>, Error>;

    /// Accounts `target` follows, visible to any authenticated caller.
    async fn following(&self, target: &Handle) -> Result<Vec<Handle>, Error>;

    /// Inbound pending follow requests for `actor`.
    async fn pending_follow_requests(&self, actor: &Handle) -> Result<Vec<Handle>, Error>;

    /// Case-insensitive substring search over handles, capped at ten hits.
    async fn search_users(&self, query: &str) -> Result<Vec<UserHit>, Error>;

    /// Whether `username` is well-formed and not yet taken.
    async fn is_username_available(&self, username: &str) -> Result<bool, Error>;
}
