//! User directory and profile handlers.
//!
//! ```text
//! GET /api/v1/users/me
//! GET /api/v1/users/search?q=ali
//! GET /api/v1/users/alice_90/followers
//! ```

use crate::domain::ports::{OwnProfile, ProfileView, UserHit};
use crate::domain::{CatalogItemId, Error, Handle};
use crate::inbound::http::ApiResult;
use crate::inbound::http::context::RequestContext;
use crate::inbound::http::state::HttpState;
use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

/// Query parameters for the user directory search.
///
/// `q` is optional at the extraction layer so a missing parameter surfaces
/// as a domain validation error rather than a bare deserialisation failure.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Query parameters for the username availability probe.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AvailableQuery {
    pub username: Option<String>,
}

/// Parse a `{username}` path segment into a validated handle.
fn parse_handle(raw: &str) -> Result<Handle, Error> {
    Handle::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "username", "code": "invalid_username" }))
    })
}

/// The caller's own account in full, including inbound follow requests.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "The caller's profile", body = OwnProfile),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "me"
)]
#[get("/users/me")]
pub async fn me(
    state: web::Data<HttpState>,
    ctx: RequestContext,
) -> ApiResult<web::Json<OwnProfile>> {
    let identity = ctx.require_authenticated()?;
    let profile = state.social_query.own_profile(identity.handle()).await?;
    Ok(web::Json(profile))
}

/// Search the user directory by username substring.
///
/// Matching is case-insensitive and capped at ten hits. Open to anonymous
/// callers so signup flows can suggest people to follow.
#[utoipa::path(
    get,
    path = "/api/v1/users/search",
    params(
        ("q" = String, Query, description = "Substring to match against usernames")
    ),
    responses(
        (status = 200, description = "Matching users", body = [UserHit]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "searchUsers",
    security([])
)]
#[get("/users/search")]
pub async fn search(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<Vec<UserHit>>> {
    let needle = query.into_inner().q.unwrap_or_default();
    let hits = state.social_query.search_users(&needle).await?;
    Ok(web::Json(hits))
}

/// Whether a username is well-formed and not yet taken.
#[utoipa::path(
    get,
    path = "/api/v1/users/available",
    params(
        ("username" = String, Query, description = "Candidate username")
    ),
    responses(
        (status = 200, description = "Availability", body = bool),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "isUsernameAvailable",
    security([])
)]
#[get("/users/available")]
pub async fn available(
    state: web::Data<HttpState>,
    query: web::Query<AvailableQuery>,
) -> ApiResult<web::Json<bool>> {
    let candidate = query.into_inner().username.unwrap_or_default();
    let available = state
        .social_query
        .is_username_available(&candidate)
        .await?;
    Ok(web::Json(available))
}

/// A user's profile as seen by the caller.
///
/// Anonymous callers and non-followers get the restricted view; the subject
/// and approved followers get the full view with all four lists.
#[utoipa::path(
    get,
    path = "/api/v1/users/{username}",
    params(
        ("username" = String, Path, description = "Subject username")
    ),
    responses(
        (status = 200, description = "Profile", body = ProfileView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "userProfile",
    security([])
)]
#[get("/users/{username}")]
pub async fn profile(
    state: web::Data<HttpState>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProfileView>> {
    let target = parse_handle(&path.into_inner())?;
    let view = state.social_query.profile(ctx.viewer(), &target).await?;
    Ok(web::Json(view))
}

/// Approved followers of a user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{username}/followers",
    params(
        ("username" = String, Path, description = "Subject username")
    ),
    responses(
        (status = 200, description = "Follower usernames", body = [String]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "followers"
)]
#[get("/users/{username}/followers")]
pub async fn followers(
    state: web::Data<HttpState>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Handle>>> {
    ctx.require_authenticated()?;
    let target = parse_handle(&path.into_inner())?;
    let handles = state.social_query.followers(&target).await?;
    Ok(web::Json(handles))
}

/// Accounts a user follows.
#[utoipa::path(
    get,
    path = "/api/v1/users/{username}/following",
    params(
        ("username" = String, Path, description = "Subject username")
    ),
    responses(
        (status = 200, description = "Followed usernames", body = [String]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "following"
)]
#[get("/users/{username}/following")]
pub async fn following(
    state: web::Data<HttpState>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Handle>>> {
    ctx.require_authenticated()?;
    let target = parse_handle(&path.into_inner())?;
    let handles = state.social_query.following(&target).await?;
    Ok(web::Json(handles))
}

/// Another user's saved movies. Requires approved-follower status.
#[utoipa::path(
    get,
    path = "/api/v1/users/{username}/saved",
    params(
        ("username" = String, Path, description = "Owner username")
    ),
    responses(
        (status = 200, description = "Saved movie identifiers", body = [CatalogItemId]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "userSavedMovies"
)]
#[get("/users/{username}/saved")]
pub async fn user_saved(
    state: web::Data<HttpState>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<CatalogItemId>>> {
    let identity = ctx.require_authenticated()?;
    let owner = parse_handle(&path.into_inner())?;
    let items = state
        .content_query
        .saved_items_of(identity.handle(), &owner)
        .await?;
    Ok(web::Json(items))
}

/// Another user's watched movies. Requires approved-follower status.
#[utoipa::path(
    get,
    path = "/api/v1/users/{username}/watched",
    params(
        ("username" = String, Path, description = "Owner username")
    ),
    responses(
        (status = 200, description = "Watched movie identifiers", body = [CatalogItemId]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "userWatchedMovies"
)]
#[get("/users/{username}/watched")]
pub async fn user_watched(
    state: web::Data<HttpState>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<CatalogItemId>>> {
    let identity = ctx.require_authenticated()?;
    let owner = parse_handle(&path.into_inner())?;
    let items = state
        .content_query
        .watched_items_of(identity.handle(), &owner)
        .await?;
    Ok(web::Json(items))
}
