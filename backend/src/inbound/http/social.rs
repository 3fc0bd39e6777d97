//! Social graph handlers: the follow-request lifecycle.
//!
//! ```text
//! POST   /api/v1/social/requests/bob          ask to follow bob
//! POST   /api/v1/social/requests/bob/accept   approve bob's request
//! DELETE /api/v1/social/following/bob         stop following bob
//! ```

use crate::domain::{Error, Handle};
use crate::inbound::http::ApiResult;
use crate::inbound::http::context::RequestContext;
use crate::inbound::http::state::HttpState;
use actix_web::{delete, get, post, web};
use serde_json::json;

/// Parse a `{username}` path segment into a validated handle.
fn parse_handle(raw: &str) -> Result<Handle, Error> {
    Handle::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "username", "code": "invalid_username" }))
    })
}

/// Inbound pending follow requests for the caller.
#[utoipa::path(
    get,
    path = "/api/v1/social/requests",
    responses(
        (status = 200, description = "Usernames awaiting a decision", body = [String]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["social"],
    operation_id = "pendingFollowRequests"
)]
#[get("/social/requests")]
pub async fn pending_requests(
    state: web::Data<HttpState>,
    ctx: RequestContext,
) -> ApiResult<web::Json<Vec<Handle>>> {
    let identity = ctx.require_authenticated()?;
    let requests = state
        .social_query
        .pending_follow_requests(identity.handle())
        .await?;
    Ok(web::Json(requests))
}

/// Ask to follow another user.
///
/// The response reports whether a new request was created; `false` means
/// one was already pending or the follow is already approved.
#[utoipa::path(
    post,
    path = "/api/v1/social/requests/{username}",
    params(
        ("username" = String, Path, description = "User to follow")
    ),
    responses(
        (status = 200, description = "Whether a new request was created", body = bool),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Invalid operation", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["social"],
    operation_id = "sendFollowRequest"
)]
#[post("/social/requests/{username}")]
pub async fn send_request(
    state: web::Data<HttpState>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<bool>> {
    let identity = ctx.require_authenticated()?;
    let target = parse_handle(&path.into_inner())?;
    let created = state
        .social
        .send_follow_request(identity.handle(), &target)
        .await?;
    Ok(web::Json(created))
}

/// Approve a pending follow request.
#[utoipa::path(
    post,
    path = "/api/v1/social/requests/{username}/accept",
    params(
        ("username" = String, Path, description = "Requester to approve")
    ),
    responses(
        (status = 200, description = "Whether the request was approved", body = bool),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Invalid operation", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["social"],
    operation_id = "acceptFollowRequest"
)]
#[post("/social/requests/{username}/accept")]
pub async fn accept_request(
    state: web::Data<HttpState>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<bool>> {
    let identity = ctx.require_authenticated()?;
    let requester = parse_handle(&path.into_inner())?;
    let approved = state
        .social
        .accept_follow_request(identity.handle(), &requester)
        .await?;
    Ok(web::Json(approved))
}

/// Decline a pending follow request.
#[utoipa::path(
    post,
    path = "/api/v1/social/requests/{username}/reject",
    params(
        ("username" = String, Path, description = "Requester to decline")
    ),
    responses(
        (status = 200, description = "Whether the request was declined", body = bool),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Invalid operation", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["social"],
    operation_id = "rejectFollowRequest"
)]
#[post("/social/requests/{username}/reject")]
pub async fn reject_request(
    state: web::Data<HttpState>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<bool>> {
    let identity = ctx.require_authenticated()?;
    let requester = parse_handle(&path.into_inner())?;
    let declined = state
        .social
        .reject_follow_request(identity.handle(), &requester)
        .await?;
    Ok(web::Json(declined))
}

/// Withdraw the caller's own pending follow request.
#[utoipa::path(
    delete,
    path = "/api/v1/social/requests/{username}",
    params(
        ("username" = String, Path, description = "User the request was sent to")
    ),
    responses(
        (status = 200, description = "Whether the request was withdrawn", body = bool),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Invalid operation", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["social"],
    operation_id = "cancelFollowRequest"
)]
#[delete("/social/requests/{username}")]
pub async fn cancel_request(
    state: web::Data<HttpState>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<bool>> {
    let identity = ctx.require_authenticated()?;
    let target = parse_handle(&path.into_inner())?;
    let withdrawn = state
        .social
        .cancel_follow_request(identity.handle(), &target)
        .await?;
    Ok(web::Json(withdrawn))
}

/// Stop following a user.
#[utoipa::path(
    delete,
    path = "/api/v1/social/following/{username}",
    params(
        ("username" = String, Path, description = "User to stop following")
    ),
    responses(
        (status = 200, description = "Whether the follow was removed", body = bool),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Invalid operation", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["social"],
    operation_id = "unfollow"
)]
#[delete("/social/following/{username}")]
pub async fn unfollow(
    state: web::Data<HttpState>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<bool>> {
    let identity = ctx.require_authenticated()?;
    let target = parse_handle(&path.into_inner())?;
    let removed = state.social.unfollow(identity.handle(), &target).await?;
    Ok(web::Json(removed))
}

/// Detach a follower from the caller's follower set.
#[utoipa::path(
    delete,
    path = "/api/v1/social/followers/{username}",
    params(
        ("username" = String, Path, description = "Follower to detach")
    ),
    responses(
        (status = 200, description = "Whether the follower was detached", body = bool),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Invalid operation", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["social"],
    operation_id = "removeFollower"
)]
#[delete("/social/followers/{username}")]
pub async fn remove_follower(
    state: web::Data<HttpState>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<bool>> {
    let identity = ctx.require_authenticated()?;
    let follower = parse_handle(&path.into_inner())?;
    let detached = state
        .social
        .remove_follower(identity.handle(), &follower)
        .await?;
    Ok(web::Json(detached))
}
