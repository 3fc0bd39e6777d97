//! Movie interaction handlers: saved/watched sets and reviews.
//!
//! ```text
//! POST /api/v1/movies/603/saved
//! GET  /api/v1/movies/watched
//! POST /api/v1/movies/603/reviews {"rating":4,"comment":"tight pacing"}
//! ```
//!
//! Movie identifiers are opaque catalog ids; the backend stores and returns
//! them without resolving them against the catalog.

use crate::domain::ports::NewReview;
use crate::domain::{CatalogItemId, Error, Rating, Review, ReviewValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::context::RequestContext;
use crate::inbound::http::state::HttpState;
use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Request payload for creating a review.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Parse an `{item}` path segment into a catalog item id.
fn parse_item(raw: &str) -> Result<CatalogItemId, Error> {
    raw.parse::<i64>().map(CatalogItemId::new).map_err(|_| {
        Error::invalid_request("movie id must be an integer")
            .with_details(json!({ "field": "item", "code": "invalid_movie_id" }))
    })
}

fn map_review_validation_error(err: ReviewValidationError) -> Error {
    match err {
        ReviewValidationError::RatingOutOfRange { .. } => Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "rating", "code": "rating_out_of_range" })),
    }
}

/// Add a movie to the caller's saved list.
#[utoipa::path(
    post,
    path = "/api/v1/movies/{item}/saved",
    params(
        ("item" = i64, Path, description = "Catalog movie identifier")
    ),
    responses(
        (status = 200, description = "Whether the movie was newly added", body = bool),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["movies"],
    operation_id = "saveForLater"
)]
#[post("/movies/{item}/saved")]
pub async fn save_for_later(
    state: web::Data<HttpState>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<bool>> {
    let identity = ctx.require_authenticated()?;
    let item = parse_item(&path.into_inner())?;
    let added = state.content.save_item(identity.handle(), item).await?;
    Ok(web::Json(added))
}

/// Remove a movie from the caller's saved list.
#[utoipa::path(
    delete,
    path = "/api/v1/movies/{item}/saved",
    params(
        ("item" = i64, Path, description = "Catalog movie identifier")
    ),
    responses(
        (status = 200, description = "Whether the movie was present", body = bool),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["movies"],
    operation_id = "removeFromSaved"
)]
#[delete("/movies/{item}/saved")]
pub async fn remove_from_saved(
    state: web::Data<HttpState>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<bool>> {
    let identity = ctx.require_authenticated()?;
    let item = parse_item(&path.into_inner())?;
    let removed = state.content.remove_saved(identity.handle(), item).await?;
    Ok(web::Json(removed))
}

/// Mark a movie as watched.
#[utoipa::path(
    post,
    path = "/api/v1/movies/{item}/watched",
    params(
        ("item" = i64, Path, description = "Catalog movie identifier")
    ),
    responses(
        (status = 200, description = "Whether the movie was newly marked", body = bool),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["movies"],
    operation_id = "markAsWatched"
)]
#[post("/movies/{item}/watched")]
pub async fn mark_as_watched(
    state: web::Data<HttpState>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<bool>> {
    let identity = ctx.require_authenticated()?;
    let item = parse_item(&path.into_inner())?;
    let added = state.content.mark_watched(identity.handle(), item).await?;
    Ok(web::Json(added))
}

/// Remove a movie from the caller's watched list.
#[utoipa::path(
    delete,
    path = "/api/v1/movies/{item}/watched",
    params(
        ("item" = i64, Path, description = "Catalog movie identifier")
    ),
    responses(
        (status = 200, description = "Whether the movie was present", body = bool),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["movies"],
    operation_id = "removeFromWatched"
)]
#[delete("/movies/{item}/watched")]
pub async fn remove_from_watched(
    state: web::Data<HttpState>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<bool>> {
    let identity = ctx.require_authenticated()?;
    let item = parse_item(&path.into_inner())?;
    let removed = state.content.remove_watched(identity.handle(), item).await?;
    Ok(web::Json(removed))
}

/// The caller's saved movies.
#[utoipa::path(
    get,
    path = "/api/v1/movies/saved",
    responses(
        (status = 200, description = "Saved movie identifiers", body = [CatalogItemId]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["movies"],
    operation_id = "mySavedMovies"
)]
#[get("/movies/saved")]
pub async fn my_saved(
    state: web::Data<HttpState>,
    ctx: RequestContext,
) -> ApiResult<web::Json<Vec<CatalogItemId>>> {
    let identity = ctx.require_authenticated()?;
    let items = state.content_query.saved_items(identity.handle()).await?;
    Ok(web::Json(items))
}

/// The caller's watched movies.
#[utoipa::path(
    get,
    path = "/api/v1/movies/watched",
    responses(
        (status = 200, description = "Watched movie identifiers", body = [CatalogItemId]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["movies"],
    operation_id = "myWatchedMovies"
)]
#[get("/movies/watched")]
pub async fn my_watched(
    state: web::Data<HttpState>,
    ctx: RequestContext,
) -> ApiResult<web::Json<Vec<CatalogItemId>>> {
    let identity = ctx.require_authenticated()?;
    let items = state.content_query.watched_items(identity.handle()).await?;
    Ok(web::Json(items))
}

/// Publish an immutable review of a movie.
///
/// Reviews are append-only: there is no update or delete, and one account
/// may review the same movie repeatedly.
#[utoipa::path(
    post,
    path = "/api/v1/movies/{item}/reviews",
    request_body = ReviewRequest,
    params(
        ("item" = i64, Path, description = "Catalog movie identifier")
    ),
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["movies"],
    operation_id = "addReview"
)]
#[post("/movies/{item}/reviews")]
pub async fn add_review(
    state: web::Data<HttpState>,
    ctx: RequestContext,
    path: web::Path<String>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<HttpResponse> {
    let identity = ctx.require_authenticated()?;
    let item = parse_item(&path.into_inner())?;
    let body = payload.into_inner();
    let rating = Rating::new(body.rating).map_err(map_review_validation_error)?;
    let review = state
        .content
        .add_review(identity.handle(), item, NewReview::new(rating, body.comment))
        .await?;
    Ok(HttpResponse::Created().json(review))
}

/// All reviews of a movie, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/movies/{item}/reviews",
    params(
        ("item" = i64, Path, description = "Catalog movie identifier")
    ),
    responses(
        (status = 200, description = "Reviews of the movie", body = [Review]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["movies"],
    operation_id = "reviewsForMovie",
    security([])
)]
#[get("/movies/{item}/reviews")]
pub async fn reviews_for_movie(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Review>>> {
    let item = parse_item(&path.into_inner())?;
    let reviews = state.content_query.reviews_for_item(item).await?;
    Ok(web::Json(reviews))
}
