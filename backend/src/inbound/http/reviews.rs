//! Review listing handlers.

use crate::domain::{Error, Review};
use crate::inbound::http::ApiResult;
use crate::inbound::http::context::RequestContext;
use crate::inbound::http::state::HttpState;
use actix_web::{get, web};

/// The caller's own reviews, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/reviews/mine",
    responses(
        (status = 200, description = "The caller's reviews", body = [Review]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "myReviews"
)]
#[get("/reviews/mine")]
pub async fn my_reviews(
    state: web::Data<HttpState>,
    ctx: RequestContext,
) -> ApiResult<web::Json<Vec<Review>>> {
    let identity = ctx.require_authenticated()?;
    let reviews = state.content_query.reviews_by(identity.handle()).await?;
    Ok(web::Json(reviews))
}
