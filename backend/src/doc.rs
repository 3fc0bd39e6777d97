//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer (auth, users,
//!   social, movies, reviews, health)
//! - **Schemas**: Domain types and request payloads referenced by those
//!   endpoints
//! - **Security**: Bearer token authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::domain::ports::{AccountSummary, LoginOutcome, OwnProfile, ProfileView, UserHit};
use crate::domain::{CatalogItemId, Error, ErrorCode, Rating, Review};
use crate::inbound::http::auth::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, VerifyRequest,
};
use crate::inbound::http::movies::ReviewRequest;
use crate::inbound::http::users::{AvailableQuery, SearchQuery};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Signed token issued by POST /api/v1/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Movie backlog backend API",
        description = "HTTP interface for account management, movie tracking, \
                       reviews, and the follow-request social graph.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::verify,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::forgot_password,
        crate::inbound::http::auth::reset_password,
        crate::inbound::http::users::me,
        crate::inbound::http::users::search,
        crate::inbound::http::users::available,
        crate::inbound::http::users::profile,
        crate::inbound::http::users::followers,
        crate::inbound::http::users::following,
        crate::inbound::http::users::user_saved,
        crate::inbound::http::users::user_watched,
        crate::inbound::http::social::pending_requests,
        crate::inbound::http::social::send_request,
        crate::inbound::http::social::accept_request,
        crate::inbound::http::social::reject_request,
        crate::inbound::http::social::cancel_request,
        crate::inbound::http::social::unfollow,
        crate::inbound::http::social::remove_follower,
        crate::inbound::http::movies::save_for_later,
        crate::inbound::http::movies::remove_from_saved,
        crate::inbound::http::movies::mark_as_watched,
        crate::inbound::http::movies::remove_from_watched,
        crate::inbound::http::movies::my_saved,
        crate::inbound::http::movies::my_watched,
        crate::inbound::http::movies::add_review,
        crate::inbound::http::movies::reviews_for_movie,
        crate::inbound::http::reviews::my_reviews,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        AccountSummary,
        LoginOutcome,
        OwnProfile,
        ProfileView,
        UserHit,
        Review,
        Rating,
        CatalogItemId,
        RegisterRequest,
        VerifyRequest,
        LoginRequest,
        ForgotPasswordRequest,
        ResetPasswordRequest,
        ReviewRequest,
        SearchQuery,
        AvailableQuery,
    )),
    tags(
        (name = "auth", description = "Registration, verification, and credential flows"),
        (name = "users", description = "User directory and profiles"),
        (name = "social", description = "Follow requests and the social graph"),
        (name = "movies", description = "Saved/watched sets and reviews"),
        (name = "reviews", description = "Review listings"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
