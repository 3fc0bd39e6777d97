//! Domain primitives, aggregates, services, and ports.
//!
//! Purpose: Define strongly typed domain entities and the use-case services
//! over them. Keep types immutable where possible and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc. Ports live in
//! [`ports`]; adapters implement the driven side, handlers call the driving
//! side.

pub mod account;
pub mod auth;
pub mod catalog;
pub mod content_service;
pub mod credential_service;
pub mod error;
pub mod handle;
pub mod ports;
pub mod review;
pub mod social_service;
pub mod token;

pub use self::account::{Account, AccountValidationError, DisplayName, Email, OneTimeCode};
pub use self::auth::{CredentialValidationError, LoginCredentials, Registration};
pub use self::catalog::CatalogItemId;
pub use self::content_service::ContentService;
pub use self::credential_service::CredentialServiceImpl;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::handle::{Handle, HandleValidationError};
pub use self::review::{Rating, Review, ReviewValidationError};
pub use self::social_service::SocialGraphService;
pub use self::token::{DEFAULT_TOKEN_TTL_SECONDS, TokenSigner};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
