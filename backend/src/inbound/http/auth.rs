//! Account and credential API handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"username":"alice_90","email":"alice@example.com","password":"hunter2"}
//! POST /api/v1/auth/login {"email":"alice@example.com","password":"hunter2"}
//! ```

use crate::domain::ports::{AccountSummary, LoginOutcome};
use crate::domain::{CredentialValidationError, Email, Error, LoginCredentials, Registration};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Registration request body for `POST /api/v1/auth/register`.
///
/// Example JSON:
/// `{"username":"alice_90","email":"alice@example.com","password":"hunter2"}`
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = CredentialValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.username,
            &value.email,
            &value.password,
            value.display_name.as_deref(),
        )
    }
}

/// Verification request body for `POST /api/v1/auth/verify`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub email: String,
    pub code: String,
}

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = CredentialValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Reset-request body for `POST /api/v1/auth/forgot-password`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Password replacement body for `POST /api/v1/auth/reset-password`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

fn map_credential_validation_error(err: CredentialValidationError) -> Error {
    match err {
        CredentialValidationError::Email(err) => Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "email", "code": "invalid_email" })),
        CredentialValidationError::Handle(err) => Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "username", "code": "invalid_username" })),
        CredentialValidationError::DisplayName(err) => Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "displayName", "code": "invalid_display_name" })),
        CredentialValidationError::EmptyPassword => {
            Error::invalid_request("password must not be empty")
                .with_details(json!({ "field": "password", "code": "empty_password" }))
        }
    }
}

fn parse_email(raw: &str) -> Result<Email, Error> {
    Email::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "email", "code": "invalid_email" }))
    })
}

/// Create an account and dispatch an email verification code.
///
/// Uses the centralised `Error` type so clients get a consistent
/// error schema across all endpoints.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created; verification code emailed", body = AccountSummary),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email or username already taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration =
        Registration::try_from(payload.into_inner()).map_err(map_credential_validation_error)?;
    let summary = state.credentials.register(&registration).await?;
    Ok(HttpResponse::Created().json(summary))
}

/// Confirm an emailed verification code.
#[utoipa::path(
    post,
    path = "/api/v1/auth/verify",
    request_body = VerifyRequest,
    responses(
        (status = 204, description = "Account verified"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "No account for this email", body = Error),
        (status = 409, description = "Invalid or expired code", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "verifyCode",
    security([])
)]
#[post("/auth/verify")]
pub async fn verify(
    state: web::Data<HttpState>,
    payload: web::Json<VerifyRequest>,
) -> ApiResult<HttpResponse> {
    let email = parse_email(&payload.email)?;
    state.credentials.verify_code(&email, &payload.code).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Authenticate and issue a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginOutcome),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginOutcome>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_credential_validation_error)?;
    let outcome = state.credentials.login(&credentials).await?;
    Ok(web::Json(outcome))
}

/// Stage a password-reset code and email it to the account holder.
#[utoipa::path(
    post,
    path = "/api/v1/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 204, description = "Reset code emailed"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "No account for this email", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "forgotPassword",
    security([])
)]
#[post("/auth/forgot-password")]
pub async fn forgot_password(
    state: web::Data<HttpState>,
    payload: web::Json<ForgotPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let email = parse_email(&payload.email)?;
    state.credentials.request_password_reset(&email).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Replace the password after checking the emailed reset code.
#[utoipa::path(
    post,
    path = "/api/v1/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 204, description = "Password replaced"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "No account for this email", body = Error),
        (status = 409, description = "Invalid or expired code", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "resetPassword",
    security([])
)]
#[post("/auth/reset-password")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    payload: web::Json<ResetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let email = parse_email(&payload.email)?;
    state
        .credentials
        .reset_password(&email, &payload.code, &payload.new_password)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
