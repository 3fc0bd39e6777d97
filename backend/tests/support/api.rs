//! Shared HTTP drivers for the backend integration suites.
//!
//! Integration tests compile as separate crates under `backend/tests/`, which
//! makes it awkward to share small helpers without copy/paste. Each suite
//! builds the full `/api/v1` application over real domain services with
//! [`backend::test_support::api_app`] and drives it through these wrappers.
//! Suites include this file via `#[path = "support/api.rs"]` and use only the
//! helpers they need.
#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use serde_json::{Value, json};

use backend::domain::Email;
use backend::test_support::CapturingMailer;

/// Bearer header pair for an issued session token.
pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// Issue a GET, attaching the bearer token when one is supplied.
pub async fn get<S, B>(app: &S, uri: &str, token: Option<&str>) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let mut request = actix_test::TestRequest::get().uri(uri);
    if let Some(token) = token {
        request = request.insert_header(bearer(token));
    }
    actix_test::call_service(app, request.to_request()).await
}

/// Issue a bodyless POST, attaching the bearer token when one is supplied.
pub async fn post<S, B>(app: &S, uri: &str, token: Option<&str>) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let mut request = actix_test::TestRequest::post().uri(uri);
    if let Some(token) = token {
        request = request.insert_header(bearer(token));
    }
    actix_test::call_service(app, request.to_request()).await
}

/// Issue a POST with a JSON body, attaching the bearer token when supplied.
pub async fn post_json<S, B>(
    app: &S,
    uri: &str,
    token: Option<&str>,
    payload: &Value,
) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let mut request = actix_test::TestRequest::post().uri(uri).set_json(payload);
    if let Some(token) = token {
        request = request.insert_header(bearer(token));
    }
    actix_test::call_service(app, request.to_request()).await
}

/// Issue a DELETE, attaching the bearer token when one is supplied.
pub async fn delete<S, B>(app: &S, uri: &str, token: Option<&str>) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let mut request = actix_test::TestRequest::delete().uri(uri);
    if let Some(token) = token {
        request = request.insert_header(bearer(token));
    }
    actix_test::call_service(app, request.to_request()).await
}

/// Deserialise a response body as JSON.
pub async fn read_json<B>(response: ServiceResponse<B>) -> Value
where
    B: MessageBody,
{
    let bytes = actix_test::read_body(response).await;
    serde_json::from_slice(&bytes).expect("response body is JSON")
}

/// Assert an error response's status plus serialised code and message.
pub async fn assert_api_error<B>(
    response: ServiceResponse<B>,
    status: StatusCode,
    code: &str,
    message: &str,
) where
    B: MessageBody,
{
    assert_eq!(response.status(), status);
    let body = read_json(response).await;
    assert_eq!(body["code"], code);
    assert_eq!(body["message"], message);
}

/// Log in and return the issued token.
pub async fn login<S, B>(app: &S, email: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = post_json(
        app,
        "/api/v1/auth/login",
        None,
        &json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login should succeed");
    let outcome = read_json(response).await;
    outcome["token"]
        .as_str()
        .expect("login returns a token")
        .to_owned()
}

/// Register, verify via the captured emailed code, and log in.
///
/// Returns the bearer token for the freshly verified account.
pub async fn onboard<S, B>(
    app: &S,
    mailer: &CapturingMailer,
    username: &str,
    email: &str,
    password: &str,
) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = post_json(
        app,
        "/api/v1/auth/register",
        None,
        &json!({ "username": username, "email": email, "password": password }),
    )
    .await;
    assert_eq!(
        response.status(),
        StatusCode::CREATED,
        "registration should succeed"
    );

    let recipient = Email::new(email).expect("valid email");
    let code = mailer
        .last_code_for(&recipient)
        .expect("verification code was sent");
    let response = post_json(
        app,
        "/api/v1/auth/verify",
        None,
        &json!({ "email": email, "code": code }),
    )
    .await;
    assert_eq!(
        response.status(),
        StatusCode::NO_CONTENT,
        "verification should succeed"
    );

    login(app, email, password).await
}
