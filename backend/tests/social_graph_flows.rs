//! End-to-end follow-request lifecycle tests.
//!
//! Two verified accounts drive the whole state machine over HTTP: request,
//! accept, reject, cancel, unfollow, and follower removal, plus the
//! directory search and availability probes.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use serde_json::json;

use backend::test_support::{api_app, ephemeral_state};

#[path = "support/api.rs"]
mod api;

use api::{assert_api_error, delete, get, onboard, post, read_json};

#[actix_rt::test]
async fn follow_request_lifecycle_reaches_mutual_membership() {
    let (state, mailer) = ephemeral_state();
    let app = actix_test::init_service(api_app(state)).await;

    let alice = onboard(&app, &mailer, "alice_90", "alice@example.com", "hunter2").await;
    let bob = onboard(&app, &mailer, "bob_7", "bob@example.com", "hunter2").await;

    let response = post(&app, "/api/v1/social/requests/alice_90", Some(&bob)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!(true));

    // Resending while pending is a non-error no-op.
    let response = post(&app, "/api/v1/social/requests/alice_90", Some(&bob)).await;
    assert_eq!(read_json(response).await, json!(false));

    let response = get(&app, "/api/v1/social/requests", Some(&alice)).await;
    assert_eq!(read_json(response).await, json!(["bob_7"]));

    let response = post(&app, "/api/v1/social/requests/bob_7/accept", Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!(true));

    let response = get(&app, "/api/v1/social/requests", Some(&alice)).await;
    assert_eq!(read_json(response).await, json!([]));

    let response = get(&app, "/api/v1/users/alice_90/followers", Some(&alice)).await;
    assert_eq!(read_json(response).await, json!(["bob_7"]));

    let response = get(&app, "/api/v1/users/bob_7/following", Some(&bob)).await;
    assert_eq!(read_json(response).await, json!(["alice_90"]));

    // An approved follow also makes resending a no-op.
    let response = post(&app, "/api/v1/social/requests/alice_90", Some(&bob)).await;
    assert_eq!(read_json(response).await, json!(false));
}

#[actix_rt::test]
async fn rejecting_a_request_leaves_no_relationship() {
    let (state, mailer) = ephemeral_state();
    let app = actix_test::init_service(api_app(state)).await;

    let alice = onboard(&app, &mailer, "alice_90", "alice@example.com", "hunter2").await;
    let bob = onboard(&app, &mailer, "bob_7", "bob@example.com", "hunter2").await;

    let response = post(&app, "/api/v1/social/requests/alice_90", Some(&bob)).await;
    assert_eq!(read_json(response).await, json!(true));

    let response = post(&app, "/api/v1/social/requests/bob_7/reject", Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!(true));

    let response = get(&app, "/api/v1/social/requests", Some(&alice)).await;
    assert_eq!(read_json(response).await, json!([]));

    let response = get(&app, "/api/v1/users/alice_90/followers", Some(&alice)).await;
    assert_eq!(read_json(response).await, json!([]));

    let response = get(&app, "/api/v1/users/bob_7/following", Some(&bob)).await;
    assert_eq!(read_json(response).await, json!([]));
}

#[actix_rt::test]
async fn cancelling_withdraws_the_pending_request() {
    let (state, mailer) = ephemeral_state();
    let app = actix_test::init_service(api_app(state)).await;

    let alice = onboard(&app, &mailer, "alice_90", "alice@example.com", "hunter2").await;
    let bob = onboard(&app, &mailer, "bob_7", "bob@example.com", "hunter2").await;

    let response = post(&app, "/api/v1/social/requests/alice_90", Some(&bob)).await;
    assert_eq!(read_json(response).await, json!(true));

    let response = delete(&app, "/api/v1/social/requests/alice_90", Some(&bob)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!(true));

    let response = get(&app, "/api/v1/social/requests", Some(&alice)).await;
    assert_eq!(read_json(response).await, json!([]));

    let response = delete(&app, "/api/v1/social/requests/alice_90", Some(&bob)).await;
    assert_api_error(
        response,
        StatusCode::CONFLICT,
        "invalid_operation",
        "no pending request for this user",
    )
    .await;
}

#[actix_rt::test]
async fn unfollowing_detaches_both_sides() {
    let (state, mailer) = ephemeral_state();
    let app = actix_test::init_service(api_app(state)).await;

    let alice = onboard(&app, &mailer, "alice_90", "alice@example.com", "hunter2").await;
    let bob = onboard(&app, &mailer, "bob_7", "bob@example.com", "hunter2").await;

    let response = post(&app, "/api/v1/social/requests/alice_90", Some(&bob)).await;
    assert_eq!(read_json(response).await, json!(true));
    let response = post(&app, "/api/v1/social/requests/bob_7/accept", Some(&alice)).await;
    assert_eq!(read_json(response).await, json!(true));

    let response = delete(&app, "/api/v1/social/following/alice_90", Some(&bob)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!(true));

    let response = get(&app, "/api/v1/users/alice_90/followers", Some(&alice)).await;
    assert_eq!(read_json(response).await, json!([]));
    let response = get(&app, "/api/v1/users/bob_7/following", Some(&bob)).await;
    assert_eq!(read_json(response).await, json!([]));

    let response = delete(&app, "/api/v1/social/following/alice_90", Some(&bob)).await;
    assert_api_error(
        response,
        StatusCode::CONFLICT,
        "invalid_operation",
        "not following this user",
    )
    .await;
}

#[actix_rt::test]
async fn removing_a_follower_detaches_both_sides() {
    let (state, mailer) = ephemeral_state();
    let app = actix_test::init_service(api_app(state)).await;

    let alice = onboard(&app, &mailer, "alice_90", "alice@example.com", "hunter2").await;
    let bob = onboard(&app, &mailer, "bob_7", "bob@example.com", "hunter2").await;

    let response = post(&app, "/api/v1/social/requests/alice_90", Some(&bob)).await;
    assert_eq!(read_json(response).await, json!(true));
    let response = post(&app, "/api/v1/social/requests/bob_7/accept", Some(&alice)).await;
    assert_eq!(read_json(response).await, json!(true));

    let response = delete(&app, "/api/v1/social/followers/bob_7", Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!(true));

    let response = get(&app, "/api/v1/users/alice_90/followers", Some(&alice)).await;
    assert_eq!(read_json(response).await, json!([]));
    let response = get(&app, "/api/v1/users/bob_7/following", Some(&bob)).await;
    assert_eq!(read_json(response).await, json!([]));

    let response = delete(&app, "/api/v1/social/followers/bob_7", Some(&alice)).await;
    assert_api_error(
        response,
        StatusCode::CONFLICT,
        "invalid_operation",
        "not a follower",
    )
    .await;
}

#[actix_rt::test]
async fn following_yourself_is_rejected() {
    let (state, mailer) = ephemeral_state();
    let app = actix_test::init_service(api_app(state)).await;

    let alice = onboard(&app, &mailer, "alice_90", "alice@example.com", "hunter2").await;

    let response = post(&app, "/api/v1/social/requests/alice_90", Some(&alice)).await;
    assert_api_error(
        response,
        StatusCode::CONFLICT,
        "invalid_operation",
        "cannot follow yourself",
    )
    .await;
}

#[actix_rt::test]
async fn requesting_an_unknown_user_is_not_found() {
    let (state, mailer) = ephemeral_state();
    let app = actix_test::init_service(api_app(state)).await;

    let alice = onboard(&app, &mailer, "alice_90", "alice@example.com", "hunter2").await;

    let response = post(&app, "/api/v1/social/requests/ghost", Some(&alice)).await;
    assert_api_error(response, StatusCode::NOT_FOUND, "not_found", "user not found").await;
}

#[actix_rt::test]
async fn accepting_without_a_pending_request_conflicts() {
    let (state, mailer) = ephemeral_state();
    let app = actix_test::init_service(api_app(state)).await;

    let alice = onboard(&app, &mailer, "alice_90", "alice@example.com", "hunter2").await;
    onboard(&app, &mailer, "bob_7", "bob@example.com", "hunter2").await;

    let response = post(&app, "/api/v1/social/requests/bob_7/accept", Some(&alice)).await;
    assert_api_error(
        response,
        StatusCode::CONFLICT,
        "invalid_operation",
        "no such follow request",
    )
    .await;
}

#[actix_rt::test]
async fn directory_search_matches_substrings_case_insensitively() {
    let (state, mailer) = ephemeral_state();
    let app = actix_test::init_service(api_app(state)).await;

    onboard(&app, &mailer, "alice_90", "alice@example.com", "hunter2").await;
    onboard(&app, &mailer, "bob_7", "bob@example.com", "hunter2").await;

    let response = get(&app, "/api/v1/users/search?q=ALI", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let hits = read_json(response).await;
    assert_eq!(hits.as_array().map(Vec::len), Some(1));
    assert_eq!(hits[0]["username"], "alice_90");

    let response = get(&app, "/api/v1/users/search", None).await;
    assert_api_error(
        response,
        StatusCode::BAD_REQUEST,
        "invalid_request",
        "search query must not be empty",
    )
    .await;
}

#[actix_rt::test]
async fn availability_reflects_registered_usernames() {
    let (state, mailer) = ephemeral_state();
    let app = actix_test::init_service(api_app(state)).await;

    onboard(&app, &mailer, "alice_90", "alice@example.com", "hunter2").await;

    let response = get(&app, "/api/v1/users/available?username=alice_90", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!(false));

    let response = get(&app, "/api/v1/users/available?username=newcomer", None).await;
    assert_eq!(read_json(response).await, json!(true));
}
