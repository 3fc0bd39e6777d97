//! End-to-end visibility gating tests.
//!
//! Profiles are public in outline only: the followers, following, saved, and
//! watched lists are withheld from anonymous viewers and non-followers, and
//! another user's movie lists are readable only with approved-follower
//! status. These tests drive the whole journey over HTTP, from restricted
//! stranger to approved follower.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use serde_json::json;

use backend::test_support::{api_app, ephemeral_state};

#[path = "support/api.rs"]
mod api;

use api::{assert_api_error, get, onboard, post, read_json};

#[actix_rt::test]
async fn anonymous_viewers_get_the_restricted_profile() {
    let (state, mailer) = ephemeral_state();
    let app = actix_test::init_service(api_app(state)).await;

    let alice = onboard(&app, &mailer, "alice_90", "alice@example.com", "hunter2").await;
    let response = post(&app, "/api/v1/movies/603/saved", Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, "/api/v1/users/alice_90", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let profile = read_json(response).await;
    assert_eq!(profile["username"], "alice_90");
    assert_eq!(profile["restricted"], true);
    assert!(profile.get("followers").is_none());
    assert!(profile.get("saved").is_none());
    assert!(profile.get("watched").is_none());
}

#[actix_rt::test]
async fn non_followers_get_the_restricted_profile() {
    let (state, mailer) = ephemeral_state();
    let app = actix_test::init_service(api_app(state)).await;

    onboard(&app, &mailer, "alice_90", "alice@example.com", "hunter2").await;
    let bob = onboard(&app, &mailer, "bob_7", "bob@example.com", "hunter2").await;

    let response = get(&app, "/api/v1/users/alice_90", Some(&bob)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let profile = read_json(response).await;
    assert_eq!(profile["restricted"], true);
    assert!(profile.get("following").is_none());
}

#[actix_rt::test]
async fn approved_followers_get_the_full_profile() {
    let (state, mailer) = ephemeral_state();
    let app = actix_test::init_service(api_app(state)).await;

    let alice = onboard(&app, &mailer, "alice_90", "alice@example.com", "hunter2").await;
    let bob = onboard(&app, &mailer, "bob_7", "bob@example.com", "hunter2").await;

    let response = post(&app, "/api/v1/movies/603/saved", Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post(&app, "/api/v1/social/requests/alice_90", Some(&bob)).await;
    assert_eq!(read_json(response).await, json!(true));
    let response = post(&app, "/api/v1/social/requests/bob_7/accept", Some(&alice)).await;
    assert_eq!(read_json(response).await, json!(true));

    let response = get(&app, "/api/v1/users/alice_90", Some(&bob)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let profile = read_json(response).await;
    assert_eq!(profile["restricted"], false);
    assert_eq!(profile["followers"], json!(["bob_7"]));
    assert_eq!(profile["saved"], json!([603]));
    assert_eq!(profile["watched"], json!([]));
}

#[actix_rt::test]
async fn the_subject_always_gets_their_own_full_profile() {
    let (state, mailer) = ephemeral_state();
    let app = actix_test::init_service(api_app(state)).await;

    let alice = onboard(&app, &mailer, "alice_90", "alice@example.com", "hunter2").await;

    let response = get(&app, "/api/v1/users/alice_90", Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let profile = read_json(response).await;
    assert_eq!(profile["restricted"], false);
    assert_eq!(profile["followers"], json!([]));
}

#[actix_rt::test]
async fn gated_movie_lists_reject_non_followers() {
    let (state, mailer) = ephemeral_state();
    let app = actix_test::init_service(api_app(state)).await;

    let alice = onboard(&app, &mailer, "alice_90", "alice@example.com", "hunter2").await;
    let bob = onboard(&app, &mailer, "bob_7", "bob@example.com", "hunter2").await;

    let response = post(&app, "/api/v1/movies/603/saved", Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, "/api/v1/users/alice_90/saved", Some(&bob)).await;
    assert_api_error(
        response,
        StatusCode::FORBIDDEN,
        "forbidden",
        "must be an approved follower to view these movies",
    )
    .await;

    let response = get(&app, "/api/v1/users/alice_90/watched", Some(&bob)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Without a token the gate is never reached.
    let response = get(&app, "/api/v1/users/alice_90/saved", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn gated_movie_lists_open_after_approval() {
    let (state, mailer) = ephemeral_state();
    let app = actix_test::init_service(api_app(state)).await;

    let alice = onboard(&app, &mailer, "alice_90", "alice@example.com", "hunter2").await;
    let bob = onboard(&app, &mailer, "bob_7", "bob@example.com", "hunter2").await;

    let response = post(&app, "/api/v1/movies/603/saved", Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = post(&app, "/api/v1/movies/550/watched", Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post(&app, "/api/v1/social/requests/alice_90", Some(&bob)).await;
    assert_eq!(read_json(response).await, json!(true));
    let response = post(&app, "/api/v1/social/requests/bob_7/accept", Some(&alice)).await;
    assert_eq!(read_json(response).await, json!(true));

    let response = get(&app, "/api/v1/users/alice_90/saved", Some(&bob)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!([603]));

    let response = get(&app, "/api/v1/users/alice_90/watched", Some(&bob)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!([550]));
}

#[actix_rt::test]
async fn the_owner_reads_their_own_lists_through_the_gate() {
    let (state, mailer) = ephemeral_state();
    let app = actix_test::init_service(api_app(state)).await;

    let alice = onboard(&app, &mailer, "alice_90", "alice@example.com", "hunter2").await;
    let response = post(&app, "/api/v1/movies/603/saved", Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, "/api/v1/users/alice_90/saved", Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!([603]));
}

#[actix_rt::test]
async fn profiles_of_unknown_users_are_not_found() {
    let (state, _mailer) = ephemeral_state();
    let app = actix_test::init_service(api_app(state)).await;

    let response = get(&app, "/api/v1/users/ghost", None).await;
    assert_api_error(response, StatusCode::NOT_FOUND, "not_found", "user not found").await;
}
