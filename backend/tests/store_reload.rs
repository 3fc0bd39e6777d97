//! Durability tests for the JSON document store.
//!
//! Drives the API over a store snapshotted to a temporary directory, then
//! reopens the snapshot the way a restarted process would and checks that
//! accounts, relationships, and reviews all survive.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use serde_json::json;

use backend::domain::ports::{ReviewStore, UserStore, UserStoreError};
use backend::domain::{CatalogItemId, Email, Handle};
use backend::outbound::persistence::JsonDocumentStore;
use backend::test_support::{api_app, state_over, temp_store};

#[path = "support/api.rs"]
mod api;

use api::{get, onboard, post, post_json, read_json};

fn handle(value: &str) -> Handle {
    Handle::new(value).expect("valid handle")
}

#[actix_rt::test]
async fn accounts_relationships_and_reviews_survive_a_restart() {
    let fixture = temp_store();
    let (state, mailer) = state_over(fixture.store.clone());
    let app = actix_test::init_service(api_app(state)).await;

    let alice = onboard(&app, &mailer, "alice_90", "alice@example.com", "hunter2").await;
    let bob = onboard(&app, &mailer, "bob_7", "bob@example.com", "hunter2").await;

    let response = post(&app, "/api/v1/movies/603/saved", Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = post_json(
        &app,
        "/api/v1/movies/603/reviews",
        Some(&alice),
        &json!({ "rating": 4, "comment": "tight pacing" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post(&app, "/api/v1/social/requests/alice_90", Some(&bob)).await;
    assert_eq!(read_json(response).await, json!(true));
    let response = post(&app, "/api/v1/social/requests/bob_7/accept", Some(&alice)).await;
    assert_eq!(read_json(response).await, json!(true));

    // Reopen the snapshot the way a fresh process would.
    let reopened = JsonDocumentStore::open(&fixture.path).expect("snapshot reopens");

    let account = reopened
        .find_by_handle(&handle("alice_90"))
        .await
        .expect("store read succeeds")
        .expect("account survives the restart");
    assert!(account.is_verified());
    assert_eq!(account.saved(), &[CatalogItemId::new(603)]);
    assert!(account.has_follower(&handle("bob_7")));

    let account = reopened
        .find_by_email(&Email::new("bob@example.com").expect("valid email"))
        .await
        .expect("store read succeeds")
        .expect("account survives the restart");
    assert!(account.is_following(&handle("alice_90")));

    let reviews = reopened
        .reviews_by(&handle("alice_90"))
        .await
        .expect("review read succeeds");
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].item(), CatalogItemId::new(603));
    assert_eq!(reviews[0].rating().value(), 4);
    assert_eq!(reviews[0].comment(), Some("tight pacing"));
}

#[actix_rt::test]
async fn a_token_issued_before_the_restart_still_authenticates() {
    let fixture = temp_store();
    let (state, mailer) = state_over(fixture.store.clone());
    let app = actix_test::init_service(api_app(state)).await;

    let alice = onboard(&app, &mailer, "alice_90", "alice@example.com", "hunter2").await;
    drop(app);

    // Token verification is stateless, so a fresh state over the reopened
    // snapshot accepts the old bearer token.
    let reopened = Arc::new(JsonDocumentStore::open(&fixture.path).expect("snapshot reopens"));
    let (state, _mailer) = state_over(reopened);
    let app = actix_test::init_service(api_app(state)).await;

    let response = get(&app, "/api/v1/users/me", Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let profile = read_json(response).await;
    assert_eq!(profile["username"], "alice_90");
}

#[actix_rt::test]
async fn a_corrupt_snapshot_is_rejected_on_open() {
    let fixture = temp_store();
    std::fs::write(&fixture.path, "{ not json").expect("overwrite snapshot");

    let err = JsonDocumentStore::open(&fixture.path).expect_err("corrupt snapshot must fail");
    assert!(matches!(err, UserStoreError::Serialisation { .. }));
}
