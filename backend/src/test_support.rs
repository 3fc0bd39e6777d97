//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled when the
//! `test-support` feature is enabled.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use async_trait::async_trait;
use chrono::Duration;
use mockable::{Clock, DefaultClock};
use tempfile::TempDir;

use crate::domain::ports::{
    CodePurpose, ContentCommand, ContentQuery, CredentialService, Mailer, MailerError,
    SocialGraphCommand, SocialGraphQuery,
};
use crate::domain::{
    ContentService, CredentialServiceImpl, Email, SocialGraphService, TokenSigner,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::{auth, movies, reviews, social, users};
use crate::outbound::persistence::JsonDocumentStore;

/// Signing key shared by every test stack; tokens never leave the test binary.
const SIGNING_KEY: &[u8] = b"integration-test-signing-key-32b";

/// A single captured one-time code dispatch.
#[derive(Debug, Clone)]
pub struct SentCode {
    pub recipient: Email,
    pub purpose: CodePurpose,
    pub code: String,
}

/// Mailer recording every dispatched code so tests can read them back.
///
/// # Examples
///
/// ```rust
/// use backend::domain::Email;
/// use backend::domain::ports::{CodePurpose, Mailer};
/// use backend::test_support::CapturingMailer;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let mailer = CapturingMailer::default();
/// let dave = Email::new("dave@example.com").expect("valid email");
/// mailer
///     .send_one_time_code(&dave, CodePurpose::Verification, "123456")
///     .await
///     .expect("capture never fails");
/// assert_eq!(mailer.last_code_for(&dave), Some("123456".to_owned()));
/// # });
/// ```
#[derive(Debug, Default)]
pub struct CapturingMailer {
    sent: Mutex<Vec<SentCode>>,
}

impl CapturingMailer {
    /// The most recent code sent to `recipient`, if any.
    pub fn last_code_for(&self, recipient: &Email) -> Option<String> {
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .iter()
            .rev()
            .find(|sent| &sent.recipient == recipient)
            .map(|sent| sent.code.clone())
    }

    /// Every captured dispatch, oldest first.
    pub fn sent(&self) -> Vec<SentCode> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

#[async_trait]
impl Mailer for CapturingMailer {
    async fn send_one_time_code(
        &self,
        recipient: &Email,
        purpose: CodePurpose,
        code: &str,
    ) -> Result<(), MailerError> {
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push(SentCode {
                recipient: recipient.clone(),
                purpose,
                code: code.to_owned(),
            });
        Ok(())
    }
}

/// A document store snapshotting into its own temporary directory.
pub struct TempStore {
    pub store: Arc<JsonDocumentStore>,
    pub path: PathBuf,
    // Held so the directory outlives the store.
    _dir: TempDir,
}

/// Open a file-backed store under a fresh temporary directory.
///
/// Reopen the same snapshot with [`JsonDocumentStore::open`] on
/// [`TempStore::path`] to drive reload behaviour.
pub fn temp_store() -> TempStore {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("store.json");
    let store = JsonDocumentStore::open(&path).expect("open document store");
    TempStore {
        store: Arc::new(store),
        path,
        _dir: dir,
    }
}

/// Build the full service stack over `store`, returning the handler state and
/// the capturing mailer backing it.
pub fn state_over(store: Arc<JsonDocumentStore>) -> (web::Data<HttpState>, Arc<CapturingMailer>) {
    let mailer = Arc::new(CapturingMailer::default());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let signer = TokenSigner::new(SIGNING_KEY.to_vec(), Duration::days(7));

    let credentials = Arc::new(CredentialServiceImpl::new(
        store.clone(),
        mailer.clone(),
        clock.clone(),
        signer,
    ));
    let social = Arc::new(SocialGraphService::new(store.clone()));
    let content = Arc::new(ContentService::new(store.clone(), store, clock));

    let state = web::Data::new(HttpState::new(HttpStatePorts {
        credentials: credentials as Arc<dyn CredentialService>,
        social: social.clone() as Arc<dyn SocialGraphCommand>,
        social_query: social as Arc<dyn SocialGraphQuery>,
        content: content.clone() as Arc<dyn ContentCommand>,
        content_query: content as Arc<dyn ContentQuery>,
    }));
    (state, mailer)
}

/// Build the full service stack over a fresh in-memory store.
pub fn ephemeral_state() -> (web::Data<HttpState>, Arc<CapturingMailer>) {
    state_over(Arc::new(JsonDocumentStore::ephemeral()))
}

/// The complete `/api/v1` application over the given handler state.
pub fn api_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    // Literal segments register ahead of the `{username}` and `{item}` captures.
    App::new().app_data(state).service(
        web::scope("/api/v1")
            .service(auth::register)
            .service(auth::verify)
            .service(auth::login)
            .service(auth::forgot_password)
            .service(auth::reset_password)
            .service(users::me)
            .service(users::search)
            .service(users::available)
            .service(users::profile)
            .service(users::followers)
            .service(users::following)
            .service(users::user_saved)
            .service(users::user_watched)
            .service(social::pending_requests)
            .service(social::send_request)
            .service(social::accept_request)
            .service(social::reject_request)
            .service(social::cancel_request)
            .service(social::unfollow)
            .service(social::remove_follower)
            .service(movies::my_saved)
            .service(movies::my_watched)
            .service(movies::save_for_later)
            .service(movies::remove_from_saved)
            .service(movies::mark_as_watched)
            .service(movies::remove_from_watched)
            .service(movies::add_review)
            .service(movies::reviews_for_movie)
            .service(reviews::my_reviews),
    )
}

pub mod openapi {
    //! OpenAPI schema traversal helpers.
    //!
    //! Provides utilities for extracting and inspecting utoipa `Schema` types,
    //! particularly for resolving `RefOr<Schema>` wrappers to concrete `Object`
    //! schemas with diagnostic error messages on type mismatches.

    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::{Object, Schema};

    /// Extract an `Object` schema, panicking with a diagnostic if not an Object.
    pub fn unwrap_object_schema<'a>(schema: &'a RefOr<Schema>, name: &str) -> &'a Object {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj,
            RefOr::Ref(reference) => {
                panic!(
                    "schema '{name}' is a $ref to '{}'; resolve the reference first",
                    reference.ref_location
                );
            }
            RefOr::T(Schema::Array(_)) => {
                panic!("schema '{name}' is an Array, not an Object");
            }
            _ => panic!("schema '{name}' has unexpected type"),
        }
    }

    /// Get a property from an Object schema by name.
    ///
    /// Panics if the property does not exist.
    pub fn get_property<'a>(obj: &'a Object, field: &str) -> &'a RefOr<Schema> {
        match obj.properties.get(field) {
            Some(property) => property,
            None => panic!("property '{field}' not found"),
        }
    }
}
