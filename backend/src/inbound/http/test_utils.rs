//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;

use super::state::{HttpState, HttpStatePorts};
use crate::domain::Handle;
use crate::domain::ports::{
    AuthenticatedIdentity, MockContentCommand, MockContentQuery, MockCredentialService,
    MockSocialGraphCommand, MockSocialGraphQuery,
};

/// Assemble an [`HttpState`] from mock ports.
///
/// Ports a test does not configure fall back to mocks with no expectations,
/// so any unexpected call fails the test.
#[derive(Default)]
pub struct StateBuilder {
    credentials: Option<MockCredentialService>,
    social: Option<MockSocialGraphCommand>,
    social_query: Option<MockSocialGraphQuery>,
    content: Option<MockContentCommand>,
    content_query: Option<MockContentQuery>,
}

impl StateBuilder {
    pub fn credentials(mut self, mock: MockCredentialService) -> Self {
        self.credentials = Some(mock);
        self
    }

    pub fn social(mut self, mock: MockSocialGraphCommand) -> Self {
        self.social = Some(mock);
        self
    }

    pub fn social_query(mut self, mock: MockSocialGraphQuery) -> Self {
        self.social_query = Some(mock);
        self
    }

    pub fn content(mut self, mock: MockContentCommand) -> Self {
        self.content = Some(mock);
        self
    }

    pub fn content_query(mut self, mock: MockContentQuery) -> Self {
        self.content_query = Some(mock);
        self
    }

    pub fn build(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            credentials: Arc::new(self.credentials.unwrap_or_else(MockCredentialService::new)),
            social: Arc::new(self.social.unwrap_or_else(MockSocialGraphCommand::new)),
            social_query: Arc::new(self.social_query.unwrap_or_else(MockSocialGraphQuery::new)),
            content: Arc::new(self.content.unwrap_or_else(MockContentCommand::new)),
            content_query: Arc::new(self.content_query.unwrap_or_else(MockContentQuery::new)),
        }))
    }
}

/// An `Authorization` header tuple carrying a bearer token.
pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// A credential mock resolving exactly `accepted` to an identity for `handle`.
pub fn recognising_credentials(accepted: &'static str, handle: Handle) -> MockCredentialService {
    let mut credentials = MockCredentialService::new();
    credentials.expect_authenticate().returning(move |token| {
        (token == accepted).then(|| AuthenticatedIdentity::new(handle.clone()))
    });
    credentials
}
