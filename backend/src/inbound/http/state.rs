//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    ContentCommand, ContentQuery, CredentialService, SocialGraphCommand, SocialGraphQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub credentials: Arc<dyn CredentialService>,
    pub social: Arc<dyn SocialGraphCommand>,
    pub social_query: Arc<dyn SocialGraphQuery>,
    pub content: Arc<dyn ContentCommand>,
    pub content_query: Arc<dyn ContentQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub credentials: Arc<dyn CredentialService>,
    pub social: Arc<dyn SocialGraphCommand>,
    pub social_query: Arc<dyn SocialGraphQuery>,
    pub content: Arc<dyn ContentCommand>,
    pub content_query: Arc<dyn ContentQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            credentials,
            social,
            social_query,
            content,
            content_query,
        } = ports;
        Self {
            credentials,
            social,
            social_query,
            content,
            content_query,
        }
    }
}
