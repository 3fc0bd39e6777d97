//! Builders for HTTP state ports over the document store and outbound adapters.

use std::path::PathBuf;
use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use backend::domain::ports::{
    ContentCommand, ContentQuery, CredentialService, SocialGraphCommand, SocialGraphQuery,
};
use backend::domain::{ContentService, CredentialServiceImpl, SocialGraphService, TokenSigner};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::mailer::LogMailer;
use backend::outbound::persistence::JsonDocumentStore;

/// Open the document store, file-backed when a snapshot path is configured.
fn open_store(store_path: Option<PathBuf>) -> std::io::Result<Arc<JsonDocumentStore>> {
    let store = match store_path {
        Some(path) => JsonDocumentStore::open(path)
            .map_err(|err| std::io::Error::other(format!("document store unavailable: {err}")))?,
        None => JsonDocumentStore::ephemeral(),
    };
    Ok(Arc::new(store))
}

/// Build the shared HTTP state from the document store and real services.
///
/// The store backs every port: the credential service reads and writes
/// accounts, the social graph service mutates follower sets on them, and the
/// content service owns the saved/watched sets plus the review ledger.
pub(super) fn build_http_state(
    store_path: Option<PathBuf>,
    signer: TokenSigner,
) -> std::io::Result<web::Data<HttpState>> {
    let store = open_store(store_path)?;
    let mailer = Arc::new(LogMailer);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let credentials = Arc::new(CredentialServiceImpl::new(
        store.clone(),
        mailer,
        clock.clone(),
        signer,
    ));
    let social = Arc::new(SocialGraphService::new(store.clone()));
    let content = Arc::new(ContentService::new(store.clone(), store, clock));

    Ok(web::Data::new(HttpState::new(HttpStatePorts {
        credentials: credentials as Arc<dyn CredentialService>,
        social: social.clone() as Arc<dyn SocialGraphCommand>,
        social_query: social as Arc<dyn SocialGraphQuery>,
        content: content.clone() as Arc<dyn ContentCommand>,
        content_query: content as Arc<dyn ContentQuery>,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::domain::Handle;
    use chrono::Duration;

    fn signer() -> TokenSigner {
        TokenSigner::new(b"0123456789abcdef0123456789abcdef".to_vec(), Duration::days(7))
    }

    #[tokio::test]
    async fn ephemeral_state_serves_the_ports() {
        let state = build_http_state(None, signer()).expect("ephemeral store always opens");

        // A fresh store knows no accounts, so any bearer token is rejected.
        assert!(state.credentials.authenticate("not-a-token").await.is_none());
        let handle = Handle::new("nobody").expect("valid handle");
        let listing = state.social_query.followers(&handle).await;
        assert!(listing.is_err());
    }

    #[tokio::test]
    async fn unwritable_snapshot_paths_surface_as_io_errors() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let garbled = dir.path().join("store.json");
        std::fs::write(&garbled, b"{ not json").expect("write snapshot");

        let result = build_http_state(Some(garbled), signer());
        assert!(result.is_err());
    }
}
