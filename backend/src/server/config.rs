//! HTTP server configuration object and helpers.

use backend::domain::TokenSigner;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) signer: TokenSigner,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Construct a server configuration over the given token signer and bind address.
    #[must_use]
    pub fn new(signer: TokenSigner, bind_addr: SocketAddr) -> Self {
        Self {
            signer,
            bind_addr,
            store_path: None,
        }
    }

    /// Attach a snapshot path for the document store.
    ///
    /// When provided, accounts and reviews are loaded from this file at start
    /// and every write is persisted back to it. Without a path the store is
    /// ephemeral, which suits local development and tests.
    #[must_use]
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }
}
