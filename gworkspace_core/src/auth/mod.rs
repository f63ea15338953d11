//! OAuth credential handling: the client-secret file, the token file and the
//! shared [`AuthClient`] that keeps the access token fresh.

pub mod client;
pub mod credentials;
pub mod store;
pub mod token;

use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

pub use client::{token_persistence_listener, AuthClient, GoogleTokenEndpoint, TokenRefresher};
pub use credentials::{load_client_secret, ClientConfig};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use token::TokenSet;

use crate::config::AuthConfig;
use crate::error::WorkspaceError;

/// Builds the one authenticated client per process.
pub struct GoogleAuthManager {
    config: AuthConfig,
    client: OnceCell<Arc<AuthClient>>,
}

impl GoogleAuthManager {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Load credentials and token on first use; later calls return the same handle.
    pub async fn get_client(&self) -> Result<Arc<AuthClient>, WorkspaceError> {
        self.client
            .get_or_try_init(|| async { self.build_client() })
            .await
            .cloned()
    }

    fn build_client(&self) -> Result<Arc<AuthClient>, WorkspaceError> {
        let client = load_client_secret(&self.config.credentials_path)?;
        let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&self.config.token_path));
        let tokens = store.load().map_err(|e| {
            WorkspaceError::Authentication(format!(
                "Authentication token not found at {} ({}). Run `gworkspace setup` first and make the resulting token file available to the server.",
                self.config.token_path.display(),
                e
            ))
        })?;
        info!(
            "Loaded OAuth client {} and token from {}",
            client.client_id,
            self.config.token_path.display()
        );

        let refresher = Arc::new(GoogleTokenEndpoint::new(client));
        let auth = AuthClient::new(tokens.clone(), refresher)
            .with_listener(token_persistence_listener(store, tokens));
        Ok(Arc::new(auth))
    }
}
