use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::credentials::ClientConfig;
use super::store::TokenStore;
use super::token::{now_ms, TokenSet};
use crate::error::WorkspaceError;
use crate::oauth;

/// Called with the freshly issued fields after every successful refresh.
pub type RefreshListener = Arc<dyn Fn(&TokenSet) + Send + Sync>;

#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, WorkspaceError>;
}

/// Refreshes against Google's token endpoint with the installed-app client.
pub struct GoogleTokenEndpoint {
    client: ClientConfig,
}

impl GoogleTokenEndpoint {
    pub fn new(client: ClientConfig) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TokenRefresher for GoogleTokenEndpoint {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, WorkspaceError> {
        let tokens = oauth::google_refresh_token(
            &self.client.client_id,
            Some(&self.client.client_secret),
            refresh_token,
        )
        .await?;
        Ok(TokenSet::from_oauth(&tokens, now_ms()))
    }
}

/// The process-wide authenticated handle shared by every service.
pub struct AuthClient {
    state: Mutex<TokenSet>,
    refresher: Arc<dyn TokenRefresher>,
    listeners: Vec<RefreshListener>,
}

impl AuthClient {
    pub fn new(tokens: TokenSet, refresher: Arc<dyn TokenRefresher>) -> Self {
        Self {
            state: Mutex::new(tokens),
            refresher,
            listeners: Vec::new(),
        }
    }

    pub fn with_listener(mut self, listener: RefreshListener) -> Self {
        self.listeners.push(listener);
        self
    }

    /// A usable access token, refreshing in place first if needed.
    ///
    /// The state lock is held across the refresh so concurrent callers wait
    /// for one refresh instead of racing their own.
    pub async fn access_token(&self) -> Result<String, WorkspaceError> {
        let mut state = self.state.lock().await;
        if !state.needs_refresh(now_ms()) {
            if let Some(token) = &state.access_token {
                return Ok(token.clone());
            }
        }

        let refresh_token = state
            .refresh_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                WorkspaceError::Authentication(
                    "Access token expired and no refresh token is available. Run `gworkspace setup` again."
                        .to_string(),
                )
            })?;

        debug!("Refreshing Google access token");
        let fresh = self.refresher.refresh(&refresh_token).await?;
        *state = state.merge(&fresh);
        info!("Access token refreshed");
        for listener in &self.listeners {
            listener(&fresh);
        }

        state.access_token.clone().ok_or_else(|| {
            WorkspaceError::Authentication("refresh returned no access token".to_string())
        })
    }

    pub async fn tokens(&self) -> TokenSet {
        self.state.lock().await.clone()
    }
}

/// Listener that writes `baseline ∪ fresh` back to the store after a refresh.
/// Failures are logged and swallowed.
pub fn token_persistence_listener(
    store: Arc<dyn TokenStore>,
    baseline: TokenSet,
) -> RefreshListener {
    let current = std::sync::Mutex::new(baseline);
    Arc::new(move |fresh: &TokenSet| {
        let mut current = match current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let merged = current.merge(fresh);
        match store.save(&merged) {
            Ok(()) => info!("Updated token file at {}", store.location()),
            Err(e) => warn!("Failed to persist refreshed token: {}", e),
        }
        *current = merged;
    })
}
