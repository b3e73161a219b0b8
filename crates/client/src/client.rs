//! Protected API client with transparent refresh-and-retry.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use tracing::debug;

use tokengate_config::constants::{DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT_SECS};

use crate::endpoints;
use crate::error::{ClientError, Result};
use crate::models::{ProtectedPayload, ServerStats};
use crate::refresh::{HttpRefreshTransport, RefreshCoordinator};
use crate::token::TokenStore;

/// Builder for creating a new ProtectedClient.
pub struct ProtectedClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
}

impl Default for ProtectedClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ProtectedClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL of the backend.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Normalize a base URL by removing trailing slashes.
    ///
    /// Prevents double slashes when concatenating with endpoint paths.
    fn normalize_base_url(url: String) -> String {
        url.trim_end_matches('/').to_string()
    }

    /// Build the client.
    pub fn build(self) -> Result<ProtectedClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::InvalidUrl("base_url is required".to_string()))?;
        let base_url = Self::normalize_base_url(base_url);

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(DEFAULT_MAX_REDIRECTS))
            .build()?;

        let tokens = TokenStore::new();
        let transport = Arc::new(HttpRefreshTransport::new(http.clone(), base_url.clone()));
        let coordinator = RefreshCoordinator::new(tokens.clone(), transport);

        Ok(ProtectedClient {
            http,
            base_url,
            tokens,
            coordinator,
        })
    }
}

/// Client for the bearer-token-protected API.
///
/// All clones and all concurrent calls share one token store and one refresh
/// coordinator, so any number of in-flight logical requests trigger at most
/// one refresh round trip per expiry.
#[derive(Debug, Clone)]
pub struct ProtectedClient {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenStore,
    coordinator: RefreshCoordinator,
}

impl ProtectedClient {
    /// Create a new client builder.
    pub fn builder() -> ProtectedClientBuilder {
        ProtectedClientBuilder::new()
    }

    /// Fetch the protected resource, refreshing the token if it expired.
    ///
    /// One logical request is sent to the backend at most twice: the original
    /// attempt and a single retry after a coordinated refresh. A second
    /// authorization failure is surfaced unchanged, and a failed refresh is
    /// surfaced as [`ClientError::RefreshFailed`] to every request that
    /// joined it. Non-authorization errors pass through untouched.
    pub async fn get_protected(&self) -> Result<ProtectedPayload> {
        let token = self.bearer_for_request().await;
        let first = endpoints::protected::fetch(&self.http, &self.base_url, token.as_ref()).await;

        match first {
            Err(ClientError::Unauthorized { status, .. }) => {
                debug!(status, "authorization failure, coordinating refresh");
                match self.coordinator.start_or_join().await {
                    Ok(fresh) => {
                        debug!("retrying once with refreshed token");
                        endpoints::protected::fetch(&self.http, &self.base_url, Some(&fresh)).await
                    }
                    Err(refresh_err) => Err(ClientError::RefreshFailed(refresh_err)),
                }
            }
            other => other,
        }
    }

    /// Request-side interception: hold the request while a refresh is in
    /// flight, then attach the current token.
    ///
    /// The refresh outcome is deliberately ignored here: after a failed
    /// refresh the last-known token is attached anyway and the response path
    /// classifies the rejection.
    async fn bearer_for_request(&self) -> Option<SecretString> {
        if let Some(pending) = self.coordinator.current_refresh() {
            debug!("refresh in flight, holding request until it settles");
            let _ = pending.await;
        }
        self.tokens.get()
    }

    /// Fetch the backend's cumulative counters (test instrumentation).
    pub async fn stats(&self) -> Result<ServerStats> {
        endpoints::ops::stats(&self.http, &self.base_url).await
    }

    /// Zero the backend's counters and clear its forced-failure flag.
    pub async fn reset_server(&self) -> Result<()> {
        endpoints::ops::reset(&self.http, &self.base_url).await
    }

    /// Force the backend's refresh endpoint to fail (or stop failing).
    pub async fn set_refresh_failure(&self, fail: bool) -> Result<()> {
        endpoints::ops::set_refresh_failure(&self.http, &self.base_url, fail).await
    }

    /// Clear client-side state: the stored token and any pending refresh.
    pub fn reset(&self) {
        self.coordinator.reset();
    }

    /// The shared token store (exposed so tests can seed an expired token).
    pub fn token_store(&self) -> &TokenStore {
        &self.tokens
    }

    /// The shared refresh coordinator.
    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
