//! Single-flight coordination of token refresh round trips.
//!
//! The coordinator guarantees that for any number of concurrent callers,
//! at most one refresh is outstanding at a time. The first caller installs
//! a shared future in the pending slot; every later caller joins it and
//! receives the identical outcome. The slot collapses back to absent when
//! the transport call settles, whether it succeeded or failed, so no waiter
//! can hang and a later failure can start a fresh attempt.

use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::error::RefreshError;
use crate::token::TokenStore;

/// Outcome delivered to every joiner of one refresh attempt.
pub type RefreshOutcome = Result<SecretString, RefreshError>;

/// Handle to an in-flight refresh. Awaiting it yields the shared outcome;
/// cloning it attaches another waiter to the same attempt.
pub type RefreshHandle = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Transport that performs the actual refresh round trip.
///
/// The coordinator never retries: a transport failure is fanned out to all
/// joiners verbatim, and retrying is the caller's decision.
pub trait RefreshTransport: Send + Sync + 'static {
    /// Exchange the expired credential for a fresh token string.
    fn refresh(&self) -> BoxFuture<'static, Result<String, RefreshError>>;
}

/// Owns the single-flight invariant for token refreshes.
///
/// Cloning yields another handle to the same coordinator state; all clones
/// share one pending slot and one [`TokenStore`].
#[derive(Clone)]
pub struct RefreshCoordinator {
    tokens: TokenStore,
    transport: Arc<dyn RefreshTransport>,
    in_flight: Arc<Mutex<Option<RefreshHandle>>>,
}

impl RefreshCoordinator {
    /// Create a coordinator over the given token store and refresh transport.
    pub fn new(tokens: TokenStore, transport: Arc<dyn RefreshTransport>) -> Self {
        Self {
            tokens,
            transport,
            in_flight: Arc::new(Mutex::new(None)),
        }
    }

    /// The token store this coordinator writes refreshed tokens into.
    pub fn token_store(&self) -> &TokenStore {
        &self.tokens
    }

    /// Whether a refresh is currently outstanding.
    pub fn is_refreshing(&self) -> bool {
        self.in_flight.lock().unwrap().is_some()
    }

    /// Handle to the in-flight refresh, if one is pending.
    pub fn current_refresh(&self) -> Option<RefreshHandle> {
        self.in_flight.lock().unwrap().clone()
    }

    /// Join the in-flight refresh, or start a new one if none is pending.
    ///
    /// Exactly one transport call is made per pending window regardless of
    /// how many callers arrive before it settles. On success the new token
    /// is stored before any waiter observes the outcome; on failure the
    /// stored token is left untouched.
    pub fn start_or_join(&self) -> RefreshHandle {
        let mut slot = self.in_flight.lock().unwrap();
        if let Some(handle) = slot.as_ref() {
            debug!("refresh already in flight, joining");
            return handle.clone();
        }

        info!("starting token refresh");
        let transport = Arc::clone(&self.transport);
        let tokens = self.tokens.clone();
        let in_flight = Arc::clone(&self.in_flight);

        let handle: RefreshHandle = async move {
            let outcome = transport.refresh().await;

            // Collapse to absent before the outcome becomes observable, so
            // a request that fails after this refresh can start a new one.
            in_flight.lock().unwrap().take();

            match outcome {
                Ok(token) => {
                    tokens.set(token.clone());
                    info!("token refresh succeeded");
                    Ok(SecretString::new(token.into()))
                }
                Err(err) => {
                    warn!(error = %err, "token refresh failed");
                    Err(err)
                }
            }
        }
        .boxed()
        .shared();

        *slot = Some(handle.clone());
        handle
    }

    /// Clear the stored token and any pending refresh state.
    ///
    /// Intended for test setup; an in-flight transport call still settles on
    /// its own, but new callers will start a fresh attempt.
    pub fn reset(&self) {
        self.in_flight.lock().unwrap().take();
        self.tokens.reset();
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("tokens", &self.tokens)
            .field("refreshing", &self.is_refreshing())
            .finish()
    }
}

/// Refresh transport backed by the real refresh endpoint.
#[derive(Debug, Clone)]
pub struct HttpRefreshTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRefreshTransport {
    /// Create a transport that POSTs to the refresh endpoint under `base_url`.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

impl RefreshTransport for HttpRefreshTransport {
    fn refresh(&self) -> BoxFuture<'static, Result<String, RefreshError>> {
        let http = self.http.clone();
        let base_url = self.base_url.clone();
        async move { crate::endpoints::refresh::refresh_token(&http, &base_url).await }.boxed()
    }
}
