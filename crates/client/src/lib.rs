//! Client for a bearer-token-protected API with single-flight token refresh.
//!
//! Many concurrent logical requests share one [`RefreshCoordinator`]: the
//! first request that discovers an expired token starts exactly one refresh
//! round trip, every other request joins that refresh and retries once with
//! the resulting token. Requests issued while a refresh is in flight are
//! held back until it settles instead of being sent with a token that is
//! already known to be stale.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
mod refresh;
mod token;

pub use client::{ProtectedClient, ProtectedClientBuilder};
pub use error::{ClientError, RefreshError, Result};
pub use models::{ErrorBody, ProtectedPayload, RefreshResponse, ServerStats};
pub use refresh::{
    HttpRefreshTransport, RefreshCoordinator, RefreshHandle, RefreshOutcome, RefreshTransport,
};
pub use token::TokenStore;
