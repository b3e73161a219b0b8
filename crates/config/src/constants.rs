//! Centralized constants for the tokengate workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication and improve maintainability.

// =============================================================================
// Connection Defaults
// =============================================================================

/// Default port for the simulated backend.
pub const DEFAULT_PORT: u16 = 3333;

/// Default base URL the client and test driver point at.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3333";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

// =============================================================================
// Token Protocol
// =============================================================================

/// Sentinel token value the backend rejects as expired.
///
/// Test scenarios seed the client with this value so every concurrent
/// request starts by discovering the expiry.
pub const EXPIRED_TOKEN_SENTINEL: &str = "expired-token";

/// Advertised lifetime of a freshly minted token in milliseconds.
pub const DEFAULT_TOKEN_EXPIRY_MS: u64 = 5_000;

// =============================================================================
// Simulated Backend Delays
// =============================================================================

/// Artificial processing delay for the protected endpoint in milliseconds.
pub const DEFAULT_PROTECTED_DELAY_MS: u64 = 200;

/// Artificial processing delay for the refresh endpoint in milliseconds.
///
/// Deliberately larger than the protected delay so a burst of concurrent
/// requests all observe the refresh still in flight.
pub const DEFAULT_REFRESH_DELAY_MS: u64 = 800;
