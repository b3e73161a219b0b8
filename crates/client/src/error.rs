//! Error types for the tokengate client.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Failure of the refresh round trip itself.
///
/// Kept as a standalone, cloneable type because a single refresh outcome is
/// fanned out to every request that joined the in-flight refresh.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("token refresh failed{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
pub struct RefreshError {
    /// HTTP status reported by the refresh endpoint, if the call got that far.
    pub status: Option<u16>,
    /// Human-readable cause.
    pub message: String,
}

impl RefreshError {
    /// Build a refresh error from a transport-level failure.
    pub fn transport(err: &reqwest::Error) -> Self {
        Self {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Errors that can occur during protected API operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The protected resource rejected the presented token.
    #[error("Unauthorized ({status}): {message}{}", .request_id.map(|id| format!(" [Request ID: {id}]")).unwrap_or_default())]
    Unauthorized {
        status: u16,
        message: String,
        request_id: Option<u64>,
    },

    /// The refresh round trip failed; surfaced to every joined request.
    #[error(transparent)]
    RefreshFailed(#[from] RefreshError),

    /// Non-authorization error response, passed through untouched.
    #[error("API error ({status}) at {url}: {message}{}", .request_id.map(|id| format!(" [Request ID: {id}]")).unwrap_or_default())]
    ApiError {
        status: u16,
        url: String,
        message: String,
        request_id: Option<u64>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Response body did not match the expected shape.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Check if this error is an authorization failure from the protected resource.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Check if this error came from a failed token refresh.
    pub fn is_refresh_error(&self) -> bool {
        matches!(self, Self::RefreshFailed(_))
    }
}
