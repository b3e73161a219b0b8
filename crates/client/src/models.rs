//! Wire models shared with the simulated backend.
//!
//! Field names are camelCase on the wire, matching what the backend emits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Successful response from the protected resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectedPayload {
    pub success: bool,
    pub message: String,
    /// Correlation id assigned by the backend, diagnostics only.
    pub request_id: u64,
    pub timestamp: DateTime<Utc>,
}

/// Successful response from the refresh endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    /// Advertised token lifetime in milliseconds.
    pub expires_in: u64,
}

/// Cumulative counters reported by the backend's stats endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStats {
    pub refresh_call_count: u64,
    pub total_requests: u64,
}

/// Error body emitted by the backend on failure responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    #[serde(default)]
    pub request_id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_payload_wire_format() {
        let json = r#"{
            "success": true,
            "message": "Request 3 processed",
            "requestId": 3,
            "timestamp": "2026-01-01T00:00:00Z"
        }"#;
        let payload: ProtectedPayload = serde_json::from_str(json).unwrap();
        assert!(payload.success);
        assert_eq!(payload.request_id, 3);
    }

    #[test]
    fn test_refresh_response_wire_format() {
        let json = r#"{"accessToken": "token-abc", "expiresIn": 5000}"#;
        let parsed: RefreshResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.access_token, "token-abc");
        assert_eq!(parsed.expires_in, 5000);
    }

    #[test]
    fn test_error_body_without_request_id() {
        let json = r#"{"error": "Unauthorized", "message": "Refresh rejected"}"#;
        let body: ErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.request_id, None);
    }

    #[test]
    fn test_server_stats_wire_format() {
        let json = r#"{"refreshCallCount": 1, "totalRequests": 20}"#;
        let stats: ServerStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.refresh_call_count, 1);
        assert_eq!(stats.total_requests, 20);
    }
}
