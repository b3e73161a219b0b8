//! Common test utilities for integration tests.
//!
//! Mock-backend helpers shared by the integration tests: counting responders
//! for the protected and refresh endpoints, and a client pre-seeded with the
//! expired-token sentinel.
//!
//! # Invariants
//! - The protected mock rejects exactly the expired sentinel with 401 and
//!   succeeds for any other bearer token, mirroring the real backend.
//! - Hit counters are incremented once per received request.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};
use wiremock::matchers::{method, path};

use tokengate_client::ProtectedClient;
use tokengate_config::constants::EXPIRED_TOKEN_SENTINEL;

/// Token the refresh mock hands out.
#[allow(dead_code)]
pub const FRESH_TOKEN: &str = "fresh-token-1";

/// Mount a protected-resource mock that 401s the expired sentinel and
/// succeeds for any other token. Returns the hit counter.
#[allow(dead_code)]
pub async fn mount_protected(server: &MockServer, delay: Duration) -> Arc<AtomicUsize> {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let expired = format!("Bearer {}", EXPIRED_TOKEN_SENTINEL);

    Mock::given(method("GET"))
        .and(path("/api/protected"))
        .respond_with(move |req: &wiremock::Request| {
            let id = counter.fetch_add(1, Ordering::SeqCst) as u64 + 1;
            let auth = req
                .headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            if auth == expired {
                ResponseTemplate::new(401)
                    .set_delay(delay)
                    .set_body_json(serde_json::json!({
                        "error": "Unauthorized",
                        "message": "Token expired",
                        "requestId": id,
                    }))
            } else {
                ResponseTemplate::new(200)
                    .set_delay(delay)
                    .set_body_json(serde_json::json!({
                        "success": true,
                        "message": format!("Request {id} processed"),
                        "requestId": id,
                        "timestamp": "2026-01-01T00:00:00Z",
                    }))
            }
        })
        .mount(server)
        .await;

    hits
}

/// Mount a refresh mock that succeeds (or always fails when `fail` is set).
/// Returns the refresh-call counter.
#[allow(dead_code)]
pub async fn mount_refresh(server: &MockServer, delay: Duration, fail: bool) -> Arc<AtomicUsize> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    Mock::given(method("POST"))
        .and(path("/auth/token/refresh"))
        .respond_with(move |_: &wiremock::Request| {
            counter.fetch_add(1, Ordering::SeqCst);
            if fail {
                ResponseTemplate::new(401)
                    .set_delay(delay)
                    .set_body_json(serde_json::json!({
                        "error": "Unauthorized",
                        "message": "Refresh rejected",
                    }))
            } else {
                ResponseTemplate::new(200)
                    .set_delay(delay)
                    .set_body_json(serde_json::json!({
                        "accessToken": FRESH_TOKEN,
                        "expiresIn": 5000,
                    }))
            }
        })
        .mount(server)
        .await;

    calls
}

/// Build a client against the mock server, seeded with the expired sentinel.
#[allow(dead_code)]
pub fn client_with_expired_token(server: &MockServer) -> ProtectedClient {
    let client = ProtectedClient::builder()
        .base_url(server.uri())
        .build()
        .unwrap();
    client.token_store().set(EXPIRED_TOKEN_SENTINEL);
    client
}
