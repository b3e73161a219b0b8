//! Simulated bearer-token backend.
//!
//! Deterministic stand-in for the protected-resource and auth server the
//! client coordinates against. It rejects exactly one sentinel token value
//! as expired, applies fixed artificial delays so concurrent requests
//! genuinely overlap, and exposes test-only instrumentation: cumulative
//! counters, a reset operation, and a forced-refresh-failure flag.
//!
//! The counters are observability only; nothing here participates in the
//! client's refresh coordination.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use axum::extract::State;
use axum::http::{StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::{Router, http::HeaderMap};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use uuid::Uuid;

use tokengate_config::constants::{
    DEFAULT_PROTECTED_DELAY_MS, DEFAULT_REFRESH_DELAY_MS, DEFAULT_TOKEN_EXPIRY_MS,
    EXPIRED_TOKEN_SENTINEL,
};

/// Behavior knobs for the simulated backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Artificial processing delay for protected requests.
    pub protected_delay: Duration,
    /// Artificial processing delay for refresh requests. Larger than the
    /// protected delay so a request burst observes the refresh in flight.
    pub refresh_delay: Duration,
    /// Advertised lifetime of minted tokens in milliseconds.
    pub token_expiry_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            protected_delay: Duration::from_millis(DEFAULT_PROTECTED_DELAY_MS),
            refresh_delay: Duration::from_millis(DEFAULT_REFRESH_DELAY_MS),
            token_expiry_ms: DEFAULT_TOKEN_EXPIRY_MS,
        }
    }
}

impl BackendConfig {
    /// Configuration with no artificial delays, for fast tests.
    pub fn instant() -> Self {
        Self {
            protected_delay: Duration::ZERO,
            refresh_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    requests: AtomicU64,
    refresh_calls: AtomicU64,
    fail_refresh: AtomicBool,
}

/// Shared state behind the router. Clones share the same counters.
#[derive(Debug, Clone)]
pub struct AppState {
    config: BackendConfig,
    counters: Arc<Counters>,
}

impl AppState {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            counters: Arc::new(Counters::default()),
        }
    }
}

/// Build the backend router. Cloning the router shares counter state.
pub fn router(config: BackendConfig) -> Router {
    Router::new()
        .route("/api/protected", get(get_protected))
        .route("/auth/token/refresh", post(refresh_token))
        .route("/api/stats", get(get_stats))
        .route("/api/reset", post(reset_state))
        .route("/api/refresh-failure", post(set_refresh_failure))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(config))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

async fn get_protected(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let request_id = state.counters.requests.fetch_add(1, Ordering::SeqCst) + 1;
    let expired = bearer_token(&headers) == Some(EXPIRED_TOKEN_SENTINEL);
    debug!(request_id, expired, "protected request received");

    tokio::time::sleep(state.config.protected_delay).await;

    if expired {
        debug!(request_id, "rejecting expired token");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Unauthorized",
                "message": "Token expired",
                "requestId": request_id,
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": format!("Request {request_id} processed"),
            "requestId": request_id,
            "timestamp": chrono::Utc::now(),
        })),
    )
}

async fn refresh_token(State(state): State<AppState>) -> impl IntoResponse {
    let call = state.counters.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
    info!(call, "refresh started");

    tokio::time::sleep(state.config.refresh_delay).await;

    if state.counters.fail_refresh.load(Ordering::SeqCst) {
        info!(call, "refresh rejected (forced failure)");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Unauthorized",
                "message": "Refresh rejected",
            })),
        );
    }

    info!(call, "refresh completed");
    (
        StatusCode::OK,
        Json(json!({
            "accessToken": format!("token-{}", Uuid::new_v4()),
            "expiresIn": state.config.token_expiry_ms,
        })),
    )
}

async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "refreshCallCount": state.counters.refresh_calls.load(Ordering::SeqCst),
        "totalRequests": state.counters.requests.load(Ordering::SeqCst),
    }))
}

async fn reset_state(State(state): State<AppState>) -> impl IntoResponse {
    state.counters.requests.store(0, Ordering::SeqCst);
    state.counters.refresh_calls.store(0, Ordering::SeqCst);
    state.counters.fail_refresh.store(false, Ordering::SeqCst);
    info!("state reset");
    Json(json!({ "success": true }))
}

#[derive(Debug, Deserialize)]
struct FailFlag {
    fail: bool,
}

async fn set_refresh_failure(
    State(state): State<AppState>,
    Json(flag): Json<FailFlag>,
) -> impl IntoResponse {
    state.counters.fail_refresh.store(flag.fail, Ordering::SeqCst);
    info!(fail = flag.fail, "refresh failure flag set");
    Json(json!({ "success": true }))
}

/// Serve the backend on the given address until the task is dropped.
pub async fn run_server(addr: SocketAddr, config: BackendConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("simulated backend listening on {}", listener.local_addr()?);
    axum::serve(listener, router(config)).await
}

/// Spawn the backend on an ephemeral local port and return its address.
///
/// Used by the test driver to run self-contained scenarios.
pub async fn spawn_backend(config: BackendConfig) -> std::io::Result<SocketAddr> {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router(config)).await {
            tracing::error!(error = %e, "simulated backend exited");
        }
    });
    Ok(addr)
}
