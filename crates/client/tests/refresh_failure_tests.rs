//! Failure fan-out property tests.
//!
//! When the refresh endpoint is forced to fail, N concurrent requests still
//! produce exactly one refresh call, and every request terminates with a
//! refresh error. None succeed and none hang.

mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use common::*;
use futures::future::join_all;
use secrecy::ExposeSecret;
use tokengate_config::constants::EXPIRED_TOKEN_SENTINEL;

async fn run_failure_fanout(n: usize) {
    let server = MockServer::start().await;
    mount_protected(&server, Duration::from_millis(50)).await;
    let refreshes = mount_refresh(&server, Duration::from_millis(200), true).await;
    let client = client_with_expired_token(&server);

    let results = tokio::time::timeout(
        Duration::from_secs(10),
        join_all((0..n).map(|_| client.get_protected())),
    )
    .await
    .expect("requests joined to a failed refresh must not hang");

    assert_eq!(
        refreshes.load(Ordering::SeqCst),
        1,
        "expected exactly one refresh for {n} concurrent requests"
    );
    assert_eq!(results.len(), n);
    for result in &results {
        let err = result.as_ref().unwrap_err();
        assert!(err.is_refresh_error(), "unexpected error: {err}");
    }
}

#[tokio::test]
async fn test_single_request_fails_with_refresh_error() {
    run_failure_fanout(1).await;
}

#[tokio::test]
async fn test_three_concurrent_requests_all_fail() {
    run_failure_fanout(3).await;
}

#[tokio::test]
async fn test_ten_concurrent_requests_all_fail() {
    run_failure_fanout(10).await;
}

#[tokio::test]
async fn test_failed_refresh_leaves_token_untouched() {
    let server = MockServer::start().await;
    mount_protected(&server, Duration::from_millis(10)).await;
    mount_refresh(&server, Duration::from_millis(50), true).await;
    let client = client_with_expired_token(&server);

    client.get_protected().await.unwrap_err();

    let token = client.token_store().get().unwrap();
    assert_eq!(token.expose_secret(), EXPIRED_TOKEN_SENTINEL);
}

#[tokio::test]
async fn test_refresh_can_be_reattempted_after_failure() {
    // The pending slot collapses on failure, so a later request starts a
    // brand-new refresh instead of reusing the failed one.
    let server = MockServer::start().await;
    mount_protected(&server, Duration::from_millis(10)).await;
    let refreshes = mount_refresh(&server, Duration::from_millis(50), true).await;
    let client = client_with_expired_token(&server);

    client.get_protected().await.unwrap_err();
    client.get_protected().await.unwrap_err();

    assert_eq!(refreshes.load(Ordering::SeqCst), 2);
    assert!(!client.coordinator().is_refreshing());
}
