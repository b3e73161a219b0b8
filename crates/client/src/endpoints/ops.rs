//! Test-only instrumentation endpoints of the backend.
//!
//! Counters and the forced-failure flag exist for test observability; they
//! are not part of the refresh coordination contract.

use reqwest::Client;

use crate::endpoints::classify_error;
use crate::error::Result;
use crate::models::ServerStats;

/// Path of the stats endpoint.
pub const STATS_PATH: &str = "/api/stats";

/// Path of the reset endpoint.
pub const RESET_PATH: &str = "/api/reset";

/// Path of the forced-refresh-failure flag endpoint.
pub const REFRESH_FAILURE_PATH: &str = "/api/refresh-failure";

/// Fetch cumulative refresh-call and request counters.
pub async fn stats(client: &Client, base_url: &str) -> Result<ServerStats> {
    let url = format!("{}{}", base_url, STATS_PATH);
    let response = client.get(&url).send().await?;
    if response.status().is_success() {
        return Ok(response.json().await?);
    }
    Err(classify_error(response).await)
}

/// Zero both counters and clear the forced-failure flag.
pub async fn reset(client: &Client, base_url: &str) -> Result<()> {
    let url = format!("{}{}", base_url, RESET_PATH);
    let response = client.post(&url).send().await?;
    if response.status().is_success() {
        return Ok(());
    }
    Err(classify_error(response).await)
}

/// Force the refresh endpoint to fail (or stop failing).
pub async fn set_refresh_failure(client: &Client, base_url: &str, fail: bool) -> Result<()> {
    let url = format!("{}{}", base_url, REFRESH_FAILURE_PATH);
    let response = client
        .post(&url)
        .json(&serde_json::json!({ "fail": fail }))
        .send()
        .await?;
    if response.status().is_success() {
        return Ok(());
    }
    Err(classify_error(response).await)
}
