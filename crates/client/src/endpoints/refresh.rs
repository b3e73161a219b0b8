//! The token refresh endpoint.

use reqwest::Client;
use tracing::debug;

use crate::error::RefreshError;
use crate::models::{ErrorBody, RefreshResponse};

/// Path of the refresh endpoint on the backend.
pub const REFRESH_PATH: &str = "/auth/token/refresh";

/// Exchange the expired credential for a fresh token string.
///
/// Errors are reported as [`RefreshError`] rather than the general client
/// error so one outcome can be cloned to every request joined to the refresh.
pub async fn refresh_token(client: &Client, base_url: &str) -> Result<String, RefreshError> {
    debug!("requesting fresh access token");

    let url = format!("{}{}", base_url, REFRESH_PATH);
    let response = client
        .post(&url)
        .json(&serde_json::json!({ "grant_type": "refresh_token" }))
        .send()
        .await
        .map_err(|e| RefreshError::transport(&e))?;

    let status = response.status();
    if !status.is_success() {
        let raw = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response body".to_string());
        let message = serde_json::from_str::<ErrorBody>(&raw)
            .map(|body| body.message)
            .unwrap_or(raw);
        return Err(RefreshError {
            status: Some(status.as_u16()),
            message,
        });
    }

    let parsed: RefreshResponse = response.json().await.map_err(|e| RefreshError {
        status: None,
        message: format!("invalid refresh response: {e}"),
    })?;

    Ok(parsed.access_token)
}
