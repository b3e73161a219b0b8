//! The bearer-token-protected resource endpoint.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::endpoints::classify_error;
use crate::error::Result;
use crate::models::ProtectedPayload;

/// Path of the protected resource on the backend.
pub const PROTECTED_PATH: &str = "/api/protected";

/// Fetch the protected resource with the given bearer token.
///
/// Requests without a token are sent bare; the backend decides what to make
/// of that.
pub async fn fetch(
    client: &Client,
    base_url: &str,
    token: Option<&SecretString>,
) -> Result<ProtectedPayload> {
    let url = format!("{}{}", base_url, PROTECTED_PATH);
    let mut builder = client.get(&url);
    if let Some(token) = token {
        builder = builder.bearer_auth(token.expose_secret());
    }

    let response = builder.send().await?;
    if response.status().is_success() {
        debug!("protected request fulfilled");
        return Ok(response.json().await?);
    }

    Err(classify_error(response).await)
}
