//! HTTP calls against the backend, grouped by endpoint.
//!
//! Free functions over a shared `reqwest::Client`; classification of error
//! responses into the crate's error taxonomy happens here, at the edge.

pub mod ops;
pub mod protected;
pub mod refresh;

use reqwest::Response;

use crate::error::ClientError;
use crate::models::ErrorBody;

/// Read an error response body, preferring the backend's structured shape.
pub(crate) async fn read_error_body(response: Response) -> (String, String, Option<u64>) {
    let url = response.url().to_string();
    let raw = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response body".to_string());

    match serde_json::from_str::<ErrorBody>(&raw) {
        Ok(body) => (url, body.message, body.request_id),
        Err(_) => (url, raw, None),
    }
}

/// Classify a non-success response into the error taxonomy.
///
/// Only 401 counts as an authorization failure; everything else passes
/// through as an API error and never triggers refresh logic.
pub(crate) async fn classify_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let (url, message, request_id) = read_error_body(response).await;

    if status == 401 {
        ClientError::Unauthorized {
            status,
            message,
            request_id,
        }
    } else {
        ClientError::ApiError {
            status,
            url,
            message,
            request_id,
        }
    }
}
