//! Shared response handling for the service endpoints.
//!
//! Failures carry the service's `detail` string when the error body has one
//! and a per-endpoint fallback message otherwise.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Pass a success response through, turn anything else into
/// [`ApiError::RequestFailed`].
pub async fn check_response(
    resp: reqwest::Response,
    fallback: &str,
) -> Result<reqwest::Response, ApiError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    let message = error_detail(&body).unwrap_or_else(|| fallback.to_string());
    tracing::debug!(status, %message, "service returned an error");
    Err(ApiError::RequestFailed { status, message })
}

/// Decode a JSON body, mapping shape mismatches to
/// [`ApiError::MalformedResponse`].
pub async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::MalformedResponse(e.to_string()))
}

/// A non-empty string `detail` field, if the body is JSON and has one.
fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(detail) if !detail.trim().is_empty() => Some(detail),
        _ => None,
    }
}
