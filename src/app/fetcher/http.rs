//! Single-shot HTTP GET
//!
//! One request per call, no retry: retry and backoff decisions belong to
//! the caller so they are not duplicated across the cache and the
//! workspace orchestration.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use url::Url;

use crate::errors::{FetchError, FetchResult};

/// Perform exactly one GET and return the body plus the declared
/// `Content-Type`, if any.
///
/// # Errors
///
/// Any non-2xx status maps to `FetchError::Status`; transport failures map
/// to `FetchError::Http`, except timeouts which surface as
/// `FetchError::Timeout` bounded by `timeout_secs`.
pub(super) async fn get_once(
    client: &Client,
    url: &Url,
    timeout_secs: u64,
) -> FetchResult<(Vec<u8>, Option<String>)> {
    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| classify_transport(e, timeout_secs))?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("GET {} returned HTTP {}", url, status.as_u16());
        return Err(FetchError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    let bytes = response
        .bytes()
        .await
        .map_err(|e| classify_transport(e, timeout_secs))?;

    tracing::debug!("fetched {} ({} bytes)", url, bytes.len());
    Ok((bytes.to_vec(), content_type))
}

fn classify_transport(error: reqwest::Error, timeout_secs: u64) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            seconds: timeout_secs,
        }
    } else {
        FetchError::Http(error)
    }
}
