//! HTTP helpers shared by the providers.

use std::future::Future;
use std::time::Duration;

use reqwest::Response;
use reqwest::header::HeaderValue;

use crate::error::{Error, Result};

/// Pass a 2xx response through; turn anything else into a typed error carrying the body.
pub(crate) async fn ensure_success(provider: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(provider, status = status.as_u16(), "provider returned an error status");
    Err(Error::from_status(provider, status, body))
}

/// Bound the whole exchange. Elapsed time becomes [`Error::Timeout`].
pub(crate) async fn with_timeout<T, F>(provider: &str, after: Duration, exchange: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(after, exchange).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout {
            provider: provider.to_string(),
            after,
        }),
    }
}

/// Header value for a credential; keys with control characters are rejected.
pub(crate) fn header_value(provider: &str, value: &str) -> Result<HeaderValue> {
    let mut header =
        HeaderValue::from_str(value).map_err(|_| Error::InvalidApiKey(provider.to_string()))?;
    header.set_sensitive(true);
    Ok(header)
}

/// Map an event-source failure to a crate error, reading the body of error responses.
pub(crate) async fn event_error(provider: &str, error: reqwest_eventsource::Error) -> Error {
    match error {
        reqwest_eventsource::Error::InvalidStatusCode(status, response) => {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            Error::from_status(provider, status, body)
        }
        reqwest_eventsource::Error::InvalidContentType(content_type, response) => {
            let body = response.text().await.unwrap_or_default();
            Error::stream_error(format!(
                "{} answered with content type {:?} instead of an event stream: {}",
                provider, content_type, body
            ))
        }
        reqwest_eventsource::Error::Transport(e) => Error::Http(e),
        other => Error::stream_error(format!("{} stream error: {}", provider, other)),
    }
}
