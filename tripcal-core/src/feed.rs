//! Fetching a calendar feed over HTTP.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use url::Url;

use crate::error::{TripCalError, TripCalResult};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const MIN_TIMEOUT_SECS: i64 = 1;
const MAX_TIMEOUT_SECS: i64 = 60;

/// Caller supplied bound on every network call of a request, 1–60 seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimeout(u64);

impl Default for RequestTimeout {
    fn default() -> Self {
        RequestTimeout(DEFAULT_TIMEOUT_SECS)
    }
}

impl RequestTimeout {
    pub fn new(secs: i64) -> TripCalResult<Self> {
        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&secs) {
            return Err(TripCalError::InvalidTimeout(format!(
                "Timeout must be between {MIN_TIMEOUT_SECS} and {MAX_TIMEOUT_SECS} seconds"
            )));
        }
        Ok(RequestTimeout(secs as u64))
    }

    /// Parse a raw query value, falling back to `default` when absent.
    pub fn parse(raw: Option<&str>, default: RequestTimeout) -> TripCalResult<Self> {
        let Some(raw) = raw else {
            return Ok(default);
        };
        let secs: i64 = raw.trim().parse().map_err(|_| {
            TripCalError::InvalidTimeout("Timeout must be a valid integer".to_string())
        })?;
        Self::new(secs)
    }

    pub fn secs(&self) -> u64 {
        self.0
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.0)
    }
}

/// Accept only absolute http(s) URLs with a host.
pub fn validate_url(raw: &str) -> TripCalResult<Url> {
    let invalid_format = || {
        TripCalError::InvalidUrl(
            "Invalid URL format. URL must include scheme (http/https) and domain.".to_string(),
        )
    };

    let url = Url::parse(raw.trim()).map_err(|_| invalid_format())?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid_format());
    }
    if !matches!(url.scheme(), "http" | "https") {
        return Err(TripCalError::InvalidUrl(
            "URL scheme must be http or https".to_string(),
        ));
    }
    Ok(url)
}

/// Download the feed body. Any status other than 200 is an error carrying
/// that status.
pub async fn fetch_feed(url: &Url, timeout: RequestTimeout) -> TripCalResult<String> {
    let client = Client::builder()
        .timeout(timeout.duration())
        .build()
        .map_err(|e| TripCalError::FeedRequest(e.to_string()))?;

    tracing::debug!(%url, timeout = timeout.secs(), "Fetching feed");

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| feed_error(e, timeout))?;

    if response.status() != StatusCode::OK {
        tracing::error!(%url, status = response.status().as_u16(), "Feed fetch failed");
        return Err(TripCalError::FeedStatus(response.status().as_u16()));
    }

    let bytes = response.bytes().await.map_err(|e| feed_error(e, timeout))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn feed_error(err: reqwest::Error, timeout: RequestTimeout) -> TripCalError {
    if err.is_timeout() {
        TripCalError::FeedTimeout(timeout.secs())
    } else {
        TripCalError::FeedRequest(err.to_string())
    }
}
