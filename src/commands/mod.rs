pub mod convert;
pub mod sync;

use anyhow::Result;
use tripcal_core::config::ServiceConfig;
use tripcal_core::feed::{RequestTimeout, validate_url};
use url::Url;

/// Validate the timeout, then the URL, the same order the server uses.
fn feed_args(url: &str, timeout: Option<&str>, config: &ServiceConfig) -> Result<(Url, RequestTimeout)> {
    let timeout = RequestTimeout::parse(timeout, config.default_request_timeout())?;
    let url = validate_url(url)?;
    Ok((url, timeout))
}
