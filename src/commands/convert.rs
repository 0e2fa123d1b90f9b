use anyhow::Result;
use tripcal_core::config::ServiceConfig;
use tripcal_core::convert_feed;

use super::feed_args;
use crate::render::Render;

pub async fn run(url: &str, timeout: Option<&str>, compact: bool) -> Result<()> {
    let config = ServiceConfig::load()?;
    let (url, timeout) = feed_args(url, timeout, &config)?;

    let converted = convert_feed(&url, timeout).await?;

    let output = if compact {
        serde_json::to_string(&converted)?
    } else {
        serde_json::to_string_pretty(&converted)?
    };
    println!("{output}");
    eprintln!("{}", converted.render());

    Ok(())
}
