use anyhow::Result;
use tripcal_core::config::ServiceConfig;
use tripcal_core::convert_feed;
use tripcal_core::rows::map_rows;
use tripcal_core::sync::SyncEngine;
use tripcal_core::sync::http::HttpTable;

use super::feed_args;
use crate::render::Render;

pub async fn run(url: &str, timeout: Option<&str>, token: Option<&str>, json: bool) -> Result<()> {
    let config = ServiceConfig::load()?;
    let (url, timeout) = feed_args(url, timeout, &config)?;
    let token = token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Missing API token. Pass --token or set TRIPCAL_API_TOKEN"))?;

    let converted = convert_feed(&url, timeout).await?;
    let rows = map_rows(&converted.events);

    let table = |name: &str| {
        HttpTable::new(&config.table_api_url, name, token, timeout.duration())
    };
    let trips = table(&config.trips_table)?;
    let events = table(&config.events_table)?;

    let report = SyncEngine::new(config.max_sync_attempts)
        .sync_all(&trips, &events, &rows)
        .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.trips.render());
        println!("{}", report.events.render());
    }

    if !report.success {
        anyhow::bail!("Sync failed");
    }

    Ok(())
}
