//! Test utilities for integration tests
#![allow(dead_code)]

use axum::{Router, body::Body};
use serde_json::Value;

use tripcal_core::config::ServiceConfig;
use tripcal_server::{AppState, app};

/// A feed with one trip holding one subevent, plus a standalone event.
pub const TRIP_FEED: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//tripcal//tests//EN\r\n\
X-WR-CALNAME:Travel\r\n\
BEGIN:VEVENT\r\n\
UID:lisbon\r\n\
SUMMARY:Lisbon trip\r\n\
DTSTART;VALUE=DATE:20250610\r\n\
DTEND;VALUE=DATE:20250614\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:flight-out\r\n\
SUMMARY:Flight TP1337\r\n\
DESCRIPTION:[flight] Seat 12A\r\n\
DTSTART:20250610T080000Z\r\n\
DTEND:20250610T110000Z\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:dentist\r\n\
SUMMARY:Dentist\r\n\
DTSTART:20250701T090000Z\r\n\
DTEND:20250701T093000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

/// Creates a test application router pointing at the given table API.
pub fn test_app(table_api_url: &str) -> Router {
    let config = ServiceConfig {
        table_api_url: table_api_url.to_string(),
        ..ServiceConfig::default()
    };
    app(AppState::new(config))
}

pub async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

/// Percent-encode a URL for use as a query parameter value.
pub fn encode(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}
