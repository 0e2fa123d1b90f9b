//! Feed → JSON event graph.

use serde::Serialize;
use url::Url;

use crate::error::TripCalResult;
use crate::event::{CalendarInfo, Event};
use crate::feed::{RequestTimeout, fetch_feed};
use crate::ics::parse_calendar;
use crate::relations::resolve;

/// Body of a conversion response.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedCalendar {
    pub calendar: CalendarInfo,
    pub events: Vec<Event>,
    pub event_count: usize,
    pub total_events: usize,
}

/// Parse a calendar document and resolve its trip hierarchy.
pub fn convert_document(content: &str) -> TripCalResult<ConvertedCalendar> {
    let parsed = parse_calendar(content)?;
    let resolution = resolve(parsed.events);

    Ok(ConvertedCalendar {
        calendar: parsed.info,
        events: resolution.events,
        event_count: resolution.event_count,
        total_events: resolution.total_events,
    })
}

/// Fetch a feed and convert it.
pub async fn convert_feed(url: &Url, timeout: RequestTimeout) -> TripCalResult<ConvertedCalendar> {
    let content = fetch_feed(url, timeout).await?;
    convert_document(&content)
}
