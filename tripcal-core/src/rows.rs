//! Projection of resolved events into remote table rows.
//!
//! Top-level events become rows of the trips table, their subevents rows of
//! the events table. Rows are sparse: a field is only present when the event
//! has a non-empty value for it, so a merge never blanks a remote value.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::event::Event;

/// One row of a remote table.
pub type Row = serde_json::Map<String, Value>;

/// `[Flight] TP 1234` → `Flight`
static TYPE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]]+)\]").expect("type tag pattern is valid"));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncRows {
    pub trips: Vec<Row>,
    pub events: Vec<Row>,
}

/// Map a resolved hierarchy to trips and events rows.
pub fn map_rows(events: &[Event]) -> SyncRows {
    let mut rows = SyncRows::default();

    for trip in events.iter().filter(|e| e.has_uid()) {
        rows.trips.push(base_row(trip));

        for child in trip.subevents.iter().filter(|e| e.has_uid()) {
            let mut row = base_row(child);
            insert_non_empty(&mut row, "trip_uid", &trip.uid);
            if let Some(kind) = event_type(&child.description) {
                row.insert("type".into(), Value::String(kind));
            }
            rows.events.push(row);
        }
    }

    rows
}

fn base_row(event: &Event) -> Row {
    let mut row = Row::new();
    row.insert("uid".into(), Value::String(event.uid.clone()));
    insert_non_empty(&mut row, "name", &event.summary);
    insert_non_empty(&mut row, "description", &event.description);
    insert_non_empty(&mut row, "location", &event.location);
    insert_non_empty(&mut row, "status", &event.status);
    if let Some(start) = &event.start {
        insert_non_empty(&mut row, "start", &start.datetime);
    }
    if let Some(end) = &event.end {
        insert_non_empty(&mut row, "end", &end.datetime);
    }
    row
}

fn insert_non_empty(row: &mut Row, key: &str, value: &str) {
    if !value.is_empty() {
        row.insert(key.to_string(), Value::String(value.to_string()));
    }
}

/// First bracketed token of a description, if any.
pub fn event_type(description: &str) -> Option<String> {
    TYPE_TAG
        .captures(description)
        .map(|caps| caps[1].trim().to_string())
        .filter(|kind| !kind.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventTime, ValueType};
    use serde_json::json;

    fn at(datetime: &str) -> Option<EventTime> {
        Some(EventTime {
            datetime: datetime.to_string(),
            value_type: ValueType::DateTime,
            timezone: None,
        })
    }

    #[test]
    fn test_trip_and_event_rows() {
        let mut flight = Event::new("flight", "TP 1234");
        flight.description = "[Flight] window seat".to_string();
        flight.start = at("2025-03-20T10:00:00+00:00");

        let mut trip = Event::new("trip", "Lisbon");
        trip.location = "Lisbon".to_string();
        trip.subevents = vec![flight, Event::new("", "anonymous")];

        let rows = map_rows(&[trip, Event::new("", "no uid")]);

        assert_eq!(
            rows.trips,
            vec![
                json!({"uid": "trip", "name": "Lisbon", "location": "Lisbon"})
                    .as_object()
                    .unwrap()
                    .clone()
            ]
        );
        assert_eq!(
            rows.events,
            vec![
                json!({
                    "uid": "flight",
                    "trip_uid": "trip",
                    "name": "TP 1234",
                    "description": "[Flight] window seat",
                    "start": "2025-03-20T10:00:00+00:00",
                    "type": "Flight",
                })
                .as_object()
                .unwrap()
                .clone()
            ]
        );
    }

    #[test]
    fn test_type_is_omitted_without_tag() {
        let mut trip = Event::new("trip", "Trip");
        let mut child = Event::new("hotel", "Hotel");
        child.description = "Check-in at 3pm".to_string();
        trip.subevents = vec![child];

        let rows = map_rows(&[trip]);
        assert!(!rows.events[0].contains_key("type"));
        assert!(!rows.trips[0].contains_key("description"));
    }

    #[test]
    fn test_event_type_takes_first_token() {
        assert_eq!(event_type("[ Hotel ] then [Flight]"), Some("Hotel".to_string()));
        assert_eq!(event_type("[]"), None);
        assert_eq!(event_type("no tag"), None);
    }
}
