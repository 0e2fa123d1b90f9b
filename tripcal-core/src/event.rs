//! Event types produced by feed conversion.
//!
//! These are the externally visible shapes: they serialize directly into the
//! conversion response body. Comparable instants used while resolving the
//! trip hierarchy live next to the event in [`crate::ics::ParsedEvent`] and
//! never reach the serialized form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A calendar event after normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub uid: String,
    pub summary: String,
    pub description: String,
    pub location: String,
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<Organizer>,

    // Source timestamps, passed through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,

    // Explicit links declared by the feed
    /// RELATED-TO target uid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_to: Option<String>,
    /// RELTYPE parameter of RELATED-TO
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<String>,

    /// Child events, only ever populated on top-level events
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subevents: Vec<Event>,

    /// X-PARENT-UID (or PARENT-UID) vendor extension
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_uid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<EventTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventTime>,

    /// RRULE parts, passed through without expansion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alarms: Vec<Alarm>,
}

impl Event {
    pub fn new(uid: impl Into<String>, summary: impl Into<String>) -> Self {
        Event {
            uid: uid.into(),
            summary: summary.into(),
            ..Default::default()
        }
    }

    pub fn has_uid(&self) -> bool {
        !self.uid.is_empty()
    }
}

/// Start or end marker of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTime {
    /// ISO-8601 rendering (`2025-03-20` or `2025-03-20T15:00:00+00:00`)
    pub datetime: String,
    pub value_type: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    #[serde(rename = "DATE")]
    Date,
    #[serde(rename = "DATE-TIME")]
    DateTime,
}

impl ValueType {
    pub fn from_ics_str(value: &str) -> Self {
        if value.eq_ignore_ascii_case("DATE") {
            ValueType::Date
        } else {
            ValueType::DateTime
        }
    }
}

/// Event organizer. Plain when the feed gives only an address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Organizer {
    Contact {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        common_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    },
    Address(String),
}

/// A reminder/alarm for an event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alarm {
    pub action: String,
    pub description: String,
    pub trigger: String,
}

/// Recurrence rule keys (FREQ, BYDAY, ...) mapped to their raw values.
pub type Recurrence = BTreeMap<String, RuleValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    One(String),
    Many(Vec<String>),
}

/// Calendar-level metadata from the X-WR-* properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarInfo {
    pub name: String,
    pub description: String,
    pub timezone: String,
}

impl Default for CalendarInfo {
    fn default() -> Self {
        CalendarInfo {
            name: "Calendar".to_string(),
            description: String::new(),
            timezone: "UTC".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_optional_fields_are_not_serialized() {
        let event = Event::new("abc", "Flight");
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(
            value,
            json!({
                "uid": "abc",
                "summary": "Flight",
                "description": "",
                "location": "",
                "status": "",
            })
        );
    }

    #[test]
    fn organizer_serializes_plain_or_structured() {
        let plain = Organizer::Address("mailto:a@example.com".to_string());
        assert_eq!(serde_json::to_value(&plain).unwrap(), json!("mailto:a@example.com"));

        let contact = Organizer::Contact {
            value: "mailto:a@example.com".to_string(),
            common_name: Some("Alice".to_string()),
            email: None,
        };
        assert_eq!(
            serde_json::to_value(&contact).unwrap(),
            json!({"value": "mailto:a@example.com", "common_name": "Alice"})
        );
    }

    #[test]
    fn value_type_uses_ics_names() {
        let time = EventTime {
            datetime: "2025-03-20".to_string(),
            value_type: ValueType::Date,
            timezone: None,
        };
        assert_eq!(
            serde_json::to_value(&time).unwrap(),
            json!({"datetime": "2025-03-20", "value_type": "DATE"})
        );
        assert_eq!(ValueType::from_ics_str("date-time"), ValueType::DateTime);
    }
}
