//! ICS parsing using the icalendar crate's parser.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, Property, read_calendar, unfold},
};

use crate::error::{TripCalError, TripCalResult};
use crate::event::{Alarm, CalendarInfo, Event, EventTime, Organizer, Recurrence, RuleValue, ValueType};
use crate::ics::{ParsedCalendar, ParsedEvent};
use crate::relations::{EventMap, Instant};

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Parse a calendar document into its metadata and uid-keyed events.
pub fn parse_calendar(content: &str) -> TripCalResult<ParsedCalendar> {
    const BEGIN: &str = "BEGIN:VCALENDAR";
    let head = content.trim_start_matches('\u{feff}').trim_start();
    if !head
        .get(..BEGIN.len())
        .is_some_and(|h| h.eq_ignore_ascii_case(BEGIN))
    {
        return Err(TripCalError::IcsParse(
            "document does not start with BEGIN:VCALENDAR".into(),
        ));
    }

    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| TripCalError::IcsParse(e.to_string()))?;

    let calendar_prop = |name: &str| {
        calendar
            .properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| unescape_text(p.val.as_ref()))
    };
    let defaults = CalendarInfo::default();
    let info = CalendarInfo {
        name: calendar_prop("X-WR-CALNAME").unwrap_or(defaults.name),
        description: calendar_prop("X-WR-CALDESC").unwrap_or(defaults.description),
        timezone: calendar_prop("X-WR-TIMEZONE").unwrap_or(defaults.timezone),
    };

    let mut events = EventMap::new();
    for vevent in calendar.components.iter().filter(|c| c.name == "VEVENT") {
        let parsed = parse_component(vevent);
        if !parsed.event.has_uid() {
            tracing::debug!(summary = %parsed.event.summary, "Dropping event without UID");
            continue;
        }
        if let Some(previous) = events.insert(parsed) {
            tracing::debug!(uid = %previous.event.uid, "Duplicate UID, keeping the later event");
        }
    }

    Ok(ParsedCalendar { info, events })
}

/// Normalize one VEVENT component. Never fails: unusable values are kept
/// verbatim or left out.
pub fn parse_component(vevent: &Component) -> ParsedEvent {
    let text = |name: &str| {
        vevent
            .find_prop(name)
            .map(|p| unescape_text(p.val.as_ref()))
            .unwrap_or_default()
    };

    let related = vevent.find_prop("RELATED-TO");
    let related_to = related
        .map(|p| p.val.to_string())
        .filter(|v| !v.is_empty());
    let relationship_type = related
        .and_then(|p| param(p, "RELTYPE"))
        .filter(|v| !v.is_empty());

    let parent_uid = vevent
        .find_prop("X-PARENT-UID")
        .or_else(|| vevent.find_prop("PARENT-UID"))
        .map(|p| p.val.to_string())
        .filter(|v| !v.is_empty());

    let (start, start_instant) = vevent.find_prop("DTSTART").map(parse_time).unzip();
    let (end, end_instant) = vevent.find_prop("DTEND").map(parse_time).unzip();

    let alarms = vevent
        .components
        .iter()
        .filter(|c| c.name == "VALARM")
        .map(|alarm| Alarm {
            action: raw(alarm, "ACTION"),
            description: alarm
                .find_prop("DESCRIPTION")
                .map(|p| unescape_text(p.val.as_ref()))
                .unwrap_or_default(),
            trigger: raw(alarm, "TRIGGER"),
        })
        .collect();

    let event = Event {
        uid: raw(vevent, "UID"),
        summary: text("SUMMARY"),
        description: text("DESCRIPTION"),
        location: text("LOCATION"),
        status: raw(vevent, "STATUS"),
        organizer: vevent.find_prop("ORGANIZER").map(parse_organizer),
        created: vevent.find_prop("CREATED").map(parse_timestamp),
        last_modified: vevent.find_prop("LAST-MODIFIED").map(parse_timestamp),
        related_to,
        relationship_type,
        subevents: Vec::new(),
        parent_uid,
        start,
        end,
        recurrence: vevent
            .find_prop("RRULE")
            .map(|p| parse_recurrence(p.val.as_ref()))
            .filter(|r| !r.is_empty()),
        alarms,
    };

    ParsedEvent {
        event,
        start: start_instant.flatten(),
        end: end_instant.flatten(),
    }
}

fn raw(component: &Component, name: &str) -> String {
    component
        .find_prop(name)
        .map(|p| p.val.to_string())
        .unwrap_or_default()
}

fn param(prop: &Property, key: &str) -> Option<String> {
    prop.params
        .iter()
        .find(|p| p.key == key)
        .and_then(|p| p.val.as_ref().map(|v| v.to_string()))
}

/// Parse DTSTART/DTEND into the output marker and, if possible, an instant.
fn parse_time(prop: &Property) -> (EventTime, Option<Instant>) {
    let value_param = param(prop, "VALUE");
    let timezone = param(prop, "TZID");

    let Ok(dpt) = DatePerhapsTime::try_from(prop) else {
        tracing::debug!(value = %prop.val.as_ref(), "Unparseable {} value", prop.name.as_ref());
        let marker = EventTime {
            datetime: prop.val.to_string(),
            value_type: value_param
                .as_deref()
                .map(ValueType::from_ics_str)
                .unwrap_or(ValueType::DateTime),
            timezone,
        };
        return (marker, None);
    };

    let (datetime, instant, detected) = render(dpt);
    let marker = EventTime {
        datetime,
        value_type: value_param
            .as_deref()
            .map(ValueType::from_ics_str)
            .unwrap_or(detected),
        timezone,
    };
    (marker, Some(instant))
}

/// CREATED / LAST-MODIFIED as ISO-8601, or the raw text if unparseable.
fn parse_timestamp(prop: &Property) -> String {
    DatePerhapsTime::try_from(prop)
        .map(|dpt| render(dpt).0)
        .unwrap_or_else(|_| prop.val.to_string())
}

fn render(dpt: DatePerhapsTime) -> (String, Instant, ValueType) {
    match dpt {
        DatePerhapsTime::Date(date) => (
            date.format("%Y-%m-%d").to_string(),
            Instant::from_date(date),
            ValueType::Date,
        ),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => {
            (format_utc(dt), Instant::Aware(dt), ValueType::DateTime)
        }
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => (
            format_utc(naive.and_utc()),
            Instant::Floating(naive),
            ValueType::DateTime,
        ),
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            let (datetime, instant) = render_zoned(date_time, &tzid);
            (datetime, instant, ValueType::DateTime)
        }
    }
}

/// Zoned local times become aware instants when the zone is known; unknown
/// zones fall back to floating.
fn render_zoned(local: NaiveDateTime, tzid: &str) -> (String, Instant) {
    let resolved = tzid
        .parse::<Tz>()
        .ok()
        .and_then(|tz| tz.from_local_datetime(&local).earliest());

    match resolved {
        Some(zoned) => (
            zoned.format(ISO_FORMAT).to_string(),
            Instant::Aware(zoned.with_timezone(&Utc)),
        ),
        None => {
            tracing::debug!(tzid, "Unknown timezone, comparing as floating time");
            (format_utc(local.and_utc()), Instant::Floating(local))
        }
    }
}

fn format_utc(dt: DateTime<Utc>) -> String {
    dt.format(ISO_FORMAT).to_string()
}

/// ORGANIZER with CN/EMAIL parameters becomes a structured record.
fn parse_organizer(prop: &Property) -> Organizer {
    let value = prop.val.to_string();
    let common_name = param(prop, "CN");
    let email = param(prop, "EMAIL");

    if common_name.is_none() && email.is_none() {
        Organizer::Address(value)
    } else {
        Organizer::Contact {
            value,
            common_name,
            email,
        }
    }
}

/// Split `FREQ=WEEKLY;BYDAY=MO,WE` into its parts without interpreting them.
fn parse_recurrence(rrule: &str) -> Recurrence {
    rrule
        .split(';')
        .filter_map(|part| part.split_once('='))
        .filter(|(key, _)| !key.trim().is_empty())
        .map(|(key, value)| {
            let value = if value.contains(',') {
                RuleValue::Many(value.split(',').map(str::to_string).collect())
            } else {
                RuleValue::One(value.to_string())
            };
            (key.trim().to_ascii_uppercase(), value)
        })
        .collect()
}

/// Decode RFC 5545 TEXT escapes.
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
