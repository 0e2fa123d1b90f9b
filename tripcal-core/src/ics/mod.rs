//! ICS feed parsing.
//!
//! Turns a calendar document into normalized [`Event`]s keyed by uid, keeping
//! the comparable start/end instants alongside each event for the resolver.

mod parse;

pub use parse::{parse_calendar, parse_component};

use crate::event::{CalendarInfo, Event};
use crate::relations::{EventMap, Instant, Span};

/// A normalized event together with its comparable instants.
#[derive(Debug, Clone)]
pub struct ParsedEvent {
    pub event: Event,
    pub start: Option<Instant>,
    pub end: Option<Instant>,
}

impl ParsedEvent {
    pub fn new(event: Event) -> Self {
        ParsedEvent {
            event,
            start: None,
            end: None,
        }
    }

    pub fn with_instants(event: Event, start: Instant, end: Instant) -> Self {
        ParsedEvent {
            event,
            start: Some(start),
            end: Some(end),
        }
    }

    /// Both instants, if the feed gave usable DTSTART and DTEND values.
    pub fn span(&self) -> Option<Span> {
        Some(Span::new(self.start?, self.end?))
    }
}

/// Result of parsing a whole calendar document.
#[derive(Debug, Clone)]
pub struct ParsedCalendar {
    pub info: CalendarInfo,
    pub events: EventMap,
}
