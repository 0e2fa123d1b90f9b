//! Comparable instants and time spans used while inferring containment.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// A point in time as far as the feed lets us know it.
///
/// Floating times carry no zone, so they only compare with other floating
/// times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instant {
    Aware(DateTime<Utc>),
    Floating(NaiveDateTime),
}

impl Instant {
    /// DATE values compare as midnight UTC.
    pub fn from_date(date: NaiveDate) -> Self {
        Instant::Aware(date.and_time(NaiveTime::MIN).and_utc())
    }
}

impl PartialOrd for Instant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Instant::Aware(a), Instant::Aware(b)) => Some(a.cmp(b)),
            (Instant::Floating(a), Instant::Floating(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Outcome of testing whether one span contains another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    Contained,
    NotContained,
    /// The instants could not be ordered against each other
    Incomparable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Instant,
    pub end: Instant,
}

impl Span {
    pub fn new(start: Instant, end: Instant) -> Self {
        Span { start, end }
    }

    /// Inclusive containment: `self.start <= other.start && self.end >= other.end`.
    pub fn contains(&self, other: &Span) -> Containment {
        let (Some(start), Some(end)) = (
            self.start.partial_cmp(&other.start),
            self.end.partial_cmp(&other.end),
        ) else {
            return Containment::Incomparable;
        };

        if start != Ordering::Greater && end != Ordering::Less {
            Containment::Contained
        } else {
            Containment::NotContained
        }
    }

    pub fn same_range(&self, other: &Span) -> bool {
        self.start == other.start && self.end == other.end
    }
}
