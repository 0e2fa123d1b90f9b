//! Ordered uid → event map.

use std::collections::HashMap;

use crate::ics::ParsedEvent;

/// Events keyed by uid, iterated in first-insertion order.
///
/// Inserting a uid that is already present replaces the earlier event in
/// place, so a redefinition keeps the position of the first definition.
#[derive(Debug, Clone, Default)]
pub struct EventMap {
    entries: Vec<ParsedEvent>,
    positions: HashMap<String, usize>,
}

impl EventMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event, returning the replaced one if the uid was taken.
    /// Events without a uid are not stored.
    pub fn insert(&mut self, parsed: ParsedEvent) -> Option<ParsedEvent> {
        if !parsed.event.has_uid() {
            return None;
        }

        match self.positions.get(&parsed.event.uid) {
            Some(&idx) => Some(std::mem::replace(&mut self.entries[idx], parsed)),
            None => {
                self.positions
                    .insert(parsed.event.uid.clone(), self.entries.len());
                self.entries.push(parsed);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self, uid: &str) -> Option<usize> {
        self.positions.get(uid).copied()
    }

    pub fn get(&self, uid: &str) -> Option<&ParsedEvent> {
        self.position(uid).map(|idx| &self.entries[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParsedEvent> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<ParsedEvent> {
        self.entries
    }
}

impl FromIterator<ParsedEvent> for EventMap {
    fn from_iter<I: IntoIterator<Item = ParsedEvent>>(iter: I) -> Self {
        let mut map = EventMap::new();
        for parsed in iter {
            map.insert(parsed);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;

    #[test]
    fn duplicate_uid_replaces_in_place() {
        let map: EventMap = [
            ParsedEvent::new(Event::new("a", "first")),
            ParsedEvent::new(Event::new("b", "other")),
            ParsedEvent::new(Event::new("a", "second")),
        ]
        .into_iter()
        .collect();

        assert_eq!(map.len(), 2);
        let summaries: Vec<_> = map.iter().map(|p| p.event.summary.as_str()).collect();
        assert_eq!(summaries, vec!["second", "other"]);
    }

    #[test]
    fn events_without_uid_are_dropped() {
        let mut map = EventMap::new();
        assert!(map.insert(ParsedEvent::new(Event::new("", "anonymous"))).is_none());
        assert!(map.is_empty());
    }
}
