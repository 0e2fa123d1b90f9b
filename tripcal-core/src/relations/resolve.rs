//! Parent/child resolution over a flat event map.

use crate::event::Event;
use crate::ics::ParsedEvent;
use crate::relations::{Containment, EventMap};

/// Top-level events with their subevents attached.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub events: Vec<Event>,
    /// Number of top-level events
    pub event_count: usize,
    /// Number of events in the input map, children included
    pub total_events: usize,
}

/// Parent links between positions in the event map.
struct Tree {
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
}

impl Tree {
    fn new(len: usize) -> Self {
        Tree {
            parent: vec![None; len],
            children: vec![Vec::new(); len],
        }
    }

    fn is_attached(&self, idx: usize) -> bool {
        self.parent[idx].is_some()
    }

    fn attach(&mut self, parent: usize, child: usize) {
        self.parent[child] = Some(parent);
        self.children[parent].push(child);
    }

    /// Whether `ancestor` is `idx` itself or sits above it.
    fn is_ancestor_or_self(&self, ancestor: usize, idx: usize) -> bool {
        let mut current = Some(idx);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent[node];
        }
        false
    }
}

/// Build the trip hierarchy.
///
/// Explicit links are honoured first, RELATED-TO before the parent-uid
/// extension. Remaining events are then nested by inclusive time
/// containment, scanning in map order. When two ranges are identical the
/// event with the longer summary is kept out of the other's subevents.
/// Output is one level deep: a child's own subevents are dropped.
pub fn resolve(map: EventMap) -> Resolution {
    let tree = resolve_links(&map);
    let total_events = map.len();

    let mut slots: Vec<Option<Event>> = map.into_vec().into_iter().map(|p| Some(p.event)).collect();
    let mut events = Vec::new();

    for idx in 0..slots.len() {
        if tree.is_attached(idx) {
            continue;
        }
        let Some(mut top) = slots[idx].take() else {
            continue;
        };

        // Events attached beneath a child are dropped with its subevents.
        top.subevents = tree.children[idx]
            .iter()
            .filter_map(|&child| slots[child].take())
            .map(|mut child| {
                child.subevents.clear();
                clear_empty_links(child)
            })
            .collect();

        events.push(clear_empty_links(top));
    }

    tracing::debug!(
        top_level = events.len(),
        total = total_events,
        "Resolved event hierarchy"
    );

    Resolution {
        event_count: events.len(),
        total_events,
        events,
    }
}

fn resolve_links(map: &EventMap) -> Tree {
    let entries: Vec<&ParsedEvent> = map.iter().collect();
    let mut tree = Tree::new(entries.len());

    // Explicit links
    for (idx, parsed) in entries.iter().enumerate() {
        if tree.is_attached(idx) {
            continue;
        }

        let event = &parsed.event;
        let targets = [event.related_to.as_deref(), event.parent_uid.as_deref()];

        for target in targets.into_iter().flatten() {
            let Some(parent) = map.position(target) else {
                continue;
            };
            if parent == idx {
                tracing::warn!(uid = %event.uid, "Ignoring self-referencing parent link");
                continue;
            }
            if tree.is_ancestor_or_self(idx, parent) {
                tracing::warn!(uid = %event.uid, parent = target, "Ignoring cyclic parent link");
                continue;
            }
            tree.attach(parent, idx);
            break;
        }
    }

    // Time containment
    for (idx, parsed) in entries.iter().enumerate() {
        if tree.is_attached(idx) {
            continue;
        }
        let Some(span) = parsed.span() else {
            continue;
        };

        for (other_idx, other) in entries.iter().enumerate() {
            if other_idx == idx || tree.is_attached(other_idx) {
                continue;
            }
            let Some(other_span) = other.span() else {
                continue;
            };

            match span.contains(&other_span) {
                Containment::Contained => {
                    if span.same_range(&other_span)
                        && summary_len(&other.event) > summary_len(&parsed.event)
                    {
                        continue;
                    }
                    tree.attach(idx, other_idx);
                }
                Containment::NotContained => {}
                Containment::Incomparable => {
                    tracing::warn!(
                        uid = %parsed.event.uid,
                        other = %other.event.uid,
                        "Error comparing event dates: floating and zoned times"
                    );
                }
            }
        }
    }

    tree
}

fn summary_len(event: &Event) -> usize {
    event.summary.chars().count()
}

fn clear_empty_links(mut event: Event) -> Event {
    event.related_to = event.related_to.filter(|v| !v.is_empty());
    event.relationship_type = event.relationship_type.filter(|v| !v.is_empty());
    event
}
