//! Trip hierarchy inference.
//!
//! Events are nested under a parent either because the feed says so
//! (RELATED-TO, X-PARENT-UID) or because their time range falls inside
//! another event's range. The output is at most one level deep.

mod map;
mod resolve;
mod span;

pub use map::EventMap;
pub use resolve::{Resolution, resolve};
pub use span::{Containment, Instant, Span};
