//! Core library for tripcal.
//!
//! - `ics` normalizes calendar components into [`Event`]s
//! - `relations` infers the trip → subevent hierarchy
//! - `rows` projects the hierarchy into table rows
//! - `sync` merges rows into remote tables under ETag concurrency control

pub mod config;
pub mod convert;
pub mod error;
pub mod event;
pub mod feed;
pub mod ics;
pub mod relations;
pub mod rows;
pub mod sync;

pub use convert::{ConvertedCalendar, convert_document, convert_feed};
pub use error::{TripCalError, TripCalResult};
pub use event::*;
