//! Lodgeboard Domains - declarative realtime configuration per dashboard module.
//!
//! Each module here is one dashboard call site's channel table: which entity
//! collections to watch, which field change counts as a notable transition,
//! how to phrase the notification, and which cache regions go stale on any
//! mutation. The engine in `lodgeboard-realtime` is domain-agnostic; this
//! crate is the only place hotel semantics live.

pub mod dashboard;
pub mod folios;
pub mod guests;
pub mod housekeeping;
pub mod maintenance;
pub mod pos;
pub mod reservations;
pub mod rooms;

#[cfg(test)]
mod tests;
