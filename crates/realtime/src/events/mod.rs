//! Change events module - normalized row-level mutations.
//!
//! A [`ChangeEvent`] is the engine's internal representation of one
//! insert/update/delete on a backend collection, carrying the previous and new
//! row snapshots where the feed provides them.

mod events_model;

pub use events_model::*;
