//! Channel configuration module - the declarative per-domain surface.
//!
//! A dashboard domain customizes the engine with a table of
//! [`ChannelConfig`] values and nothing else; the engine itself stays
//! domain-agnostic.

mod channel_model;

pub use channel_model::*;
