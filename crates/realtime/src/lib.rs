//! Lodgeboard Realtime - change-feed synchronization engine.
//!
//! This crate contains the domain-agnostic realtime layer for the Lodgeboard
//! dashboard. It listens to a backend change feed scoped to a tenant or
//! property, decodes row-level mutations into [`events::ChangeEvent`]s, and
//! turns each event into two effects: cache-region invalidations and
//! deduplicated, human-readable notifications.
//!
//! The crate is backend-agnostic: the feed transport, the cache store, and the
//! notification UI are collaborators reached through the [`feed::FeedSource`],
//! [`sinks::CacheSink`], and [`sinks::NotificationSink`] traits. Each dashboard
//! domain customizes the engine with a declarative
//! [`channels::ChannelConfig`] table and nothing else.

pub mod channels;
pub mod classifier;
pub mod engine;
pub mod errors;
pub mod events;
pub mod feed;
pub mod invalidation;
pub mod notifications;
pub mod sinks;

// Re-export the types hosts touch most often
pub use engine::SyncEngine;
pub use errors::{Error, Result};
pub use events::{ChangeEvent, Operation, Scope};
pub use notifications::{NotableTransition, Severity};
