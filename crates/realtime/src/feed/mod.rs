//! Change-feed boundary: transport trait, shared connections, subscriptions.
//!
//! The physical transport (retry, backoff, reconnects) lives behind
//! [`FeedSource`]; this module owns connection sharing and payload decoding.
//! One physical feed connection is kept per (scope, entity) pair no matter how
//! many logical consumers are mounted against it.

mod connection_pool;
mod feed_traits;
mod memory_feed;
mod subscription;

pub use connection_pool::{FeedConnectionPool, LogicalSubscription};
pub use feed_traits::{FeedSource, FeedStream, RawChange};
pub use memory_feed::InMemoryFeedSource;
pub use subscription::Subscription;
