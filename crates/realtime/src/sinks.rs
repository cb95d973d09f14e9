//! Output sink traits and implementations.
//!
//! The engine emits its two observable effects through these traits. Hosts
//! wire them to their concrete cache store and toast system; the engine itself
//! carries no UI or storage dependency.
//!
//! # Design Rules
//!
//! - Sink calls must be fast and non-blocking (no network calls, no awaits)
//! - Sinks may be invoked concurrently from multiple entities' event handlers
//! - Failure inside a sink must not affect event processing (best-effort)

use std::sync::{Arc, Mutex};

use crate::invalidation::RegionKey;
use crate::notifications::NotableTransition;

/// Marks a bucket of cached query results stale. Idempotent, fire-and-forget.
pub trait CacheSink: Send + Sync {
    fn invalidate(&self, region: RegionKey);
}

/// Renders a toast-equivalent message. Must not block the caller.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, transition: NotableTransition);
}

/// No-op implementations for tests or contexts that don't render anything.
#[derive(Clone, Default)]
pub struct NoOpCacheSink;

impl CacheSink for NoOpCacheSink {
    fn invalidate(&self, _region: RegionKey) {
        // Intentionally empty - invalidations are discarded
    }
}

#[derive(Clone, Default)]
pub struct NoOpNotificationSink;

impl NotificationSink for NoOpNotificationSink {
    fn notify(&self, _transition: NotableTransition) {
        // Intentionally empty - notifications are discarded
    }
}

/// Mock cache sink for testing - collects invalidated regions.
#[derive(Clone, Default)]
pub struct MockCacheSink {
    regions: Arc<Mutex<Vec<RegionKey>>>,
}

impl MockCacheSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all invalidated regions, in call order.
    pub fn regions(&self) -> Vec<RegionKey> {
        self.regions.lock().unwrap().clone()
    }

    pub fn contains(&self, region: RegionKey) -> bool {
        self.regions.lock().unwrap().contains(&region)
    }

    pub fn clear(&self) {
        self.regions.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.regions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.lock().unwrap().is_empty()
    }
}

impl CacheSink for MockCacheSink {
    fn invalidate(&self, region: RegionKey) {
        self.regions.lock().unwrap().push(region);
    }
}

/// Mock notification sink for testing - collects notable transitions.
#[derive(Clone, Default)]
pub struct MockNotificationSink {
    transitions: Arc<Mutex<Vec<NotableTransition>>>,
}

impl MockNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transitions(&self) -> Vec<NotableTransition> {
        self.transitions.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.transitions.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.transitions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.lock().unwrap().is_empty()
    }
}

impl NotificationSink for MockNotificationSink {
    fn notify(&self, transition: NotableTransition) {
        self.transitions.lock().unwrap().push(transition);
    }
}
