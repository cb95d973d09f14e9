//! Cache-region invalidation mapping.
//!
//! Invalidation is a pure function of the entity name: it never depends on the
//! operation or on payload content, so it stays safe to compute even when a
//! snapshot fails to decode. The mapping is built once at engine construction
//! and validated for totality there; an entity with no regions is a code
//! defect, not a runtime condition.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::channels::ChannelConfig;
use crate::errors::ConfigError;

/// Symbolic identifier for a bucket of cached query results that is marked
/// stale as a unit (e.g. `rooms`, `room-stats`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RegionKey(&'static str);

impl RegionKey {
    pub const fn new(key: &'static str) -> Self {
        Self(key)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Static entity-to-regions table derived from the channel configuration.
#[derive(Debug, Default)]
pub struct RegionMap {
    regions: HashMap<&'static str, Vec<RegionKey>>,
}

impl RegionMap {
    /// Builds the map from the declarative channel table, failing fast on
    /// duplicate entities and empty region sets.
    pub fn from_channels(channels: &[ChannelConfig]) -> Result<Self, ConfigError> {
        if channels.is_empty() {
            return Err(ConfigError::Empty);
        }

        let mut regions: HashMap<&'static str, Vec<RegionKey>> = HashMap::new();
        for channel in channels {
            if channel.regions.is_empty() {
                return Err(ConfigError::EmptyRegions(channel.entity));
            }
            if regions.contains_key(channel.entity) {
                return Err(ConfigError::DuplicateEntity(channel.entity));
            }

            let mut keys: Vec<RegionKey> = Vec::with_capacity(channel.regions.len());
            for key in channel.regions {
                if !keys.contains(key) {
                    keys.push(*key);
                }
            }
            regions.insert(channel.entity, keys);
        }

        Ok(Self { regions })
    }

    /// Regions to invalidate for an entity. Unknown entities map to nothing;
    /// the engine only ever asks for entities it subscribed to.
    pub fn regions_for(&self, entity: &str) -> &[RegionKey] {
        self.regions.get(entity).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_configured(&self, entity: &str) -> bool {
        self.regions.contains_key(entity)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
