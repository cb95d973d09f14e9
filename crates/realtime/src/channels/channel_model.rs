//! Declarative channel configuration types.

use crate::events::{ChangeEvent, Snapshot, SnapshotFields};
use crate::invalidation::RegionKey;
use crate::notifications::NotableTransition;

/// Builds the user-facing message for a classified event.
///
/// Plain function pointers keep the channel tables `const`-friendly and make
/// classification a pure computation.
pub type MessageBuilder = fn(&ChangeEvent) -> Option<NotableTransition>;

/// Which scope column the feed filters on server-side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeFilter {
    /// Rows partitioned by tenant (e.g. guest profiles shared across properties).
    Tenant,
    /// Rows partitioned by property; falls back to the tenant column when the
    /// session has no property selected.
    Property,
}

impl ScopeFilter {
    /// Renders the server-side row filter for a scope.
    pub fn render(&self, scope: &crate::events::Scope) -> String {
        match self {
            ScopeFilter::Tenant => format!("tenant_id=eq.{}", scope.tenant_id),
            ScopeFilter::Property => match &scope.property_id {
                Some(property_id) => format!("property_id=eq.{}", property_id),
                None => format!("tenant_id=eq.{}", scope.tenant_id),
            },
        }
    }
}

/// The single field whose change, and only whose change, triggers a
/// user-visible notification on an update event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Discriminant {
    /// A string column, typically `status`.
    Text(&'static str),
    /// A boolean flag, e.g. `is_blacklisted` on guests.
    Flag(&'static str),
}

impl Discriminant {
    pub fn field(&self) -> &'static str {
        match self {
            Discriminant::Text(field) | Discriminant::Flag(field) => field,
        }
    }

    /// Whether the discriminant changed between two snapshots.
    ///
    /// The previous-row image may be partial; a field missing on either side
    /// counts as unchanged so that partial payloads never produce noise.
    pub fn changed(&self, before: &Snapshot, after: &Snapshot) -> bool {
        match self {
            Discriminant::Text(field) => match (before.str_field(field), after.str_field(field)) {
                (Some(old), Some(new)) => old != new,
                _ => false,
            },
            Discriminant::Flag(field) => match (before.bool_field(field), after.bool_field(field)) {
                (Some(old), Some(new)) => old != new,
                _ => false,
            },
        }
    }
}

/// One entity's subscription configuration: what to watch, what counts as a
/// notable transition, and which cache regions go stale on any mutation.
#[derive(Clone, Debug)]
pub struct ChannelConfig {
    /// Logical collection name on the backend feed (e.g. `reservations`).
    pub entity: &'static str,
    /// Server-side scope filter for the subscription.
    pub filter: ScopeFilter,
    /// Update events notify only when this field changes. `None` means update
    /// events are always silent for this entity.
    pub discriminant: Option<Discriminant>,
    /// Cache regions invalidated by any mutation of this entity, including
    /// second-order dependents.
    pub regions: &'static [RegionKey],
    /// Message builder for classified events.
    pub build: MessageBuilder,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Scope;
    use serde_json::json;

    fn snapshot(value: serde_json::Value) -> Snapshot {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    #[test]
    fn test_tenant_filter_rendering() {
        let scope = Scope::property("t-1", "p-9");
        assert_eq!(ScopeFilter::Tenant.render(&scope), "tenant_id=eq.t-1");
    }

    #[test]
    fn test_property_filter_rendering() {
        let scope = Scope::property("t-1", "p-9");
        assert_eq!(ScopeFilter::Property.render(&scope), "property_id=eq.p-9");
    }

    #[test]
    fn test_property_filter_falls_back_to_tenant() {
        let scope = Scope::tenant("t-1");
        assert_eq!(ScopeFilter::Property.render(&scope), "tenant_id=eq.t-1");
    }

    #[test]
    fn test_text_discriminant_detects_change() {
        let disc = Discriminant::Text("status");
        let before = snapshot(json!({"status": "open"}));
        let after = snapshot(json!({"status": "resolved"}));
        assert!(disc.changed(&before, &after));
    }

    #[test]
    fn test_text_discriminant_ignores_equal_values() {
        let disc = Discriminant::Text("status");
        let before = snapshot(json!({"status": "open", "notes": "a"}));
        let after = snapshot(json!({"status": "open", "notes": "b"}));
        assert!(!disc.changed(&before, &after));
    }

    #[test]
    fn test_partial_snapshot_counts_as_unchanged() {
        let disc = Discriminant::Text("status");
        let before = snapshot(json!({"id": "r-1"}));
        let after = snapshot(json!({"id": "r-1", "status": "occupied"}));
        assert!(!disc.changed(&before, &after));
    }

    #[test]
    fn test_flag_discriminant() {
        let disc = Discriminant::Flag("is_blacklisted");
        let before = snapshot(json!({"is_blacklisted": false}));
        let after = snapshot(json!({"is_blacklisted": true}));
        assert!(disc.changed(&before, &after));
        assert!(!disc.changed(&after, &after.clone()));
    }
}
