//! Change event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A row snapshot as delivered by the change feed.
///
/// Kept as a loose JSON map because feed payloads are often partial (the
/// previous-row image may carry only a few columns) and backend schema
/// additions must never break decoding.
pub type Snapshot = serde_json::Map<String, Value>;

/// Kind of row-level mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Created,
    Updated,
    Deleted,
}

/// The tenant/property boundary all subscriptions and cache regions are
/// partitioned by.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub tenant_id: String,
    pub property_id: Option<String>,
}

impl Scope {
    /// Scope covering a whole tenant.
    pub fn tenant(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            property_id: None,
        }
    }

    /// Scope narrowed to one property of a tenant.
    pub fn property(tenant_id: impl Into<String>, property_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            property_id: Some(property_id.into()),
        }
    }

    /// An empty scope is a valid idle state: no subscriptions are opened for it.
    pub fn is_empty(&self) -> bool {
        self.tenant_id.trim().is_empty()
    }
}

/// One normalized row-level mutation on a named entity collection.
///
/// Invariant: at least one of `before`/`after` is present, and
/// `Operation::Updated` implies both are. Payloads violating this are dropped
/// at decode time and never constructed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub entity: String,
    pub operation: Operation,
    pub before: Option<Snapshot>,
    pub after: Option<Snapshot>,
    pub scope: Scope,
    pub received_at: DateTime<Utc>,
}

impl ChangeEvent {
    /// The most recent snapshot available: `after` if present, else `before`.
    pub fn latest(&self) -> Option<&Snapshot> {
        self.after.as_ref().or(self.before.as_ref())
    }
}

/// Tolerant field accessors for partial snapshots.
///
/// Message builders read individual columns out of loose JSON maps; a missing
/// or differently-typed column yields `None` rather than an error.
pub trait SnapshotFields {
    /// String value of a column, if present and a string.
    fn str_field(&self, key: &str) -> Option<&str>;

    /// Boolean value of a column, if present and a bool.
    fn bool_field(&self, key: &str) -> Option<bool>;

    /// Human-readable rendering of a column: strings as-is, numbers and bools
    /// stringified. Room and table numbers arrive as either strings or
    /// integers depending on the backend column type.
    fn display_field(&self, key: &str) -> Option<String>;
}

impl SnapshotFields for Snapshot {
    fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn bool_field(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    fn display_field(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}
