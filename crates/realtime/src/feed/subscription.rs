//! Decoding subscription: raw feed changes to typed change events.

use chrono::Utc;
use log::warn;
use serde_json::Value;

use super::connection_pool::LogicalSubscription;
use super::feed_traits::RawChange;
use crate::errors::DecodeError;
use crate::events::{ChangeEvent, Operation, Scope, Snapshot};

/// One scoped, decoding consumer of an entity's change feed.
///
/// Malformed payloads are dropped with a diagnostic log; one bad event never
/// terminates the stream.
pub struct Subscription {
    entity: String,
    scope: Scope,
    inner: LogicalSubscription,
}

impl Subscription {
    pub(crate) fn new(entity: &str, scope: Scope, inner: LogicalSubscription) -> Self {
        Self {
            entity: entity.to_string(),
            scope,
            inner,
        }
    }

    /// Next decoded change event, or `None` once the subscription is closed
    /// or the feed ends.
    pub async fn next_event(&mut self) -> Option<ChangeEvent> {
        while let Some(raw) = self.inner.recv().await {
            match decode_change(&self.entity, &self.scope, raw) {
                Ok(event) => return Some(event),
                Err(err) => {
                    warn!("Dropping malformed change for '{}': {}", self.entity, err);
                }
            }
        }
        None
    }

    /// Idempotent; see [`LogicalSubscription::close`].
    pub fn close(&mut self) {
        self.inner.close();
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }
}

/// Decodes one raw change, enforcing the snapshot-presence invariants:
/// at least one snapshot, and both for updates.
pub(crate) fn decode_change(
    entity: &str,
    scope: &Scope,
    raw: RawChange,
) -> Result<ChangeEvent, DecodeError> {
    let before = raw.before.map(as_snapshot).transpose()?;
    let after = raw.after.map(as_snapshot).transpose()?;

    match raw.operation {
        Operation::Created if after.is_none() => {
            return Err(DecodeError::MissingSnapshot("after", raw.operation));
        }
        Operation::Updated if before.is_none() => {
            return Err(DecodeError::MissingSnapshot("before", raw.operation));
        }
        Operation::Updated if after.is_none() => {
            return Err(DecodeError::MissingSnapshot("after", raw.operation));
        }
        Operation::Deleted if before.is_none() => {
            return Err(DecodeError::MissingSnapshot("before", raw.operation));
        }
        _ => {}
    }

    Ok(ChangeEvent {
        entity: entity.to_string(),
        operation: raw.operation,
        before,
        after,
        scope: scope.clone(),
        received_at: Utc::now(),
    })
}

fn as_snapshot(value: Value) -> Result<Snapshot, DecodeError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(DecodeError::NotAnObject),
    }
}
