//! Feed transport contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::errors::FeedError;
use crate::events::{Operation, Scope};

/// One raw row-level change as delivered by the feed, before decoding.
///
/// `before`/`after` stay untyped here; the subscription layer turns them into
/// snapshots and enforces the presence invariants.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawChange {
    pub operation: Operation,
    #[serde(default)]
    pub before: Option<Value>,
    #[serde(default)]
    pub after: Option<Value>,
}

/// Stream of raw changes from one physical feed connection.
///
/// The sender half lives inside the feed implementation; dropping the stream
/// releases the physical connection.
pub struct FeedStream {
    receiver: mpsc::Receiver<RawChange>,
}

impl FeedStream {
    pub fn new(receiver: mpsc::Receiver<RawChange>) -> Self {
        Self { receiver }
    }

    /// Next raw change, or `None` once the feed side hangs up.
    pub async fn recv(&mut self) -> Option<RawChange> {
        self.receiver.recv().await
    }
}

/// Contract for the backend change-feed client.
///
/// Implementations handle transport-level retry and backoff internally; a
/// disconnect must not end the stream. Server-side filtering by the scope
/// column is required so a subscription only ever sees its own tenant's rows.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Opens one physical feed connection for `(scope, entity)`, filtered
    /// server-side by `row_filter`.
    async fn subscribe(
        &self,
        scope: &Scope,
        entity: &str,
        row_filter: &str,
    ) -> Result<FeedStream, FeedError>;
}
