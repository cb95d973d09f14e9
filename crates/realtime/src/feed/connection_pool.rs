//! Reference-counted sharing of physical feed connections.
//!
//! Dashboards mount many hooks against the same property; without sharing,
//! every stat tile would open its own feed connection. The pool keeps at most
//! one physical connection per (scope, entity) pair and fans its changes out
//! to every logical subscription over a broadcast channel. The last logical
//! subscription to drop releases the physical connection.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use log::{debug, warn};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::feed_traits::{FeedSource, FeedStream, RawChange};
use crate::errors::FeedError;
use crate::events::Scope;

/// Broadcast buffer per physical connection. A lagging consumer loses the
/// oldest changes and logs a warning; invalidation-heavy bursts are short.
const FANOUT_BUFFER: usize = 256;

type ConnKey = (Scope, String);

/// Shares physical feed connections between logical subscriptions.
///
/// Refcounting rides on `Arc`: the pool holds only `Weak` entries, so dropping
/// every [`LogicalSubscription`] for a key tears the physical connection down
/// without any explicit bookkeeping call.
pub struct FeedConnectionPool {
    source: Arc<dyn FeedSource>,
    conns: Mutex<HashMap<ConnKey, Weak<SharedConn>>>,
}

struct SharedConn {
    sender: broadcast::Sender<RawChange>,
    pump: JoinHandle<()>,
}

impl Drop for SharedConn {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

impl FeedConnectionPool {
    pub fn new(source: Arc<dyn FeedSource>) -> Self {
        Self {
            source,
            conns: Mutex::new(HashMap::new()),
        }
    }

    /// Opens a logical subscription, reusing the physical connection for this
    /// (scope, entity) pair when one is already live.
    pub async fn open(
        &self,
        scope: &Scope,
        entity: &str,
        row_filter: &str,
    ) -> Result<LogicalSubscription, FeedError> {
        let key: ConnKey = (scope.clone(), entity.to_string());

        if let Some(conn) = self.live_conn(&key) {
            return Ok(LogicalSubscription::new(conn, entity));
        }

        // Dial outside the lock, then re-check: a concurrent open for the same
        // key may have won the race, in which case our fresh stream is dropped
        // and the feed implementation releases it.
        let stream = self.source.subscribe(scope, entity, row_filter).await?;

        let mut conns = self.conns.lock().unwrap();
        if let Some(conn) = conns.get(&key).and_then(Weak::upgrade) {
            return Ok(LogicalSubscription::new(conn, entity));
        }

        let (sender, _) = broadcast::channel(FANOUT_BUFFER);
        let pump = tokio::spawn(pump_changes(stream, sender.clone(), entity.to_string()));
        let conn = Arc::new(SharedConn { sender, pump });
        conns.insert(key, Arc::downgrade(&conn));

        debug!("Opened physical feed connection for '{}'", entity);
        Ok(LogicalSubscription::new(conn, entity))
    }

    /// Number of physical connections currently alive.
    pub fn live_connections(&self) -> usize {
        self.conns
            .lock()
            .unwrap()
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    fn live_conn(&self, key: &ConnKey) -> Option<Arc<SharedConn>> {
        let mut conns = self.conns.lock().unwrap();
        match conns.get(key).and_then(Weak::upgrade) {
            Some(conn) => Some(conn),
            None => {
                // Drop the stale entry so the map doesn't grow across
                // scope switches.
                conns.remove(key);
                None
            }
        }
    }
}

async fn pump_changes(
    mut stream: FeedStream,
    sender: broadcast::Sender<RawChange>,
    entity: String,
) {
    while let Some(change) = stream.recv().await {
        // No live receivers is fine; the change is simply dropped.
        let _ = sender.send(change);
    }
    debug!("Physical feed stream for '{}' ended", entity);
}

/// One logical consumer of a shared physical connection.
pub struct LogicalSubscription {
    id: Uuid,
    entity: String,
    conn: Option<Arc<SharedConn>>,
    receiver: broadcast::Receiver<RawChange>,
}

impl LogicalSubscription {
    fn new(conn: Arc<SharedConn>, entity: &str) -> Self {
        let receiver = conn.sender.subscribe();
        Self {
            id: Uuid::new_v4(),
            entity: entity.to_string(),
            conn: Some(conn),
            receiver,
        }
    }

    /// Next raw change, or `None` once closed or the physical feed ended.
    pub async fn recv(&mut self) -> Option<RawChange> {
        if self.conn.is_none() {
            return None;
        }
        loop {
            match self.receiver.recv().await {
                Ok(change) => return Some(change),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(
                        "Subscription {} for '{}' lagged; skipped {} changes",
                        self.id, self.entity, skipped
                    );
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Releases this consumer's share of the physical connection.
    /// Idempotent: closing twice has no further effect.
    pub fn close(&mut self) {
        if self.conn.take().is_some() {
            debug!("Closed subscription {} for '{}'", self.id, self.entity);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }
}
