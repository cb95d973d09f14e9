//! In-memory feed source for tests and local development.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::feed_traits::{FeedSource, FeedStream, RawChange};
use crate::errors::FeedError;
use crate::events::Scope;

/// Channel depth per physical subscription; pushes beyond it are dropped the
/// same way a slow consumer would drop them on a real transport.
const CHANNEL_BUFFER: usize = 64;

/// Feed source backed by plain channels.
///
/// Tests push raw changes for a (scope, entity) pair and every live
/// subscription for that pair receives them. Counters expose how many
/// physical connections were ever opened and how many are still live, which
/// is what the connection-sharing tests assert on.
#[derive(Clone, Default)]
pub struct InMemoryFeedSource {
    inner: Arc<Mutex<FeedInner>>,
}

#[derive(Default)]
struct FeedInner {
    senders: HashMap<(Scope, String), Vec<mpsc::Sender<RawChange>>>,
    physical_opens: usize,
}

impl InMemoryFeedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers a raw change to every live subscription for the pair.
    pub fn push(&self, scope: &Scope, entity: &str, change: RawChange) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(senders) = inner.senders.get_mut(&(scope.clone(), entity.to_string())) {
            senders.retain(|sender| !sender.is_closed());
            for sender in senders.iter() {
                let _ = sender.try_send(change.clone());
            }
        }
    }

    /// Total physical subscriptions ever opened.
    pub fn physical_opens(&self) -> usize {
        self.inner.lock().unwrap().physical_opens
    }

    /// Physical subscriptions whose stream is still held.
    pub fn live_streams(&self) -> usize {
        let mut inner = self.inner.lock().unwrap();
        for senders in inner.senders.values_mut() {
            senders.retain(|sender| !sender.is_closed());
        }
        inner.senders.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl FeedSource for InMemoryFeedSource {
    async fn subscribe(
        &self,
        scope: &Scope,
        entity: &str,
        _row_filter: &str,
    ) -> Result<FeedStream, FeedError> {
        let (sender, receiver) = mpsc::channel(CHANNEL_BUFFER);
        let mut inner = self.inner.lock().unwrap();
        inner.physical_opens += 1;
        inner
            .senders
            .entry((scope.clone(), entity.to_string()))
            .or_default()
            .push(sender);
        Ok(FeedStream::new(receiver))
    }
}
