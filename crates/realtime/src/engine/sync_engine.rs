//! The sync engine: owns subscriptions for the current scope and wires every
//! change event through invalidation and classification.
//!
//! # Architecture
//!
//! ```text
//! SyncEngine
//!       │
//!       ├─► FeedConnectionPool (one shared physical connection per entity)
//!       ├─► RegionMap          (entity → stale cache regions)
//!       ├─► classify()         (per-channel notable transitions)
//!       ├─► CacheSink          (invalidations, unconditional)
//!       └─► NotificationSink   (notable transitions only)
//! ```
//!
//! Lifecycle per scope is `Idle -> Active -> Idle`, re-enterable. Entering
//! `Active` with a new scope fully replaces the previous scope's
//! subscriptions, and `stop()` joins every worker before returning, so no
//! event from a torn-down scope ever reaches a sink afterwards.

use std::sync::Arc;

use futures::future::join_all;
use log::{debug, error, info};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::channels::ChannelConfig;
use crate::classifier::classify;
use crate::errors::{ConfigError, Result};
use crate::events::{ChangeEvent, Scope};
use crate::feed::{FeedConnectionPool, FeedSource, Subscription};
use crate::invalidation::RegionMap;
use crate::sinks::{CacheSink, NotificationSink};

/// Orchestrates one subscription per configured entity for the current scope.
///
/// The engine exclusively owns the subscriptions it creates; no other
/// component ever holds a live reference to them.
pub struct SyncEngine {
    channels: Arc<Vec<ChannelConfig>>,
    regions: Arc<RegionMap>,
    pool: Arc<FeedConnectionPool>,
    cache: Arc<dyn CacheSink>,
    notifications: Arc<dyn NotificationSink>,
    active: Option<ActiveScope>,
}

struct ActiveScope {
    scope: Scope,
    workers: Vec<EntityWorker>,
}

struct EntityWorker {
    entity: &'static str,
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SyncEngine {
    /// Validates the channel table and builds an idle engine.
    ///
    /// Configuration defects (empty table, duplicate entities, empty region
    /// sets, blank discriminants) fail here, before any subscription opens.
    pub fn new(
        channels: Vec<ChannelConfig>,
        feed: Arc<dyn FeedSource>,
        cache: Arc<dyn CacheSink>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Result<Self> {
        let regions = RegionMap::from_channels(&channels)?;
        for channel in &channels {
            if let Some(discriminant) = channel.discriminant {
                if discriminant.field().trim().is_empty() {
                    return Err(ConfigError::BlankDiscriminant(channel.entity).into());
                }
            }
        }

        Ok(Self {
            channels: Arc::new(channels),
            regions: Arc::new(regions),
            pool: Arc::new(FeedConnectionPool::new(feed)),
            cache,
            notifications,
            active: None,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn scope(&self) -> Option<&Scope> {
        self.active.as_ref().map(|active| &active.scope)
    }

    /// Enters `Active` for a scope, fully replacing any previous scope's
    /// subscriptions first. An empty scope is the idle state, not an error.
    pub async fn start(&mut self, scope: Scope) -> Result<()> {
        self.stop().await;

        if scope.is_empty() {
            debug!("No tenant in scope; realtime sync stays idle");
            return Ok(());
        }

        let mut workers = Vec::with_capacity(self.channels.len());
        for channel in self.channels.iter() {
            let row_filter = channel.filter.render(&scope);
            let logical = self.pool.open(&scope, channel.entity, &row_filter).await?;
            let subscription = Subscription::new(channel.entity, scope.clone(), logical);

            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            let handle = tokio::spawn(entity_worker(
                subscription,
                channel.clone(),
                Arc::clone(&self.regions),
                Arc::clone(&self.cache),
                Arc::clone(&self.notifications),
                shutdown_rx,
            ));
            workers.push(EntityWorker {
                entity: channel.entity,
                shutdown: shutdown_tx,
                handle,
            });
        }

        info!(
            "Realtime sync active for tenant {} ({} channels)",
            scope.tenant_id,
            workers.len()
        );
        self.active = Some(ActiveScope { scope, workers });
        Ok(())
    }

    /// Returns to `Idle`, stopping delivery from every open subscription
    /// before returning. No-op when already idle.
    pub async fn stop(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        for worker in &active.workers {
            let _ = worker.shutdown.send(true);
        }

        let results = join_all(active.workers.into_iter().map(|worker| async move {
            (worker.entity, worker.handle.await)
        }))
        .await;

        for (entity, result) in results {
            if let Err(err) = result {
                if !err.is_cancelled() {
                    error!("Realtime worker for '{}' panicked: {}", entity, err);
                }
            }
        }

        info!(
            "Realtime sync stopped for tenant {}",
            active.scope.tenant_id
        );
    }

    /// Drives the engine from a reactive scope provider until the provider is
    /// dropped. Emitting a new scope replaces the current subscriptions;
    /// emitting `None` (logout/unset) returns the engine to idle.
    pub async fn run(mut self, mut scope_rx: watch::Receiver<Option<Scope>>) {
        loop {
            let next = scope_rx.borrow_and_update().clone();
            match next {
                Some(scope) => {
                    if self.scope() != Some(&scope) {
                        if let Err(err) = self.start(scope).await {
                            error!("Failed to start realtime sync: {}", err);
                        }
                    }
                }
                None => self.stop().await,
            }

            if scope_rx.changed().await.is_err() {
                break;
            }
        }
        self.stop().await;
    }
}

/// Independent per-entity consumer loop. Workers for different entities never
/// block one another.
async fn entity_worker(
    mut subscription: Subscription,
    channel: ChannelConfig,
    regions: Arc<RegionMap>,
    cache: Arc<dyn CacheSink>,
    notifications: Arc<dyn NotificationSink>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            biased;

            _ = shutdown.changed() => {
                subscription.close();
                return;
            }
            event = subscription.next_event() => {
                match event {
                    Some(event) => handle_event(
                        &channel,
                        &regions,
                        cache.as_ref(),
                        notifications.as_ref(),
                        &event,
                    ),
                    None => {
                        debug!("Feed for '{}' ended; worker exiting", channel.entity);
                        return;
                    }
                }
            }
        }
    }
}

/// Fan-out for one event: invalidate first and unconditionally, then notify
/// if the classifier approves. Stale caches are never left behind just
/// because no user-visible notification fires.
pub(crate) fn handle_event(
    channel: &ChannelConfig,
    regions: &RegionMap,
    cache: &dyn CacheSink,
    notifications: &dyn NotificationSink,
    event: &ChangeEvent,
) {
    for region in regions.regions_for(&event.entity) {
        cache.invalidate(*region);
    }

    if let Some(transition) = classify(channel, event) {
        notifications.notify(transition);
    }
}
