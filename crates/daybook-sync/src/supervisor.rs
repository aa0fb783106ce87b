//! Per-stream connection supervision.
//!
//! One supervisor owns one stream's subscription for the life of the
//! process. A fixed-interval timer drives `tick()`: if the subscription is
//! live, the tick is a no-op; otherwise the supervisor releases whatever
//! stale handle remains, checks that the host is unlocked and online, and
//! opens a fresh subscription to the per-user channel. Transport failures
//! are logged and absorbed; the next tick retries.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::MissedTickBehavior;

use crate::cache::LocalCache;
use crate::event::{ChangeEvent, RawChange};
use crate::feed::{ChangeFeed, SubscriptionHandle};
use crate::host::HostEnvironment;
use crate::models::{StreamRecord, UserId};
use crate::reconcile::{Reconciler, ResyncCallback};

/// Default reconnect poll interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Timing configuration for the realtime supervisors.
#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    /// How often each supervisor re-checks its subscription (default: 5s)
    pub poll_interval: Duration,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl RealtimeConfig {
    /// Set the reconnect poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Connection lifecycle, reported for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Disconnected,
    Subscribing,
    Joined,
    Errored,
}

enum LinkState<H> {
    Disconnected,
    /// Subscribe call in flight; doubles as the re-entrancy guard, so a
    /// tick arriving mid-subscribe does nothing.
    Subscribing,
    Joined(H),
}

/// Keeps exactly one live subscription for one stream.
pub struct ConnectionSupervisor<R, F>
where
    R: StreamRecord + DeserializeOwned,
    F: ChangeFeed,
{
    feed: Arc<F>,
    host: Arc<dyn HostEnvironment>,
    user_id: UserId,
    reconciler: Reconciler<R>,
    link: LinkState<F::Handle>,
    events_tx: UnboundedSender<RawChange>,
    events_rx: UnboundedReceiver<RawChange>,
    poll_interval: Duration,
}

impl<R, F> ConnectionSupervisor<R, F>
where
    R: StreamRecord + DeserializeOwned,
    F: ChangeFeed,
{
    /// Create a supervisor for this record type's stream.
    ///
    /// The supervisor only reads `cache`; `on_resync` is invoked whenever an
    /// inbound event shows the cache to be stale.
    pub fn new(
        feed: Arc<F>,
        host: Arc<dyn HostEnvironment>,
        user_id: UserId,
        cache: LocalCache<R>,
        on_resync: ResyncCallback,
        config: &RealtimeConfig,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            feed,
            host,
            user_id,
            reconciler: Reconciler::new(cache, on_resync),
            link: LinkState::Disconnected,
            events_tx,
            events_rx,
            poll_interval: config.poll_interval,
        }
    }

    /// The channel this supervisor subscribes to.
    #[must_use]
    pub fn channel(&self) -> String {
        R::STREAM.channel(&self.user_id)
    }

    /// Current connection status.
    #[must_use]
    pub fn status(&self) -> LinkStatus {
        match &self.link {
            LinkState::Disconnected => LinkStatus::Disconnected,
            LinkState::Subscribing => LinkStatus::Subscribing,
            LinkState::Joined(handle) => {
                if handle.is_joined() {
                    LinkStatus::Joined
                } else if handle.is_errored() {
                    LinkStatus::Errored
                } else {
                    LinkStatus::Disconnected
                }
            }
        }
    }

    /// One pass of the reconnect loop.
    ///
    /// Never returns an error: transport failures are logged and retried on
    /// the next tick.
    pub async fn tick(&mut self) {
        match &self.link {
            LinkState::Subscribing => {
                tracing::debug!("{} subscribe already in flight, skipping tick", R::STREAM);
                return;
            }
            LinkState::Joined(handle) if handle.is_joined() => {
                tracing::debug!("{} subscription is joined", R::STREAM);
                return;
            }
            _ => {}
        }

        // Best-effort release of the stale handle; a failure here must not
        // block the fresh subscribe attempt below.
        if let LinkState::Joined(handle) =
            std::mem::replace(&mut self.link, LinkState::Disconnected)
        {
            tracing::debug!(
                "{} subscription is {:?}, releasing it",
                R::STREAM,
                handle.state()
            );
            if let Err(error) = self.feed.release(handle).await {
                tracing::warn!(
                    "Failed to release stale {} subscription: {}",
                    R::STREAM,
                    error
                );
            }
        }

        if !self.host.allows_subscribe() {
            tracing::info!(
                "{} reconnect deferred (idle_state={:?}, online={})",
                R::STREAM,
                self.host.idle_state(),
                self.host.is_online()
            );
            return;
        }

        self.link = LinkState::Subscribing;
        let channel = self.channel();
        match self.feed.subscribe(&channel, self.events_tx.clone()).await {
            Ok(handle) => {
                tracing::info!("Subscribed to {channel}");
                self.link = LinkState::Joined(handle);
            }
            Err(error) => {
                tracing::warn!("Failed to subscribe to {channel}: {error}");
                self.link = LinkState::Disconnected;
            }
        }
    }

    /// Judge one inbound wire event.
    ///
    /// Undecodable payloads also trigger a resync: remote state we cannot
    /// read is stale state as far as the cache is concerned.
    pub fn handle_event(&self, raw: RawChange) {
        match ChangeEvent::<R>::decode(raw) {
            Ok(event) => {
                self.reconciler.observe(&event);
            }
            Err(error) => {
                tracing::warn!(
                    "Dropping undecodable {} event and requesting resync: {}",
                    R::STREAM,
                    error
                );
                self.reconciler.request_resync();
            }
        }
    }

    /// Process any buffered events without waiting for more.
    pub fn drain_events(&mut self) {
        while let Ok(raw) = self.events_rx.try_recv() {
            self.handle_event(raw);
        }
    }

    /// Run the supervisor until the owning task is aborted.
    ///
    /// Ticks fire at the configured poll interval and are awaited serially,
    /// so overlapping subscribe attempts cannot occur. There is no retry
    /// cap: the loop is meant to run for the process lifetime.
    pub async fn run(mut self) {
        tracing::info!(
            "{} supervisor started (poll interval {:?})",
            R::STREAM,
            self.poll_interval
        );
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                // The supervisor keeps its own sender alive, so recv() can
                // never yield None here.
                Some(raw) = self.events_rx.recv() => {
                    self.handle_event(raw);
                }
            }
        }
    }
}
