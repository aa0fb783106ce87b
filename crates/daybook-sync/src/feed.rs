//! Change-feed transport interface.
//!
//! The backend that actually carries row changes (a hosted realtime service
//! in production) is consumed through these traits so the supervisor and
//! reconciler can be exercised without a network.

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use crate::error::Result;
use crate::event::RawChange;

/// Lifecycle state reported by a subscription handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Join handshake in progress
    Joining,
    /// Live and receiving events
    Joined,
    /// Closed by either side
    Closed,
    /// Transport-level failure
    Errored,
}

/// Liveness introspection for an open subscription.
pub trait SubscriptionHandle: Send + Sync + 'static {
    /// Current channel state.
    fn state(&self) -> ChannelState;

    /// Whether the subscription is live.
    fn is_joined(&self) -> bool {
        self.state() == ChannelState::Joined
    }

    /// Whether the subscription has failed at the transport level.
    fn is_errored(&self) -> bool {
        self.state() == ChannelState::Errored
    }
}

/// A live change-feed backend.
///
/// `subscribe` opens a feed scoped to a channel name and forwards every
/// inbound event into `events`; `release` tears a subscription down. Both may
/// fail; callers treat failures as transient transport errors.
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    type Handle: SubscriptionHandle;

    /// Open a subscription to `channel`, delivering events via `events`.
    async fn subscribe(
        &self,
        channel: &str,
        events: UnboundedSender<RawChange>,
    ) -> Result<Self::Handle>;

    /// Tear down a subscription.
    async fn release(&self, handle: Self::Handle) -> Result<()>;
}
