//! daybook-sync - Realtime reconciliation core for Daybook
//!
//! Keeps one live change-feed subscription per stream (entries, tags,
//! entry-tags), reconnecting on a fixed-interval poll while the host is
//! unlocked and online, and judges every inbound change event against the
//! locally cached records. When the cache turns out stale, the owning data
//! layer is asked for a full resync; this crate never mutates the cache or
//! fetches data itself.

pub mod cache;
pub mod channel;
pub mod error;
pub mod event;
pub mod feed;
pub mod host;
pub mod models;
pub mod reconcile;
pub mod service;
pub mod supervisor;

pub use cache::LocalCache;
pub use channel::Stream;
pub use error::{Error, Result};
pub use event::{ChangeEvent, ChangeKind, RawChange};
pub use feed::{ChangeFeed, ChannelState, SubscriptionHandle};
pub use host::{HostEnvironment, IdleState, StaticHost};
pub use models::{Day, Entry, EntryTag, StreamRecord, SyncStatus, Tag, UserId};
pub use reconcile::{Reconciler, ResyncCallback, Verdict};
pub use service::{Realtime, StreamCaches};
pub use supervisor::{ConnectionSupervisor, LinkStatus, RealtimeConfig, DEFAULT_POLL_INTERVAL};
