//! Realtime service wiring the three stream supervisors together.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::cache::LocalCache;
use crate::channel::Stream;
use crate::feed::ChangeFeed;
use crate::host::HostEnvironment;
use crate::models::{Entry, EntryTag, Tag, UserId};
use crate::reconcile::ResyncCallback;
use crate::supervisor::{ConnectionSupervisor, RealtimeConfig};

/// The three per-stream caches the realtime layer watches.
///
/// Owned by the surrounding data layer; the realtime service only holds
/// cheap read handles.
#[derive(Debug, Clone, Default)]
pub struct StreamCaches {
    pub entries: LocalCache<Entry>,
    pub tags: LocalCache<Tag>,
    pub entry_tags: LocalCache<EntryTag>,
}

impl StreamCaches {
    /// Create three empty caches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Running realtime session: one supervisor task per stream.
pub struct Realtime {
    tasks: Vec<(Stream, JoinHandle<()>)>,
}

impl Realtime {
    /// Spawn the entries, tags, and entry-tags supervisors.
    ///
    /// `on_resync` receives the stream whose cache went stale; the caller is
    /// expected to re-fetch that stream and merge into the matching cache.
    pub fn start<F>(
        feed: Arc<F>,
        host: Arc<dyn HostEnvironment>,
        user_id: UserId,
        caches: &StreamCaches,
        on_resync: ResyncCallback,
        config: &RealtimeConfig,
    ) -> Self
    where
        F: ChangeFeed + 'static,
    {
        let entries = ConnectionSupervisor::<Entry, F>::new(
            Arc::clone(&feed),
            Arc::clone(&host),
            user_id,
            caches.entries.clone(),
            Arc::clone(&on_resync),
            config,
        );
        let tags = ConnectionSupervisor::<Tag, F>::new(
            Arc::clone(&feed),
            Arc::clone(&host),
            user_id,
            caches.tags.clone(),
            Arc::clone(&on_resync),
            config,
        );
        let entry_tags = ConnectionSupervisor::<EntryTag, F>::new(
            feed,
            host,
            user_id,
            caches.entry_tags.clone(),
            on_resync,
            config,
        );

        Self {
            tasks: vec![
                (Stream::Entries, tokio::spawn(entries.run())),
                (Stream::Tags, tokio::spawn(tags.run())),
                (Stream::EntryTags, tokio::spawn(entry_tags.run())),
            ],
        }
    }

    /// Whether all three supervisor tasks are still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.tasks.iter().all(|(_, task)| !task.is_finished())
    }

    /// Stop all supervisor tasks.
    pub fn shutdown(&self) {
        for (stream, task) in &self.tasks {
            tracing::debug!("Stopping {stream} supervisor");
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ChangeKind, RawChange};
    use crate::feed::testing::MockFeed;
    use crate::host::StaticHost;
    use crate::models::{Day, JournalId, TagId};
    use pretty_assertions::assert_eq;
    use std::sync::{Mutex, PoisonError};
    use std::time::Duration;

    fn collecting_callback() -> (ResyncCallback, Arc<Mutex<Vec<Stream>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: ResyncCallback = Arc::new(move |stream| {
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(stream);
        });
        (callback, seen)
    }

    fn fast_config() -> RealtimeConfig {
        RealtimeConfig::default().with_poll_interval(Duration::from_millis(10))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn start_subscribes_all_three_streams() {
        let feed = Arc::new(MockFeed::default());
        let (callback, _) = collecting_callback();
        let user_id = UserId::new();

        let realtime = Realtime::start(
            Arc::clone(&feed),
            Arc::new(StaticHost::always_active()),
            user_id,
            &StreamCaches::new(),
            callback,
            &fast_config(),
        );

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(realtime.is_running());

        let mut channels = feed.channels.lock().unwrap().clone();
        channels.sort();
        assert_eq!(channels.len(), 3);
        for (stream, channel) in [
            (Stream::Entries, &channels[0]),
            (Stream::EntryTags, &channels[1]),
            (Stream::Tags, &channels[2]),
        ] {
            assert_eq!(channel, &stream.channel(&user_id));
        }

        realtime.shutdown();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn stale_entry_event_requests_entries_resync() {
        let feed = Arc::new(MockFeed::default());
        let (callback, seen) = collecting_callback();
        let user_id = UserId::new();
        let caches = StreamCaches::new();

        let realtime = Realtime::start(
            Arc::clone(&feed),
            Arc::new(StaticHost::always_active()),
            user_id,
            &caches,
            callback,
            &fast_config(),
        );
        tokio::time::sleep(Duration::from_millis(40)).await;

        // Remote entry the local cache has never seen.
        let remote = Entry::new(
            user_id,
            Day::new("20240101").unwrap(),
            JournalId::new(),
            TagId::new(),
            "remote text",
        );
        feed.emit_to(
            &Stream::Entries.channel(&user_id),
            &RawChange {
                kind: ChangeKind::Insert,
                new: Some(serde_json::to_value(&remote).unwrap()),
                old: None,
            },
        );
        tokio::time::sleep(Duration::from_millis(40)).await;

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen, vec![Stream::Entries]);

        realtime.shutdown();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn shutdown_stops_all_tasks() {
        let feed = Arc::new(MockFeed::default());
        let (callback, _) = collecting_callback();

        let realtime = Realtime::start(
            feed,
            Arc::new(StaticHost::always_active()),
            UserId::new(),
            &StreamCaches::new(),
            callback,
            &fast_config(),
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(realtime.is_running());

        realtime.shutdown();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!realtime.is_running());
    }
}
