//! Staleness reconciliation for inbound change events.
//!
//! The reconciler never merges remote rows into the cache. It only decides
//! whether the cache is already current, and asks the data layer for a full
//! resync when it is not. Incremental merging happens elsewhere, after the
//! resync fetch.

use std::sync::Arc;

use crate::cache::LocalCache;
use crate::channel::Stream;
use crate::event::ChangeEvent;
use crate::models::StreamRecord;

/// Outcome of judging one change event against the local cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The cache already reflects this change.
    UpToDate,
    /// The cache is stale; a full resync is required.
    ResyncRequired,
}

/// Callback invoked when a stream's cache needs a full resync.
pub type ResyncCallback = Arc<dyn Fn(Stream) + Send + Sync>;

/// Judge a change event against the cached records.
///
/// Insert/Update: the cache is current iff it holds a record with the same
/// natural key whose `created_at` and `revision` both match. A missing local
/// record counts as stale, not as an error — there is no separate "unknown"
/// outcome. Delete: the cache is current iff the key is already gone.
/// Pure in (event, cache state), so replaying an event yields the same
/// verdict.
#[must_use]
pub fn assess<R: StreamRecord>(event: &ChangeEvent<R>, cache: &LocalCache<R>) -> Verdict {
    match event {
        ChangeEvent::Insert(incoming) | ChangeEvent::Update(incoming) => {
            match cache.lookup(&incoming.key()) {
                Some(local)
                    if local.created_at() == incoming.created_at()
                        && local.revision() == incoming.revision() =>
                {
                    Verdict::UpToDate
                }
                _ => Verdict::ResyncRequired,
            }
        }
        ChangeEvent::Delete(removed) => {
            if cache.contains(&removed.key()) {
                Verdict::ResyncRequired
            } else {
                Verdict::UpToDate
            }
        }
    }
}

/// Per-stream reconciler: pairs one stream's cache with the resync callback.
pub struct Reconciler<R: StreamRecord> {
    cache: LocalCache<R>,
    on_resync: ResyncCallback,
}

impl<R: StreamRecord> Reconciler<R> {
    /// Create a reconciler over the given cache.
    #[must_use]
    pub fn new(cache: LocalCache<R>, on_resync: ResyncCallback) -> Self {
        Self { cache, on_resync }
    }

    /// Judge an event and fire the resync callback if the cache is stale.
    ///
    /// The callback fires at most once per event.
    pub fn observe(&self, event: &ChangeEvent<R>) -> Verdict {
        let verdict = assess(event, &self.cache);
        match verdict {
            Verdict::UpToDate => {
                tracing::debug!(
                    "{} {:?} event already reflected locally",
                    R::STREAM,
                    event.kind()
                );
            }
            Verdict::ResyncRequired => {
                tracing::debug!(
                    "{} {:?} event not reflected locally, requesting resync",
                    R::STREAM,
                    event.kind()
                );
                self.request_resync();
            }
        }
        verdict
    }

    /// Fire the resync callback directly.
    ///
    /// Used when an event cannot be judged at all (e.g. its payload failed to
    /// decode): remote state we cannot read is treated as stale state.
    pub fn request_resync(&self) {
        (self.on_resync)(R::STREAM);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, Entry, JournalId, TagId, UserId};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn entry(day: &str) -> Entry {
        Entry::new(
            UserId::new(),
            Day::new(day).unwrap(),
            JournalId::new(),
            TagId::new(),
            "text",
        )
    }

    fn counting_reconciler(cache: LocalCache<Entry>) -> (Reconciler<Entry>, Arc<AtomicUsize>) {
        let resyncs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&resyncs);
        let reconciler = Reconciler::new(
            cache,
            Arc::new(move |_stream| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        (reconciler, resyncs)
    }

    #[test]
    fn matching_update_is_up_to_date() {
        let local = entry("20240101");
        let cache = LocalCache::from_records(vec![local.clone()]);

        let verdict = assess(&ChangeEvent::Update(local), &cache);
        assert_eq!(verdict, Verdict::UpToDate);
    }

    #[test]
    fn revision_mismatch_requires_resync() {
        let local = entry("20240101");
        let cache = LocalCache::from_records(vec![local.clone()]);

        let mut remote = local;
        remote.revision += 1;
        let verdict = assess(&ChangeEvent::Update(remote), &cache);
        assert_eq!(verdict, Verdict::ResyncRequired);
    }

    #[test]
    fn created_at_mismatch_requires_resync() {
        let local = entry("20240101");
        let cache = LocalCache::from_records(vec![local.clone()]);

        let mut remote = local;
        remote.created_at += 1;
        let verdict = assess(&ChangeEvent::Insert(remote), &cache);
        assert_eq!(verdict, Verdict::ResyncRequired);
    }

    #[test]
    fn unknown_record_counts_as_stale() {
        let cache = LocalCache::from_records(vec![entry("20240101")]);
        let verdict = assess(&ChangeEvent::Insert(entry("20240202")), &cache);
        assert_eq!(verdict, Verdict::ResyncRequired);
    }

    #[test]
    fn delete_of_cached_record_requires_resync() {
        let local = entry("20240101");
        let cache = LocalCache::from_records(vec![local.clone()]);
        assert_eq!(
            assess(&ChangeEvent::Delete(local), &cache),
            Verdict::ResyncRequired
        );
    }

    #[test]
    fn delete_of_absent_record_is_up_to_date() {
        let cache = LocalCache::from_records(vec![entry("20240101")]);
        assert_eq!(
            assess(&ChangeEvent::Delete(entry("20240202")), &cache),
            Verdict::UpToDate
        );
    }

    #[test]
    fn observe_fires_callback_exactly_once_per_stale_event() {
        let (reconciler, resyncs) = counting_reconciler(LocalCache::new());

        reconciler.observe(&ChangeEvent::Insert(entry("20240101")));
        assert_eq!(resyncs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn observe_skips_callback_when_current() {
        let local = entry("20240101");
        let (reconciler, resyncs) =
            counting_reconciler(LocalCache::from_records(vec![local.clone()]));

        reconciler.observe(&ChangeEvent::Update(local));
        assert_eq!(resyncs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn replaying_an_event_yields_the_same_verdict() {
        let local = entry("20240101");
        let cache = LocalCache::from_records(vec![local.clone()]);
        let (reconciler, resyncs) = counting_reconciler(cache);

        let mut remote = local;
        remote.revision = 4;
        let event = ChangeEvent::Update(remote);

        assert_eq!(reconciler.observe(&event), Verdict::ResyncRequired);
        assert_eq!(reconciler.observe(&event), Verdict::ResyncRequired);
        assert_eq!(resyncs.load(Ordering::SeqCst), 2);
    }
}
