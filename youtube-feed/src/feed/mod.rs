//! Query-keyed page cache with single-flight fetching.
//!
//! [`VideoFeed`] owns a [`YouTubeClient`] and offers two ways to consume a result set:
//!
//! - [`VideoFeed::page`]: one page at a time, cached per `(key, cursor)` until it goes
//!   stale or is invalidated;
//! - [`VideoFeed::infinite`]: an [`InfiniteFeed`] that accumulates pages in fetch order for
//!   infinite scrolling.
//!
//! Both collapse concurrent requests for the same thing into one upstream call, and
//! invalidating a key never starts a second request next to one that is still running.
//! Nothing is persisted; the cache lives exactly as long as the last `VideoFeed` clone.
//! Stale single-shot pages are evicted whenever a new page is stored. Infinite feeds are
//! kept for the lifetime of the cache, one per key.

mod infinite;
mod page;

pub use infinite::{FetchNext, InfiniteFeed};
pub use page::{EndpointKind, Page, QueryKey};

use crate::youtube_api::{ApiError, YouTubeClient};
use page::fetch_page;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::instrument;

type EntryKey = (QueryKey, Option<String>);

/// Cached page with its fetch time.
#[derive(Debug)]
struct CachedPage {
    page: Arc<Page>,
    fetched_at: Instant,
    /// Invalidation generation of the key when the fetch started.
    generation: u64,
}

/// One cache entry. The async mutex doubles as the single-flight gate: whoever holds it is
/// the one fetching, everyone else waits and then reads what was stored.
#[derive(Debug, Default)]
struct Slot {
    page: tokio::sync::Mutex<Option<CachedPage>>,
}

#[derive(Debug, Default)]
struct Slots {
    entries: HashMap<EntryKey, Arc<Slot>>,
    /// Bumped by [`VideoFeed::invalidate`]. A cached page from an older generation is
    /// never served to a caller that arrived after the invalidation.
    generations: HashMap<QueryKey, u64>,
}

impl Slots {
    fn generation(&self, key: &QueryKey) -> u64 {
        self.generations.get(key).copied().unwrap_or_default()
    }
}

#[derive(Debug)]
struct Inner {
    client: YouTubeClient,
    stale_after: Duration,
    slots: Mutex<Slots>,
    infinite: Mutex<HashMap<QueryKey, InfiniteFeed>>,
}

/// Shared cache of video pages. Cloning is cheap and clones share state.
#[derive(Debug, Clone)]
pub struct VideoFeed {
    inner: Arc<Inner>,
}

/// Locks a std mutex, ignoring poisoning. None of the guarded state can be left
/// half-updated by a panic.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl VideoFeed {
    /// Creates an empty cache. Pages older than `stale_after` are refetched on access.
    pub fn new(client: YouTubeClient, stale_after: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                stale_after,
                slots: Mutex::new(Slots::default()),
                infinite: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn client(&self) -> &YouTubeClient {
        &self.inner.client
    }

    /// Returns the page of `key` starting at `cursor` (`None` for the first page).
    ///
    /// A fresh cached page is returned without a request. Otherwise the page is fetched and
    /// stored. Concurrent calls for the same `(key, cursor)` share one request: the first
    /// caller fetches, the rest wait for it and return its result. A failed fetch stores
    /// nothing and leaves any older cached page in place.
    #[instrument(skip(self, key), fields(key = %key))]
    pub async fn page(&self, key: &QueryKey, cursor: Option<&str>) -> Result<Arc<Page>, ApiError> {
        let requested_at = Instant::now();
        let (slot, generation) = {
            let mut slots = lock(&self.inner.slots);
            let generation = slots.generation(key);
            let slot = Arc::clone(
                slots
                    .entries
                    .entry((key.clone(), cursor.map(String::from)))
                    .or_default(),
            );
            (slot, generation)
        };

        let mut cached = slot.page.lock().await;
        match &*cached {
            Some(hit) if hit.generation < generation => {
                tracing::debug!("cached page was invalidated");
            }
            // a page stored while we were queued on the slot is fresh by definition
            Some(hit) if hit.fetched_at >= requested_at || self.is_fresh(hit) => {
                tracing::trace!("cache hit");
                return Ok(Arc::clone(&hit.page));
            }
            Some(hit) => {
                tracing::debug!(age = ?hit.fetched_at.elapsed(), "cached page is stale");
            }
            None => tracing::debug!("cache miss"),
        }

        let generation = lock(&self.inner.slots).generation(key);
        let page = Arc::new(fetch_page(&self.inner.client, key, cursor).await?);
        *cached = Some(CachedPage {
            page: Arc::clone(&page),
            fetched_at: Instant::now(),
            generation,
        });
        drop(cached);
        tracing::debug!(videos = page.videos.len(), "stored page");

        self.evict_stale();
        Ok(page)
    }

    fn is_fresh(&self, cached: &CachedPage) -> bool {
        cached.fetched_at.elapsed() < self.inner.stale_after
    }

    /// Removes slots that nobody is using and that hold no fresh, current page.
    ///
    /// A slot whose `Arc` is held outside the map belongs to a running or queued call and is
    /// always kept, so a key never ends up with two slots for the same cursor.
    fn evict_stale(&self) {
        let mut slots = lock(&self.inner.slots);
        let Slots {
            entries,
            generations,
        } = &mut *slots;
        let before = entries.len();
        entries.retain(|(key, _), slot| {
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            let current = generations.get(key).copied().unwrap_or_default();
            match slot.page.try_lock() {
                Ok(cached) => cached
                    .as_ref()
                    .is_some_and(|hit| hit.generation >= current && self.is_fresh(hit)),
                Err(_) => true,
            }
        });
        generations.retain(|key, _| entries.keys().any(|(k, _)| k == key));
        let evicted = before - entries.len();
        if evicted > 0 {
            tracing::trace!(evicted, "evicted stale cache entries");
        }
    }

    /// Drops every cached page of `key` and resets its infinite feed, if any.
    ///
    /// A fetch already in flight for `key` still completes for the callers that were waiting
    /// on it before the invalidation. Later callers queue behind it and then fetch again, so
    /// at most one request per `(key, cursor)` is ever running.
    pub fn invalidate(&self, key: &QueryKey) {
        let removed = {
            let mut slots = lock(&self.inner.slots);
            *slots.generations.entry(key.clone()).or_default() += 1;
            let before = slots.entries.len();
            slots
                .entries
                .retain(|(k, _), slot| k != key || Arc::strong_count(slot) > 1);
            before - slots.entries.len()
        };
        if let Some(feed) = lock(&self.inner.infinite).get(key) {
            feed.reset();
        }
        tracing::debug!(key = %key, removed, "invalidated cache entries");
    }

    /// Invalidates `key` and fetches its first page again.
    pub async fn refetch(&self, key: &QueryKey) -> Result<Arc<Page>, ApiError> {
        self.invalidate(key);
        self.page(key, None).await
    }

    /// Returns the infinite feed for `key`.
    ///
    /// All handles for the same key share their pages and in-flight state.
    pub fn infinite(&self, key: QueryKey) -> InfiniteFeed {
        let mut feeds = lock(&self.inner.infinite);
        feeds
            .entry(key.clone())
            .or_insert_with(|| InfiniteFeed::new(self.inner.client.clone(), key))
            .clone()
    }

    #[cfg(test)]
    fn cached_entries(&self) -> usize {
        lock(&self.inner.slots).entries.len()
    }
}
