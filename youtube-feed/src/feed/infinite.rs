use super::lock;
use super::page::{Page, QueryKey, fetch_page};
use crate::transform::Video;
use crate::youtube_api::{ApiError, YouTubeClient};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tracing::instrument;

/// What a call to [`InfiniteFeed::fetch_next`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchNext {
    /// A page with this many videos was appended.
    Appended(usize),
    /// Another fetch for this feed was already running; nothing was requested.
    InFlight,
    /// The last page had no continuation token; nothing was requested.
    Exhausted,
    /// The feed was reset while this fetch was running, so its result was thrown away.
    Discarded,
}

#[derive(Debug, Default)]
struct State {
    pages: Vec<Arc<Page>>,
    /// Owned by the one running fetch. Only that fetch (or its drop guard) clears it, even
    /// across a reset.
    in_flight: bool,
    /// Bumped on every reset. A fetch only applies its result if the generation it started
    /// in is still current.
    generation: u64,
    last_error: Option<ApiError>,
}

/// Cursor-based accumulation of pages for one [`QueryKey`], for infinite scrolling.
///
/// Obtained from [`super::VideoFeed::infinite`]. Clones share state, and so does every
/// handle for the same key, so at most one page fetch per key is in flight at any time.
#[derive(Debug, Clone)]
pub struct InfiniteFeed {
    key: QueryKey,
    client: YouTubeClient,
    state: Arc<Mutex<State>>,
    /// Woken whenever the in-flight flag is cleared.
    idle: Arc<Notify>,
}

/// Clears the in-flight flag if a fetch future is dropped before it completes.
struct InFlightGuard<'a> {
    state: &'a Mutex<State>,
    idle: &'a Notify,
    armed: bool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        lock(self.state).in_flight = false;
        self.idle.notify_waiters();
    }
}

impl InfiniteFeed {
    pub(super) fn new(client: YouTubeClient, key: QueryKey) -> Self {
        Self {
            key,
            client,
            state: Arc::new(Mutex::new(State::default())),
            idle: Arc::new(Notify::new()),
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// All videos fetched so far, page after page, in fetch order.
    pub fn videos(&self) -> Vec<Video> {
        lock(&self.state)
            .pages
            .iter()
            .flat_map(|page| page.videos.iter().cloned())
            .collect()
    }

    pub fn pages(&self) -> Vec<Arc<Page>> {
        lock(&self.state).pages.clone()
    }

    /// Whether the most recently fetched page carries a continuation token.
    ///
    /// This is `false` before the first page has been fetched; [`Self::fetch_next`] will still
    /// fetch the first page in that state.
    pub fn has_next_page(&self) -> bool {
        lock(&self.state)
            .pages
            .last()
            .is_some_and(|page| page.has_next_page())
    }

    /// Whether any page fetch is currently running.
    pub fn is_fetching(&self) -> bool {
        lock(&self.state).in_flight
    }

    /// Whether the first page is being fetched.
    pub fn is_loading(&self) -> bool {
        let state = lock(&self.state);
        state.in_flight && state.pages.is_empty()
    }

    /// Whether a page after the first is being fetched.
    pub fn is_fetching_next_page(&self) -> bool {
        let state = lock(&self.state);
        state.in_flight && !state.pages.is_empty()
    }

    /// The error of the most recent fetch, cleared by the next successful one.
    pub fn last_error(&self) -> Option<ApiError> {
        lock(&self.state).last_error.clone()
    }

    /// Fetches the next page and appends it.
    ///
    /// The first call fetches the first page. Later calls continue from the last page's
    /// continuation token. This is a no-op if a fetch is already in flight for this key or if
    /// the last page had no token.
    ///
    /// On failure the accumulated pages are left untouched, the error is recorded in
    /// [`Self::last_error`] and returned, and the next call retries from the same cursor.
    /// Dropping the returned future before it completes applies nothing.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn fetch_next(&self) -> Result<FetchNext, ApiError> {
        let (cursor, generation) = {
            let mut state = lock(&self.state);
            if state.in_flight {
                tracing::trace!("fetch already in flight");
                return Ok(FetchNext::InFlight);
            }
            let cursor = match state.pages.last() {
                None => None,
                Some(page) => match &page.next_page_token {
                    Some(token) => Some(token.clone()),
                    None => {
                        tracing::trace!("no more pages");
                        return Ok(FetchNext::Exhausted);
                    }
                },
            };
            state.in_flight = true;
            (cursor, state.generation)
        };

        let mut guard = InFlightGuard {
            state: &self.state,
            idle: &self.idle,
            armed: true,
        };
        let result = fetch_page(&self.client, &self.key, cursor.as_deref())
            .await
            .map(Arc::new);
        // nothing awaits past this point, so the result is applied in full or not at all
        guard.armed = false;

        let outcome = self.apply(generation, result);
        self.idle.notify_waiters();
        outcome
    }

    /// Stores the result of a fetch started in `generation` and releases the in-flight flag.
    fn apply(
        &self,
        generation: u64,
        result: Result<Arc<Page>, ApiError>,
    ) -> Result<FetchNext, ApiError> {
        let mut state = lock(&self.state);
        state.in_flight = false;
        if state.generation != generation {
            tracing::debug!("feed was reset during fetch, discarding page");
            return Ok(FetchNext::Discarded);
        }

        match result {
            Ok(page) => {
                let appended = page.videos.len();
                let has_next_page = page.has_next_page();
                state.last_error = None;
                state.pages.push(page);
                tracing::debug!(
                    appended,
                    pages = state.pages.len(),
                    has_next_page,
                    "appended page"
                );
                Ok(FetchNext::Appended(appended))
            }
            Err(e) => {
                state.last_error = Some(e.clone());
                tracing::warn!(error = %e, "failed to fetch page");
                Err(e)
            }
        }
    }

    /// Drops all accumulated pages and any recorded error.
    ///
    /// A fetch that is in flight when this is called completes as [`FetchNext::Discarded`]
    /// and does not touch the feed. Until it does, the feed still counts as fetching, so no
    /// second request for this key is started in the meantime.
    pub fn reset(&self) {
        let mut state = lock(&self.state);
        state.generation += 1;
        state.pages.clear();
        state.last_error = None;
    }

    /// Resets the feed and fetches its first page again (pull-to-refresh).
    ///
    /// If a fetch is still running, this waits for it to finish (and be discarded) before
    /// issuing the new request. Returns [`FetchNext::InFlight`] if another caller started
    /// the first page in the meantime.
    pub async fn refetch(&self) -> Result<FetchNext, ApiError> {
        self.reset();
        self.wait_idle().await;
        self.fetch_next().await
    }

    async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            let mut notified = std::pin::pin!(notified);
            // register before checking so a wakeup in between is not lost
            notified.as_mut().enable();
            if !lock(&self.state).in_flight {
                return;
            }
            tracing::trace!("waiting for in-flight fetch to finish");
            notified.await;
        }
    }

    #[cfg(test)]
    pub(super) fn shares_state_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}
