use crate::feed::{FetchNext, InfiniteFeed};
use crate::transform::Video;
use crate::youtube_api::ApiError;

/// Gap between cards and around the grid, in pixels.
pub const CARD_SPACING: f32 = 16.0;

/// Responsive column count for a viewport `width` in pixels.
pub fn column_count(width: f32) -> usize {
    match width {
        w if w < 768.0 => 1,
        w if w < 1024.0 => 2,
        w if w < 1280.0 => 3,
        w if w < 1536.0 => 4,
        _ => 5,
    }
}

/// Width of one card when `columns` cards share `screen_width`.
pub fn item_width(screen_width: f32, columns: usize) -> f32 {
    let columns = columns.max(1) as f32;
    ((screen_width - (columns + 1.0) * CARD_SPACING) / columns).max(0.0)
}

/// What the grid as a whole should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridStatus {
    /// The first page is on its way.
    Loading,
    /// Nothing to show and nothing went wrong.
    Empty,
    /// Nothing to show because the last fetch failed. `retryable` says whether offering
    /// pull-to-refresh makes sense.
    Failed { message: String, retryable: bool },
    /// At least one video is available.
    Ready,
}

impl GridStatus {
    /// The text shown in place of the grid, if any.
    pub fn placeholder(&self) -> Option<&str> {
        match self {
            GridStatus::Loading => Some("Loading videos..."),
            GridStatus::Empty => Some("No videos found."),
            GridStatus::Failed { message, .. } => Some(message),
            GridStatus::Ready => None,
        }
    }
}

/// A video together with the stable key a list view should use for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridItem {
    pub key: String,
    pub video: Video,
}

/// Infinite-scrolling grid over an [`InfiniteFeed`].
#[derive(Debug, Clone)]
pub struct GridModel {
    feed: InfiniteFeed,
    columns: usize,
}

impl GridModel {
    pub fn new(feed: InfiniteFeed, width: f32) -> Self {
        Self {
            feed,
            columns: column_count(width),
        }
    }

    pub fn feed(&self) -> &InfiniteFeed {
        &self.feed
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Recomputes the column count. Returns `true` if it changed, in which case the list
    /// has to be laid out again.
    pub fn on_resize(&mut self, width: f32) -> bool {
        let columns = column_count(width);
        let changed = columns != self.columns;
        self.columns = columns;
        changed
    }

    /// Loads the first page if nothing has been loaded yet.
    pub async fn on_mount(&self) -> Result<FetchNext, ApiError> {
        if self.feed.pages().is_empty() {
            self.feed.fetch_next().await
        } else {
            Ok(FetchNext::Appended(0))
        }
    }

    /// Called when the user scrolls near the end of the list.
    ///
    /// Only fetches when another page exists and no fetch is running. Returns `None` when
    /// it did nothing.
    pub async fn on_end_reached(&self) -> Option<Result<FetchNext, ApiError>> {
        if self.feed.has_next_page() && !self.feed.is_fetching() {
            Some(self.feed.fetch_next().await)
        } else {
            None
        }
    }

    /// Pull-to-refresh.
    pub async fn on_refresh(&self) -> Result<FetchNext, ApiError> {
        self.feed.refetch().await
    }

    pub fn status(&self) -> GridStatus {
        if self.feed.is_loading() {
            return GridStatus::Loading;
        }
        if !self.feed.pages().iter().all(|page| page.videos.is_empty()) {
            return GridStatus::Ready;
        }
        match self.feed.last_error() {
            Some(e) => GridStatus::Failed {
                message: "Failed to load videos. Pull down to retry.".to_string(),
                retryable: e.is_retryable(),
            },
            None => GridStatus::Empty,
        }
    }

    /// Whether to show the "loading more" spinner below the last row.
    pub fn shows_footer_spinner(&self) -> bool {
        self.feed.is_fetching_next_page()
    }

    /// Key for the video at `index`. Indices make keys unique even if the API returns the
    /// same video on two pages.
    pub fn item_key(video: &Video, index: usize) -> String {
        format!("{}-{}", video.id, index)
    }

    pub fn items(&self) -> Vec<GridItem> {
        self.feed
            .videos()
            .into_iter()
            .enumerate()
            .map(|(index, video)| GridItem {
                key: Self::item_key(&video, index),
                video,
            })
            .collect()
    }

    /// Items laid out in rows of [`Self::columns`] cards.
    pub fn rows(&self) -> Vec<Vec<GridItem>> {
        self.items()
            .chunks(self.columns.max(1))
            .map(<[GridItem]>::to_vec)
            .collect()
    }
}
