//! YouTube Data API v3 client library.
//!
//! Covers the three read-only, key-authenticated endpoints a video feed needs:
//!
//! - `search.list` for free-text search ([`YouTubeClient::search`])
//! - `videos.list` by id, batched ([`YouTubeClient::get_details`])
//! - `videos.list` for the `mostPopular` chart ([`YouTubeClient::get_trending`])
//!
//! # Search results vs video resources
//!
//! The two endpoints return differently shaped envelopes:
//!
//! ## [`search::SearchResult`] - cheap, snippet only
//! - **Identifier**: nested under `id.videoId`
//! - **Statistics**: never included
//! - **Use for**: infinite-scroll search grids
//!
//! ## [`videos::VideoResource`] - snippet and statistics
//! - **Identifier**: a bare `id` string
//! - **Statistics**: view and like counts, requested on every call
//! - **Use for**: trending charts, detail lookups
//!
//! Both are normalized into [`crate::Video`] by [`crate::transform`].
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use youtube_feed::{Config, YouTubeClient, transform};
//!
//! # async fn example() -> eyre::Result<()> {
//! let config = Config::from_env()?;
//! let client = YouTubeClient::from_config(&config)?;
//!
//! let response = client.search("rust programming", 12, None).await?;
//! for video in transform::from_search_envelope(&response) {
//!     println!("{} ({})", video.title, video.channel_title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod search;
pub mod types;
pub mod videos;

pub use client::YouTubeClient;
pub use error::{ApiError, UpstreamError};
pub use types::{PageInfo, Snippet, Thumbnail, ThumbnailSet, paginate};

pub use search::{SearchListResponse, SearchResult, SearchResultId};

pub use videos::{VideoListResponse, VideoResource, VideoStatistics};
