//! Client, cache, and headless view models for browsing YouTube videos.
//!
//! [`YouTubeClient`] talks to the YouTube Data API, [`transform`] turns its envelopes into
//! [`Video`] records, [`VideoFeed`] caches pages of them with single-flight fetching, and
//! [`view`] holds the grid and card logic a front-end needs on top.

pub mod config;
pub mod feed;
pub mod transform;
pub mod view;
pub mod youtube_api;

#[cfg(test)]
mod test_support;

pub use config::{ApiKey, Config};
pub use feed::{EndpointKind, FetchNext, InfiniteFeed, Page, QueryKey, VideoFeed};
pub use transform::{Thumbnails, Video};
pub use youtube_api::{ApiError, UpstreamError, YouTubeClient};
