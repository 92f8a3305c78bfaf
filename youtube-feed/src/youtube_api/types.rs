//! Types shared between the `search` and `videos` envelopes.

use crate::youtube_api::error::ApiError;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tokio_stream::Stream;

/// Turns a page fetcher into a stream of items that follows continuation tokens.
///
/// `fetcher` is called with `None` for the first page and with the previous page's
/// `nextPageToken` afterwards. Pages are only requested when the stream is polled past
/// the end of the current one. Only forward pagination is supported. The stream ends
/// when a page comes back without a token, or right after yielding the first error.
pub fn paginate<T, F, Fut>(fetcher: F) -> impl Stream<Item = Result<T, ApiError>>
where
    F: Fn(Option<String>) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, Option<String>), ApiError>>,
{
    async_stream::stream! {
        let mut page_token = None;
        loop {
            let (items, next_page_token) = match fetcher(page_token.take()).await {
                Ok(page) => page,
                Err(e) => {
                    yield Err(e);
                    break;
                }
            };
            for item in items {
                yield Ok(item);
            }
            match next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
    }
}

/// Paging details for lists of resources.
///
/// Includes the total number of items available and the number of resources
/// returned in a single page response.
///
/// See: <https://developers.google.com/youtube/v3/docs/pageInfo>
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageInfo {
    /// The total number of results in the result set.
    ///
    /// This is an approximation and may exceed the number of results actually reachable.
    #[serde(rename = "totalResults")]
    pub total_results: u32,
    /// The number of results included in the API response.
    #[serde(rename = "resultsPerPage")]
    pub results_per_page: u32,
}

/// The snippet object shared by search results and video resources.
///
/// This is a subset of the full snippet data available from the YouTube API,
/// containing only the fields needed to render a video card.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#snippet>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnails: ThumbnailSet,
    #[serde(rename = "channelTitle")]
    pub channel_title: String,
    /// The value is specified in ISO 8601 format.
    #[serde(rename = "publishedAt")]
    pub published_at: Timestamp,
}

/// Thumbnail images keyed by resolution tier.
///
/// Only the three tiers every video has are modelled; `standard` and `maxres`
/// are ignored when present.
///
/// See: <https://developers.google.com/youtube/v3/docs/thumbnails>
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailSet {
    /// 120x90 for videos.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Thumbnail>,
    /// 320x180 for videos.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<Thumbnail>,
    /// 480x360 for videos.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}
