//! YouTube Videos API types.

use crate::youtube_api::types::{PageInfo, Snippet};
use serde::{Deserialize, Serialize};

/// Response structure for the `videos.list` API call.
///
/// Used both for batched lookups by id and for the `mostPopular` chart.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos/list>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoListResponse {
    /// The value will be `youtube#videoListResponse`.
    #[serde(default)]
    pub kind: Option<String>,
    pub items: Vec<VideoResource>,
    /// Only present when listing a chart.
    #[serde(rename = "nextPageToken", default)]
    pub next_page_token: Option<String>,
    #[serde(rename = "prevPageToken", default)]
    pub prev_page_token: Option<String>,
    #[serde(rename = "pageInfo", default)]
    pub page_info: PageInfo,
}

impl VideoListResponse {
    pub(crate) fn empty() -> Self {
        Self {
            kind: Some("youtube#videoListResponse".to_string()),
            items: Vec::new(),
            next_page_token: None,
            prev_page_token: None,
            page_info: PageInfo::default(),
        }
    }
}

/// A `video` resource represents a YouTube video.
///
/// `statistics` is requested on every call, but is still optional here so that a
/// missing object surfaces as a named error in the transformer rather than an opaque
/// decode failure.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#resource>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoResource {
    pub id: String,
    pub snippet: Snippet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<VideoStatistics>,
}

/// Statistics about the video.
///
/// Counts are decimal strings, as returned by the API.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#statistics>
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoStatistics {
    /// The number of times the video has been viewed.
    #[serde(rename = "viewCount", default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<String>,
    /// Absent when the owner hides likes.
    #[serde(rename = "likeCount", default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<String>,
    /// Only visible to the video owner.
    #[serde(rename = "dislikeCount", default, skip_serializing_if = "Option::is_none")]
    pub dislike_count: Option<String>,
    #[serde(rename = "commentCount", default, skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<String>,
}
