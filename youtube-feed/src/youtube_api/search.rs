//! YouTube Search API types.

use crate::youtube_api::types::{PageInfo, Snippet};
use serde::{Deserialize, Serialize};

/// Response structure for the `search.list` API call.
///
/// Search results never carry statistics; use [`super::YouTubeClient::get_details`]
/// to fetch those for the returned ids.
///
/// See: <https://developers.google.com/youtube/v3/docs/search/list>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchListResponse {
    /// The value will be `youtube#searchListResponse`.
    #[serde(default)]
    pub kind: Option<String>,
    pub items: Vec<SearchResult>,
    /// Token for the next page. Absent on the last page.
    #[serde(rename = "nextPageToken", default)]
    pub next_page_token: Option<String>,
    #[serde(rename = "prevPageToken", default)]
    pub prev_page_token: Option<String>,
    #[serde(rename = "pageInfo", default)]
    pub page_info: PageInfo,
}

/// A single hit in a search response.
///
/// See: <https://developers.google.com/youtube/v3/docs/search#resource>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: SearchResultId,
    pub snippet: Snippet,
}

/// Identifies the resource that matched the search.
///
/// Requests are always made with `type=video`, so `videoId` is required. A hit
/// without one fails envelope decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultId {
    #[serde(rename = "videoId")]
    pub video_id: String,
}
