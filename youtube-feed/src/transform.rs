//! Normalization of API envelopes into [`Video`] records.
//!
//! Pure functions, no I/O. Output order always equals input order.

use crate::youtube_api::{
    ApiError, SearchListResponse, ThumbnailSet, VideoListResponse, VideoResource,
};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A video, regardless of which endpoint it came from.
///
/// `view_count` and `like_count` are only ever set for records built from a `videos.list`
/// response. A search-derived record and a detail-derived record with the same `id` are
/// independent values; nothing merges one into the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub published_at: Timestamp,
    pub thumbnails: Thumbnails,
    /// Verbatim decimal string from the API.
    pub view_count: Option<String>,
    /// Verbatim decimal string from the API.
    pub like_count: Option<String>,
}

impl Video {
    pub fn view_count_u64(&self) -> Option<u64> {
        self.view_count.as_deref().and_then(|s| s.parse().ok())
    }

    pub fn like_count_u64(&self) -> Option<u64> {
        self.like_count.as_deref().and_then(|s| s.parse().ok())
    }
}

/// Thumbnail URLs by resolution tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnails {
    pub default: Option<String>,
    pub medium: Option<String>,
    pub high: Option<String>,
}

impl Thumbnails {
    /// The image shown on a grid card: medium, falling back to default.
    pub fn card_url(&self) -> Option<&str> {
        self.medium.as_deref().or(self.default.as_deref())
    }

    /// The image shown in the hover preview: high, falling back to medium.
    pub fn preview_url(&self) -> Option<&str> {
        self.high.as_deref().or(self.medium.as_deref())
    }
}

impl From<&ThumbnailSet> for Thumbnails {
    fn from(set: &ThumbnailSet) -> Self {
        Self {
            default: set.default.as_ref().map(|t| t.url.clone()),
            medium: set.medium.as_ref().map(|t| t.url.clone()),
            high: set.high.as_ref().map(|t| t.url.clone()),
        }
    }
}

/// Maps a `search.list` envelope to videos. Statistics are never set.
pub fn from_search_envelope(envelope: &SearchListResponse) -> Vec<Video> {
    envelope
        .items
        .iter()
        .map(|item| Video {
            id: item.id.video_id.clone(),
            title: item.snippet.title.clone(),
            description: item.snippet.description.clone(),
            channel_title: item.snippet.channel_title.clone(),
            published_at: item.snippet.published_at,
            thumbnails: Thumbnails::from(&item.snippet.thumbnails),
            view_count: None,
            like_count: None,
        })
        .collect()
}

/// Maps a `videos.list` envelope to videos, statistics included.
///
/// Every item must carry a `statistics` object with a `viewCount`, or the whole envelope
/// is rejected with [`ApiError::MalformedResponse`]. `likeCount` may legitimately be
/// missing (the owner can hide it) and is passed through as `None`.
pub fn from_detail_envelope(envelope: &VideoListResponse) -> Result<Vec<Video>, ApiError> {
    envelope.items.iter().map(from_video_resource).collect()
}

fn from_video_resource(item: &VideoResource) -> Result<Video, ApiError> {
    let Some(statistics) = &item.statistics else {
        return Err(ApiError::MalformedResponse(format!(
            "video {} has no statistics",
            item.id
        )));
    };
    let Some(view_count) = &statistics.view_count else {
        return Err(ApiError::MalformedResponse(format!(
            "video {} statistics lack viewCount",
            item.id
        )));
    };

    Ok(Video {
        id: item.id.clone(),
        title: item.snippet.title.clone(),
        description: item.snippet.description.clone(),
        channel_title: item.snippet.channel_title.clone(),
        published_at: item.snippet.published_at,
        thumbnails: Thumbnails::from(&item.snippet.thumbnails),
        view_count: Some(view_count.clone()),
        like_count: statistics.like_count.clone(),
    })
}
