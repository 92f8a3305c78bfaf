//! JSON fixtures shaped like real YouTube Data API responses.

use serde_json::{Value, json};

pub(crate) const TEST_KEY: &str = "test-key";

pub(crate) fn snippet(id: &str) -> Value {
    json!({
        "publishedAt": "2024-03-05T17:00:00Z",
        "channelId": "UC_x5XG1OV2P6uZZ5FSM9Ttw",
        "title": format!("Video {id}"),
        "description": format!("All about {id}"),
        "thumbnails": {
            "default": { "url": format!("https://i.ytimg.com/vi/{id}/default.jpg"), "width": 120, "height": 90 },
            "medium": { "url": format!("https://i.ytimg.com/vi/{id}/mqdefault.jpg"), "width": 320, "height": 180 },
            "high": { "url": format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg"), "width": 480, "height": 360 }
        },
        "channelTitle": "rustconf",
        "liveBroadcastContent": "none"
    })
}

pub(crate) fn search_body(ids: &[&str], next_page_token: Option<&str>) -> Value {
    let items: Vec<Value> = ids
        .iter()
        .map(|id| {
            json!({
                "kind": "youtube#searchResult",
                "etag": format!("etag-{id}"),
                "id": { "kind": "youtube#video", "videoId": id },
                "snippet": snippet(id),
            })
        })
        .collect();
    let mut body = json!({
        "kind": "youtube#searchListResponse",
        "etag": "search-etag",
        "regionCode": "US",
        "pageInfo": { "totalResults": 1000000, "resultsPerPage": ids.len() },
        "items": items,
    });
    if let Some(token) = next_page_token {
        body["nextPageToken"] = json!(token);
    }
    body
}

pub(crate) fn video_item(id: &str, views: u64, likes: u64) -> Value {
    json!({
        "kind": "youtube#video",
        "etag": format!("etag-{id}"),
        "id": id,
        "snippet": snippet(id),
        "statistics": {
            "viewCount": views.to_string(),
            "likeCount": likes.to_string(),
            "favoriteCount": "0",
            "commentCount": "12"
        }
    })
}

pub(crate) fn videos_body(items: Vec<Value>, next_page_token: Option<&str>) -> Value {
    let mut body = json!({
        "kind": "youtube#videoListResponse",
        "etag": "videos-etag",
        "pageInfo": { "totalResults": items.len(), "resultsPerPage": items.len() },
        "items": items,
    });
    if let Some(token) = next_page_token {
        body["nextPageToken"] = json!(token);
    }
    body
}
