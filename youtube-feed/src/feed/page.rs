use crate::transform::{self, Video};
use crate::youtube_api::{ApiError, YouTubeClient};
use std::fmt;

/// Which endpoint a result set comes from, and what it is filtered by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    /// `search.list` for a free-text query.
    Search { query: String },
    /// `videos.list?chart=mostPopular` for a region.
    Trending { region_code: String },
}

/// Identifies one logical, paginated result set.
///
/// Two keys that differ in any field are cached independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub kind: EndpointKind,
    pub page_size: u32,
}

impl QueryKey {
    pub fn search(query: impl Into<String>, page_size: u32) -> Self {
        Self {
            kind: EndpointKind::Search {
                query: query.into(),
            },
            page_size,
        }
    }

    pub fn trending(region_code: impl Into<String>, page_size: u32) -> Self {
        Self {
            kind: EndpointKind::Trending {
                region_code: region_code.into(),
            },
            page_size,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EndpointKind::Search { query } => write!(f, "search:{query:?}:{}", self.page_size),
            EndpointKind::Trending { region_code } => {
                write!(f, "trending:{region_code}:{}", self.page_size)
            }
        }
    }
}

/// One page of normalized results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub videos: Vec<Video>,
    /// `None` means this is the last page. `Some` means another page *may* exist; it can
    /// still turn out to be empty.
    pub next_page_token: Option<String>,
    /// The API's (approximate) size of the whole result set.
    pub total_results: u32,
}

impl Page {
    pub fn has_next_page(&self) -> bool {
        self.next_page_token.is_some()
    }
}

/// Fetches and normalizes the page of `key` that starts at `cursor`.
pub(crate) async fn fetch_page(
    client: &YouTubeClient,
    key: &QueryKey,
    cursor: Option<&str>,
) -> Result<Page, ApiError> {
    match &key.kind {
        EndpointKind::Search { query } => {
            let response = client.search(query, key.page_size, cursor).await?;
            Ok(Page {
                videos: transform::from_search_envelope(&response),
                total_results: response.page_info.total_results,
                next_page_token: response.next_page_token,
            })
        }
        EndpointKind::Trending { region_code } => {
            let response = client
                .get_trending_page(key.page_size, region_code, cursor)
                .await?;
            Ok(Page {
                videos: transform::from_detail_envelope(&response)?,
                total_results: response.page_info.total_results,
                next_page_token: response.next_page_token,
            })
        }
    }
}
