//! Core YouTube API client functionality.

use crate::config::{ApiKey, Config};
use crate::transform::{self, Video};
use crate::youtube_api::{
    error::{ApiError, UpstreamError},
    search::SearchListResponse,
    types::paginate,
    videos::VideoListResponse,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_stream::Stream;
use tracing::instrument;

/// Client for the public, key-authenticated parts of the YouTube Data API v3.
///
/// Every operation returns the decoded response envelope as-is; turning envelopes into
/// [`Video`] records is the job of [`crate::transform`]. The only exceptions are the
/// `*_stream` helpers, which normalize while they paginate.
///
/// The API key is checked when a request is made, not at construction, so a client built
/// without a key is usable until the first call, which then fails with
/// [`ApiError::Configuration`] without touching the network.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    api_key: Option<ApiKey>,
    base_url: String,
    timeout: Duration,
    /// HTTP client for API requests
    client: reqwest::Client,
}

impl YouTubeClient {
    /// Creates a client from `config`, sharing the given HTTP client.
    pub fn new(config: &Config, client: reqwest::Client) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
            client,
        }
    }

    /// Creates a client from `config` with a dedicated HTTP client.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(ApiError::network)?;
        Ok(Self::new(config, client))
    }

    /// Issues a `GET {base}/{path}` with the API key appended to `query_params`.
    ///
    /// Consolidates the logic shared by all endpoints:
    /// - lazy credential check (no request is made without a key)
    /// - the per-request timeout
    /// - status code validation
    ///
    /// Transport errors are stripped of their URL since it contains the key.
    #[instrument(skip(self, query_params), level = tracing::Level::TRACE)]
    async fn make_keyed_request(
        &self,
        path: &str,
        query_params: &[(&str, &str)],
    ) -> Result<reqwest::Response, ApiError> {
        let Some(api_key) = &self.api_key else {
            tracing::warn!(path, "refusing to call YouTube API without an API key");
            return Err(ApiError::Configuration);
        };

        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query_params)
            .query(&[("key", api_key.secret())])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            tracing::debug!(path, %status, body = %body, "YouTube API request failed");
            return Err(ApiError::status(status, body));
        }

        Ok(response)
    }

    fn transport_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Upstream(UpstreamError::Timeout {
                after: self.timeout,
            })
        } else {
            ApiError::network(e)
        }
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        what: &str,
    ) -> Result<T, ApiError> {
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::MalformedResponse(format!("{what}: {e}")))
    }

    /// Searches for videos matching `query`.
    ///
    /// Uses the `search.list` API with `part=snippet&type=video`. Search results never
    /// include statistics.
    ///
    /// # Arguments
    ///
    /// * `query` - Free-text search terms
    /// * `page_size` - Maximum number of results to return (1-50)
    /// * `page_token` - Continuation token from a previous page, if any
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/search/list>
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<SearchListResponse, ApiError> {
        let max_results = page_size.to_string();
        let mut query_params = vec![
            ("part", "snippet"),
            ("type", "video"),
            ("q", query),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            query_params.push(("pageToken", token));
        }

        let response = self.make_keyed_request("search", &query_params).await?;
        let results: SearchListResponse = self.decode(response, "search envelope").await?;

        tracing::debug!(
            total_results = results.page_info.total_results,
            returned_items = results.items.len(),
            has_next_page = results.next_page_token.is_some(),
            "fetched search results"
        );

        Ok(results)
    }

    /// Gets snippet and statistics for a batch of videos in a single request.
    ///
    /// Duplicate ids are requested once. The response order is whatever the API returns,
    /// which is not necessarily the order of `ids`, and ids that don't exist are simply
    /// absent from the response. An empty `ids` yields an empty envelope without a request.
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/videos/list>
    #[instrument(skip_all)]
    pub async fn get_details<I, S>(&self, ids: I) -> Result<VideoListResponse, ApiError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for id in ids {
            let id = id.as_ref();
            if !unique.iter().any(|seen| seen == id) {
                unique.push(id.to_string());
            }
        }
        if unique.is_empty() {
            return Ok(VideoListResponse::empty());
        }

        let joined = unique.join(",");
        let query_params = [("part", "snippet,statistics"), ("id", joined.as_str())];

        let response = self.make_keyed_request("videos", &query_params).await?;
        let videos: VideoListResponse = self.decode(response, "videos envelope").await?;

        tracing::debug!(
            requested = unique.len(),
            returned_items = videos.items.len(),
            "fetched video details"
        );

        Ok(videos)
    }

    /// Gets the first page of the `mostPopular` chart for `region_code`.
    pub async fn get_trending(
        &self,
        page_size: u32,
        region_code: &str,
    ) -> Result<VideoListResponse, ApiError> {
        self.get_trending_page(page_size, region_code, None).await
    }

    /// Gets one page of the `mostPopular` chart for `region_code`.
    ///
    /// Uses the `videos.list` API with `chart=mostPopular`, which includes statistics.
    ///
    /// # Arguments
    ///
    /// * `page_size` - Maximum number of videos to return (1-50)
    /// * `region_code` - ISO 3166-1 alpha-2 country code, e.g. `US`
    /// * `page_token` - Continuation token from a previous page, if any
    ///
    /// # API Reference
    ///
    /// <https://developers.google.com/youtube/v3/docs/videos/list>
    #[instrument(skip(self))]
    pub async fn get_trending_page(
        &self,
        page_size: u32,
        region_code: &str,
        page_token: Option<&str>,
    ) -> Result<VideoListResponse, ApiError> {
        let max_results = page_size.to_string();
        let mut query_params = vec![
            ("part", "snippet,statistics"),
            ("chart", "mostPopular"),
            ("regionCode", region_code),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            query_params.push(("pageToken", token));
        }

        let response = self.make_keyed_request("videos", &query_params).await?;
        let videos: VideoListResponse = self.decode(response, "videos envelope").await?;

        tracing::debug!(
            region_code,
            returned_items = videos.items.len(),
            has_next_page = videos.next_page_token.is_some(),
            "fetched trending videos"
        );

        Ok(videos)
    }

    /// Returns a lazily paginated stream of every search hit for `query`.
    ///
    /// Pages are fetched on demand as the stream is polled, following `nextPageToken`
    /// until the API stops returning one. The stream ends after the first error.
    pub fn search_stream<'a>(
        &'a self,
        query: &'a str,
        page_size: u32,
    ) -> impl Stream<Item = Result<Video, ApiError>> + 'a {
        paginate(move |page_token: Option<String>| async move {
            let response = self.search(query, page_size, page_token.as_deref()).await?;
            let videos = transform::from_search_envelope(&response);
            Ok::<_, ApiError>((videos, response.next_page_token))
        })
    }

    /// Returns a lazily paginated stream of the `mostPopular` chart for `region_code`.
    ///
    /// Like [`Self::search_stream`], but each video carries statistics.
    pub fn trending_stream<'a>(
        &'a self,
        region_code: &'a str,
        page_size: u32,
    ) -> impl Stream<Item = Result<Video, ApiError>> + 'a {
        paginate(move |page_token: Option<String>| async move {
            let response = self
                .get_trending_page(page_size, region_code, page_token.as_deref())
                .await?;
            let videos = transform::from_detail_envelope(&response)?;
            Ok::<_, ApiError>((videos, response.next_page_token))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TEST_KEY, search_body, video_item, videos_body};
    use tokio_stream::StreamExt;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_test_client() -> (YouTubeClient, MockServer) {
        let mock_server = MockServer::start().await;
        let config = Config::default()
            .with_api_key(TEST_KEY)
            .with_base_url(mock_server.uri());
        let client = YouTubeClient::from_config(&config).unwrap();
        (client, mock_server)
    }

    #[tokio::test]
    async fn test_search_sends_expected_query() {
        let (client, mock_server) = create_test_client().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("part", "snippet"))
            .and(query_param("type", "video"))
            .and(query_param("q", "rust programming"))
            .and(query_param("maxResults", "12"))
            .and(query_param("key", TEST_KEY))
            .and(query_param_is_missing("pageToken"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(search_body(&["a", "b"], Some("CAoQAA"))),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let response = client.search("rust programming", 12, None).await.unwrap();
        assert_eq!(response.items.len(), 2);
        assert_eq!(response.items[0].id.video_id, "a");
        assert_eq!(response.next_page_token.as_deref(), Some("CAoQAA"));
        assert_eq!(response.page_info.total_results, 1000000);
    }

    #[tokio::test]
    async fn test_search_forwards_page_token() {
        let (client, mock_server) = create_test_client().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("pageToken", "CAoQAA"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["c"], None)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let response = client.search("rust", 12, Some("CAoQAA")).await.unwrap();
        assert_eq!(response.items.len(), 1);
        assert!(response.next_page_token.is_none());
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network_calls() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let config = Config::default()
            .without_api_key()
            .with_base_url(mock_server.uri());
        let client = YouTubeClient::from_config(&config).unwrap();

        let result = client.search("rust", 12, None).await;
        assert!(matches!(result, Err(ApiError::Configuration)), "{result:?}");
        let result = client.get_details(["a", "b"]).await;
        assert!(matches!(result, Err(ApiError::Configuration)), "{result:?}");
        let result = client.get_trending(12, "US").await;
        assert!(matches!(result, Err(ApiError::Configuration)), "{result:?}");
    }

    #[tokio::test]
    async fn test_forbidden_surfaces_as_upstream_status() {
        let (client, mock_server) = create_test_client().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(403).set_body_string("quotaExceeded"))
            .mount(&mock_server)
            .await;

        let err = client.search("rust", 12, None).await.unwrap_err();
        match err {
            ApiError::Upstream(UpstreamError::Status {
                status,
                status_text,
                body,
            }) => {
                assert_eq!(status.as_u16(), 403);
                assert_eq!(status_text, "Forbidden");
                assert_eq!(body, "quotaExceeded");
            }
            other => panic!("expected upstream status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(search_body(&["a"], None))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let config = Config::default()
            .with_api_key(TEST_KEY)
            .with_base_url(mock_server.uri())
            .with_timeout(Duration::from_millis(50));
        let client = YouTubeClient::from_config(&config).unwrap();

        let err = client.search("rust", 12, None).await.unwrap_err();
        assert!(err.is_timeout(), "{err:?}");
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_shared_http_client_still_gets_configured_timeout() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(video_item("a", 1, 1))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let shared = reqwest::Client::new();
        let config = Config::default()
            .with_api_key(TEST_KEY)
            .with_base_url(mock_server.uri())
            .with_timeout(Duration::from_millis(50));
        let client = YouTubeClient::new(&config, shared.clone());

        let err = client.get_trending(1, "US").await.unwrap_err();
        assert!(
            matches!(
                err,
                ApiError::Upstream(UpstreamError::Timeout { after }) if after == Duration::from_millis(50)
            ),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn test_unexpected_body_is_malformed() {
        let (client, mock_server) = create_test_client().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"error": "nope"})),
            )
            .mount(&mock_server)
            .await;

        let err = client.search("rust", 12, None).await.unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)), "{err:?}");
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_search_hit_without_video_id_is_malformed() {
        let (client, mock_server) = create_test_client().await;

        let mut body = search_body(&["a"], None);
        body["items"][0]["id"] = serde_json::json!({"kind": "youtube#channel", "channelId": "UC1"});
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&mock_server)
            .await;

        let err = client.search("rust", 12, None).await.unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_get_details_batches_unique_ids() {
        let (client, mock_server) = create_test_client().await;

        // the API is free to reorder
        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(query_param("part", "snippet,statistics"))
            .and(query_param("id", "a,b,c"))
            .and(query_param("key", TEST_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(videos_body(
                vec![video_item("c", 3, 1), video_item("a", 1, 1), video_item("b", 2, 1)],
                None,
            )))
            .expect(1)
            .mount(&mock_server)
            .await;

        let response = client.get_details(["a", "b", "a", "c"]).await.unwrap();
        let ids: Vec<_> = response.items.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_get_details_without_ids_skips_request() {
        let (client, mock_server) = create_test_client().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let response = client.get_details(Vec::<String>::new()).await.unwrap();
        assert!(response.items.is_empty());
    }

    #[tokio::test]
    async fn test_trending_sends_chart_query() {
        let (client, mock_server) = create_test_client().await;

        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(query_param("part", "snippet,statistics"))
            .and(query_param("chart", "mostPopular"))
            .and(query_param("regionCode", "GB"))
            .and(query_param("maxResults", "24"))
            .and(query_param("key", TEST_KEY))
            .and(query_param_is_missing("pageToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(videos_body(
                vec![video_item("t1", 100, 10)],
                Some("CBgQAA"),
            )))
            .expect(1)
            .mount(&mock_server)
            .await;

        let response = client.get_trending(24, "GB").await.unwrap();
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.next_page_token.as_deref(), Some("CBgQAA"));
    }

    #[tokio::test]
    async fn test_search_stream_follows_page_tokens() {
        let (client, mock_server) = create_test_client().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param_is_missing("pageToken"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(search_body(&["a", "b"], Some("p2"))),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("pageToken", "p2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["c"], None)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let stream = client.search_stream("rust", 2);
        let mut stream = std::pin::pin!(stream);
        let mut ids = Vec::new();
        while let Some(video) = stream.next().await {
            ids.push(video.unwrap().id);
        }
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_trending_stream_stops_after_error() {
        let (client, mock_server) = create_test_client().await;

        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(query_param_is_missing("pageToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(videos_body(
                vec![video_item("t1", 100, 10)],
                Some("p2"),
            )))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/videos"))
            .and(query_param("pageToken", "p2"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let stream = client.trending_stream("US", 1);
        let mut stream = std::pin::pin!(stream);
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.id, "t1");
        assert_eq!(first.view_count.as_deref(), Some("100"));
        let second = stream.next().await.unwrap();
        assert_eq!(
            second.unwrap_err().http_status().map(|s| s.as_u16()),
            Some(500)
        );
        assert!(stream.next().await.is_none());
    }
}
