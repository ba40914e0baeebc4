//! HTTP client for the video stats API.
//!
//! The service exposes a single endpoint, `GET /api?url={video_url}`, that
//! scrapes one video and answers with its post time and counters. When it is
//! overloaded it answers 200 with an empty body instead of an error status;
//! that reply surfaces as [`StatsError::Busy`].

use std::time::Duration;

use reqwest::{Client, Url};
use tokio_util::sync::CancellationToken;

use crate::error::StatsError;
use crate::retry::{retry_with_backoff, BackoffPolicy};
use crate::types::{ApiResult, VideoStat};

/// Client for the video stats API.
///
/// Cheap to share behind an `Arc`; every concurrent job uses the same
/// connection pool.
pub struct StatsClient {
    client: Client,
    endpoint: Url,
    policy: BackoffPolicy,
}

impl StatsClient {
    /// Creates a client for `api_server`. A server given without a scheme
    /// (`127.0.0.1:8000`) is treated as plain `http`.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`StatsError::InvalidServer`] if
    /// `api_server` is not a usable base URL.
    pub fn new(
        api_server: &str,
        timeout_secs: u64,
        policy: BackoffPolicy,
    ) -> Result<Self, StatsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("ugcfinder/0.1 (creator-metrics)")
            .build()?;
        let endpoint = Self::endpoint_url(api_server)?;
        Ok(Self {
            client,
            endpoint,
            policy,
        })
    }

    /// Fetches one video's stats, single attempt.
    ///
    /// # Errors
    ///
    /// - [`StatsError::Busy`] if the service answered with an all-zero body.
    /// - [`StatsError::UnexpectedStatus`] on a non-2xx status.
    /// - [`StatsError::Http`] on network failure.
    /// - [`StatsError::Deserialize`] if the body is not the expected JSON.
    pub async fn fetch_stats(&self, video_url: &str) -> Result<VideoStat, StatsError> {
        let url = self.request_url(video_url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StatsError::UnexpectedStatus {
                status: status.as_u16(),
                url: video_url.to_owned(),
            });
        }

        let body = response.text().await?;
        let parsed: ApiResult =
            serde_json::from_str(&body).map_err(|e| StatsError::Deserialize {
                context: format!("stats for {video_url}"),
                source: e,
            })?;
        if parsed.is_empty() {
            return Err(StatsError::Busy {
                url: video_url.to_owned(),
            });
        }
        Ok(parsed.into())
    }

    /// Fetches one video's stats, retrying busy replies and transport
    /// failures with exponential back-off until success or cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Cancelled`] once `cancel` fires, or
    /// [`StatsError::RetryBudgetExhausted`] if the policy has a time budget
    /// and it ran out.
    pub async fn fetch_stats_with_retry(
        &self,
        video_url: &str,
        cancel: &CancellationToken,
    ) -> Result<VideoStat, StatsError> {
        retry_with_backoff(&self.policy, cancel, video_url, || self.fetch_stats(video_url)).await
    }

    /// Normalises the configured server into the `/api` endpoint URL.
    fn endpoint_url(api_server: &str) -> Result<Url, StatsError> {
        let trimmed = api_server.trim();
        let with_scheme = if trimmed.contains("://") {
            trimmed.to_owned()
        } else {
            format!("http://{trimmed}")
        };
        let mut url = Url::parse(&with_scheme).map_err(|e| StatsError::InvalidServer {
            server: api_server.to_owned(),
            reason: e.to_string(),
        })?;
        if url.host_str().is_none_or(str::is_empty) {
            return Err(StatsError::InvalidServer {
                server: api_server.to_owned(),
                reason: "missing host".to_owned(),
            });
        }
        url.set_path("/api");
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }

    /// Builds `…/api?url={video_url}` with the video URL percent-encoded.
    fn request_url(&self, video_url: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("url", video_url);
        url
    }
}
