//! Seams between the orchestrator and the outside world.
//!
//! The orchestrator only talks to these traits so tests can drive it with
//! in-memory fakes.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use ugcfinder_browser::{BrowserError, BrowserSession};
use ugcfinder_core::ProfileRecord;
use ugcfinder_stats::{StatsClient, StatsError, VideoStat};

use crate::error::SinkError;

/// A stateful page session. Driven serially by the orchestrator only.
#[async_trait]
pub trait ProfileBrowser: Send {
    async fn navigate(&mut self, profile_id: &str) -> Result<(), BrowserError>;

    async fn discover_recent_video_links(
        &mut self,
        max: usize,
    ) -> Result<Vec<String>, BrowserError>;

    async fn extract_page_text(&mut self) -> Result<String, BrowserError>;
}

/// Per-video stats lookup, including whatever retrying the source does.
/// Shared by every running job.
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn fetch_with_retry(
        &self,
        video_url: &str,
        cancel: &CancellationToken,
    ) -> Result<VideoStat, StatsError>;
}

/// Final destination of the result buffer.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn flush(&self, profiles: &[ProfileRecord]) -> Result<(), SinkError>;
}

#[async_trait]
impl ProfileBrowser for BrowserSession {
    async fn navigate(&mut self, profile_id: &str) -> Result<(), BrowserError> {
        BrowserSession::navigate(self, profile_id).await
    }

    async fn discover_recent_video_links(
        &mut self,
        max: usize,
    ) -> Result<Vec<String>, BrowserError> {
        BrowserSession::discover_recent_video_links(self, max).await
    }

    async fn extract_page_text(&mut self) -> Result<String, BrowserError> {
        BrowserSession::extract_page_text(self)
    }
}

#[async_trait]
impl StatsSource for StatsClient {
    async fn fetch_with_retry(
        &self,
        video_url: &str,
        cancel: &CancellationToken,
    ) -> Result<VideoStat, StatsError> {
        self.fetch_stats_with_retry(video_url, cancel).await
    }
}
