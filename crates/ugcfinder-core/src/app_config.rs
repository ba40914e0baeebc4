use std::path::PathBuf;

/// Exponential back-off parameters for the stats API retry loop.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffSettings {
    pub initial_ms: u64,
    pub max_ms: u64,
    pub multiplier: f64,
    /// Total retry budget. `None` retries until success or cancellation.
    pub max_elapsed_secs: Option<u64>,
}

impl Default for BackoffSettings {
    fn default() -> Self {
        Self {
            initial_ms: 500,
            max_ms: 60_000,
            multiplier: 1.5,
            max_elapsed_secs: None,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub api_server: String,
    pub browserless_url: String,
    pub browserless_token: Option<String>,
    pub profile_base_url: String,
    pub working_dir: PathBuf,
    pub log_level: String,
    pub max_concurrent_jobs: usize,
    pub recent_videos: usize,
    pub gate_first_profile: bool,
    pub request_timeout_secs: u64,
    pub backoff: BackoffSettings,
    pub discovery_timeout_secs: u64,
    pub discovery_max_refreshes: u32,
    pub shutdown_grace_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_server", &self.api_server)
            .field("browserless_url", &self.browserless_url)
            .field(
                "browserless_token",
                &self.browserless_token.as_ref().map(|_| "[redacted]"),
            )
            .field("profile_base_url", &self.profile_base_url)
            .field("working_dir", &self.working_dir)
            .field("log_level", &self.log_level)
            .field("max_concurrent_jobs", &self.max_concurrent_jobs)
            .field("recent_videos", &self.recent_videos)
            .field("gate_first_profile", &self.gate_first_profile)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("backoff", &self.backoff)
            .field("discovery_timeout_secs", &self.discovery_timeout_secs)
            .field("discovery_max_refreshes", &self.discovery_max_refreshes)
            .field("shutdown_grace_secs", &self.shutdown_grace_secs)
            .finish()
    }
}
