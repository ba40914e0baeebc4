use std::time::Duration;

use ugcfinder_core::AppConfig;

/// Per-run knobs for [`crate::process_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Gate capacity: stats jobs allowed to run at once.
    pub max_concurrent_jobs: usize,
    /// Video links sampled per profile.
    pub recent_videos: usize,
    /// When `false`, the job for profile 0 bypasses the gate.
    pub gate_first_profile: bool,
    /// How long a failed or cancelled run waits for in-flight jobs to stop
    /// before aborting them.
    pub shutdown_grace: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: 5,
            recent_videos: 15,
            gate_first_profile: false,
            shutdown_grace: Duration::from_secs(10),
        }
    }
}

impl From<&AppConfig> for PipelineConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_concurrent_jobs: config.max_concurrent_jobs.max(1),
            recent_videos: config.recent_videos,
            gate_first_profile: config.gate_first_profile,
            shutdown_grace: Duration::from_secs(config.shutdown_grace_secs),
        }
    }
}
