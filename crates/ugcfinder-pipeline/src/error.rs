use thiserror::Error;
use ugcfinder_browser::BrowserError;
use ugcfinder_stats::StatsError;

/// Errors that end a processing run.
#[derive(Debug, Error)]
pub enum RunError {
    /// Navigation, link discovery or page-text extraction failed. No job was
    /// started for any later profile. A page-text failure happens after the
    /// job for this profile was launched; that job is cancelled with the rest.
    #[error("discovery failed for profile {profile} (#{index}): {source}")]
    Discovery {
        index: usize,
        profile: String,
        #[source]
        source: BrowserError,
    },

    /// A stats job hit an error its retry loop does not recover from.
    #[error("stats job for profile {profile} (#{index}) failed: {source}")]
    Job {
        index: usize,
        profile: String,
        #[source]
        source: StatsError,
    },

    #[error("run cancelled")]
    Cancelled,

    #[error("stats job panicked: {0}")]
    JobPanicked(String),

    #[error("concurrency gate closed")]
    GateClosed,

    #[error("failed to save results: {0}")]
    Flush(#[from] SinkError),
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to build spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("{0} profiles do not fit in one worksheet")]
    TooManyRows(usize),
}
