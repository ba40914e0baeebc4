use thiserror::Error;

/// Errors returned by the video stats API client.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered 2xx with an all-zero body: it is overloaded and
    /// wants the caller to come back later.
    #[error("stats API busy for {url}")]
    Busy { url: String },

    #[error("unexpected HTTP status {status} from stats API for {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid stats API server \"{server}\": {reason}")]
    InvalidServer { server: String, reason: String },

    /// The run was cancelled before the next attempt started.
    #[error("stats fetch cancelled for {url}")]
    Cancelled { url: String },

    #[error("gave up on {url} after {attempts} attempts: {last}")]
    RetryBudgetExhausted {
        url: String,
        attempts: u32,
        #[source]
        last: Box<StatsError>,
    },
}

impl StatsError {
    /// Overload and transport/parse failures are retried the same way.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StatsError::Http(_)
                | StatsError::Busy { .. }
                | StatsError::UnexpectedStatus { .. }
                | StatsError::Deserialize { .. }
        )
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StatsError::Cancelled { .. })
    }
}
