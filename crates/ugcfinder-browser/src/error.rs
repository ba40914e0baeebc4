use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Browserless API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid Browserless URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The page never finished rendering, even after refreshing.
    #[error("page {url} stalled after {refreshes} refreshes")]
    Stalled { url: String, refreshes: u32 },

    #[error("no page loaded; navigate to a profile first")]
    NoPage,
}
