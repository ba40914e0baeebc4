pub mod aggregate;
pub mod client;
pub mod error;
pub mod retry;
pub mod types;

pub use aggregate::{aggregate, ProfileMetrics};
pub use client::StatsClient;
pub use error::StatsError;
pub use retry::{retry_with_backoff, BackoffPolicy};
pub use types::VideoStat;
