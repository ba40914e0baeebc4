pub mod app_config;
pub mod config;
pub mod emails;
pub mod input;
pub mod profile;

pub use app_config::{AppConfig, BackoffSettings};
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use emails::find_emails;
pub use input::{load_profiles, parse_follower_bound, select_range, FollowerRange, InputError};
pub use profile::ProfileRecord;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
