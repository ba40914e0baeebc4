use crate::app_config::{AppConfig, BackoffSettings};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` if a value is present but invalid.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let api_server = or_default("UGCFINDER_API_SERVER", "http://127.0.0.1:8000");
    let browserless_url = or_default("UGCFINDER_BROWSERLESS_URL", "http://127.0.0.1:3000");
    let browserless_token = lookup("UGCFINDER_BROWSERLESS_TOKEN")
        .ok()
        .filter(|t| !t.is_empty());
    let profile_base_url = or_default("UGCFINDER_PROFILE_BASE_URL", "https://www.tiktok.com");
    let working_dir = PathBuf::from(or_default("UGCFINDER_WORKING_DIR", "."));
    let log_level = or_default("UGCFINDER_LOG_LEVEL", "info");

    let max_concurrent_jobs = parse_usize("UGCFINDER_MAX_CONCURRENT_JOBS", "5")?;
    if max_concurrent_jobs == 0 {
        return Err(invalid(
            "UGCFINDER_MAX_CONCURRENT_JOBS",
            "must be at least 1".to_string(),
        ));
    }
    let recent_videos = parse_usize("UGCFINDER_RECENT_VIDEOS", "15")?;
    let gate_first_profile = parse_bool(&or_default("UGCFINDER_GATE_FIRST_PROFILE", "false"))
        .ok_or_else(|| {
            invalid(
                "UGCFINDER_GATE_FIRST_PROFILE",
                "expected true or false".to_string(),
            )
        })?;
    let request_timeout_secs = parse_u64("UGCFINDER_REQUEST_TIMEOUT_SECS", "30")?;

    let backoff = BackoffSettings {
        initial_ms: parse_u64("UGCFINDER_BACKOFF_INITIAL_MS", "500")?,
        max_ms: parse_u64("UGCFINDER_BACKOFF_MAX_MS", "60000")?,
        multiplier: parse_multiplier(&or_default("UGCFINDER_BACKOFF_MULTIPLIER", "1.5"))
            .map_err(|reason| invalid("UGCFINDER_BACKOFF_MULTIPLIER", reason))?,
        max_elapsed_secs: match lookup("UGCFINDER_BACKOFF_MAX_ELAPSED_SECS") {
            Ok(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|e| invalid("UGCFINDER_BACKOFF_MAX_ELAPSED_SECS", e.to_string()))?,
            ),
            Err(_) => None,
        },
    };

    let discovery_timeout_secs = parse_u64("UGCFINDER_DISCOVERY_TIMEOUT_SECS", "15")?;
    let discovery_max_refreshes = parse_u32("UGCFINDER_DISCOVERY_MAX_REFRESHES", "10")?;
    let shutdown_grace_secs = parse_u64("UGCFINDER_SHUTDOWN_GRACE_SECS", "10")?;

    Ok(AppConfig {
        api_server,
        browserless_url,
        browserless_token,
        profile_base_url,
        working_dir,
        log_level,
        max_concurrent_jobs,
        recent_videos,
        gate_first_profile,
        request_timeout_secs,
        backoff,
        discovery_timeout_secs,
        discovery_max_refreshes,
        shutdown_grace_secs,
    })
}

/// Parse a boolean flag. Accepts `true`/`false`, `1`/`0` and `yes`/`no`,
/// case-insensitive.
fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// The delay has to grow between retries, so the multiplier must exceed 1.0.
fn parse_multiplier(s: &str) -> Result<f64, String> {
    let value = s.trim().parse::<f64>().map_err(|e| e.to_string())?;
    if !value.is_finite() || value <= 1.0 {
        return Err(format!("must be a finite number > 1.0, got {value}"));
    }
    Ok(value)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
