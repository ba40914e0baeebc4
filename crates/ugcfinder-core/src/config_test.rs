use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_uses_defaults_when_env_is_empty() {
    let map = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert_eq!(cfg.api_server, "http://127.0.0.1:8000");
    assert_eq!(cfg.browserless_url, "http://127.0.0.1:3000");
    assert!(cfg.browserless_token.is_none());
    assert_eq!(cfg.profile_base_url, "https://www.tiktok.com");
    assert_eq!(cfg.working_dir.to_str(), Some("."));
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.max_concurrent_jobs, 5);
    assert_eq!(cfg.recent_videos, 15);
    assert!(!cfg.gate_first_profile);
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.backoff, BackoffSettings::default());
    assert_eq!(cfg.discovery_timeout_secs, 15);
    assert_eq!(cfg.discovery_max_refreshes, 10);
    assert_eq!(cfg.shutdown_grace_secs, 10);
}

#[test]
fn max_concurrent_jobs_override() {
    let mut map = HashMap::new();
    map.insert("UGCFINDER_MAX_CONCURRENT_JOBS", "8");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_concurrent_jobs, 8);
}

#[test]
fn max_concurrent_jobs_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("UGCFINDER_MAX_CONCURRENT_JOBS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "UGCFINDER_MAX_CONCURRENT_JOBS"),
        "expected InvalidEnvVar(UGCFINDER_MAX_CONCURRENT_JOBS), got: {result:?}"
    );
}

#[test]
fn recent_videos_invalid() {
    let mut map = HashMap::new();
    map.insert("UGCFINDER_RECENT_VIDEOS", "fifteen");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "UGCFINDER_RECENT_VIDEOS"),
        "expected InvalidEnvVar(UGCFINDER_RECENT_VIDEOS), got: {result:?}"
    );
}

#[test]
fn gate_first_profile_accepts_common_spellings() {
    for (raw, expected) in [("true", true), ("1", true), ("FALSE", false), ("0", false)] {
        let mut map = HashMap::new();
        map.insert("UGCFINDER_GATE_FIRST_PROFILE", raw);
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.gate_first_profile, expected, "raw value {raw}");
    }
}

#[test]
fn gate_first_profile_rejects_garbage() {
    let mut map = HashMap::new();
    map.insert("UGCFINDER_GATE_FIRST_PROFILE", "sometimes");
    assert!(build_app_config(lookup_from_map(&map)).is_err());
}

#[test]
fn backoff_overrides() {
    let mut map = HashMap::new();
    map.insert("UGCFINDER_BACKOFF_INITIAL_MS", "100");
    map.insert("UGCFINDER_BACKOFF_MAX_MS", "2000");
    map.insert("UGCFINDER_BACKOFF_MULTIPLIER", "2");
    map.insert("UGCFINDER_BACKOFF_MAX_ELAPSED_SECS", "900");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.backoff.initial_ms, 100);
    assert_eq!(cfg.backoff.max_ms, 2000);
    assert!((cfg.backoff.multiplier - 2.0).abs() < f64::EPSILON);
    assert_eq!(cfg.backoff.max_elapsed_secs, Some(900));
}

#[test]
fn backoff_multiplier_below_one_is_rejected() {
    let mut map = HashMap::new();
    map.insert("UGCFINDER_BACKOFF_MULTIPLIER", "0.5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "UGCFINDER_BACKOFF_MULTIPLIER"),
        "expected InvalidEnvVar(UGCFINDER_BACKOFF_MULTIPLIER), got: {result:?}"
    );
}

#[test]
fn backoff_multiplier_of_exactly_one_is_rejected() {
    let mut map = HashMap::new();
    map.insert("UGCFINDER_BACKOFF_MULTIPLIER", "1.0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "UGCFINDER_BACKOFF_MULTIPLIER"),
        "expected InvalidEnvVar(UGCFINDER_BACKOFF_MULTIPLIER), got: {result:?}"
    );
}

#[test]
fn gate_first_profile_accepts_yes_and_no() {
    for (raw, expected) in [("yes", true), ("YES", true), ("no", false), ("No", false)] {
        let mut map = HashMap::new();
        map.insert("UGCFINDER_GATE_FIRST_PROFILE", raw);
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.gate_first_profile, expected, "value {raw}");
    }
}

#[test]
fn empty_browserless_token_is_treated_as_unset() {
    let mut map = HashMap::new();
    map.insert("UGCFINDER_BROWSERLESS_TOKEN", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.browserless_token.is_none());
}

#[test]
fn debug_redacts_browserless_token() {
    let mut map = HashMap::new();
    map.insert("UGCFINDER_BROWSERLESS_TOKEN", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[redacted]"));
}
