//! `scrape` command: load creators, evaluate them, save the results.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use ugcfinder_browser::{BrowserSession, BrowserlessClient, SessionOptions};
use ugcfinder_core::{load_profiles, select_range, AppConfig, BackoffSettings, FollowerRange};
use ugcfinder_pipeline::{JsonFileSink, PipelineConfig, ResultSink, XlsxFileSink};
use ugcfinder_stats::{BackoffPolicy, StatsClient};

use crate::{ResultFormat, ScrapeArgs};

pub(crate) async fn run_scrape(config: AppConfig, args: ScrapeArgs) -> anyhow::Result<()> {
    let config = apply_overrides(config, &args);
    let range = FollowerRange::parse(&args.min_followers, &args.max_followers)?;

    let loaded = load_profiles(&args.file, range)
        .with_context(|| format!("failed to load profiles from {}", args.file.display()))?;
    let found = loaded.len();
    let mut profiles = select_range(
        loaded,
        args.from,
        args.to,
        args.limit.unwrap_or(usize::MAX),
    );
    tracing::info!(
        found,
        selected = profiles.len(),
        min_followers = range.min,
        max_followers = ?range.max,
        "profiles loaded"
    );

    let stats = Arc::new(build_stats_client(&config)?);
    let mut browser = build_browser(&config)?;
    let sink = build_sink(&config, args.result_format);
    let pipeline = PipelineConfig::from(&config);

    let cancel = CancellationToken::new();
    let ctrl_c = tokio::spawn(cancel_on_ctrl_c(cancel.clone()));
    let result = ugcfinder_pipeline::run(
        &mut profiles,
        &mut browser,
        stats,
        sink.as_ref(),
        &pipeline,
        &cancel,
    )
    .await;
    ctrl_c.abort();

    let summary = result.context("scrape run failed")?;
    println!(
        "processed {}/{} profiles, results saved in {}",
        summary.completed,
        summary.profiles,
        config.working_dir.display()
    );
    Ok(())
}

/// Layers command-line flags over the environment configuration.
pub(crate) fn apply_overrides(mut config: AppConfig, args: &ScrapeArgs) -> AppConfig {
    if let Some(recent_videos) = args.recent_videos {
        config.recent_videos = recent_videos;
    }
    if let Some(api_server) = &args.api_server {
        config.api_server.clone_from(api_server);
    }
    if let Some(working_dir) = &args.working_dir {
        config.working_dir.clone_from(working_dir);
    }
    config
}

pub(crate) fn build_sink(config: &AppConfig, format: ResultFormat) -> Box<dyn ResultSink> {
    match format {
        ResultFormat::Json => Box::new(JsonFileSink::new(&config.working_dir)),
        ResultFormat::Xlsx => Box::new(XlsxFileSink::new(
            &config.working_dir,
            config.profile_base_url.as_str(),
        )),
    }
}

pub(crate) fn backoff_policy(settings: &BackoffSettings) -> BackoffPolicy {
    BackoffPolicy {
        initial_interval: Duration::from_millis(settings.initial_ms),
        max_interval: Duration::from_millis(settings.max_ms),
        multiplier: settings.multiplier,
        max_elapsed: settings.max_elapsed_secs.map(Duration::from_secs),
        ..BackoffPolicy::default()
    }
}

fn build_stats_client(config: &AppConfig) -> anyhow::Result<StatsClient> {
    StatsClient::new(
        &config.api_server,
        config.request_timeout_secs,
        backoff_policy(&config.backoff),
    )
    .map_err(|e| anyhow::anyhow!("failed to build stats client: {e}"))
}

fn build_browser(config: &AppConfig) -> anyhow::Result<BrowserSession> {
    let client = BrowserlessClient::new(
        &config.browserless_url,
        config.browserless_token.as_deref(),
        config.discovery_timeout_secs.saturating_add(5),
    )
    .map_err(|e| anyhow::anyhow!("failed to build browserless client: {e}"))?;
    Ok(BrowserSession::new(
        client,
        SessionOptions {
            profile_base_url: config.profile_base_url.clone(),
            attempt_timeout: Duration::from_secs(config.discovery_timeout_secs),
            max_refreshes: config.discovery_max_refreshes,
        },
    ))
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        return;
    }
    tracing::info!("received ctrl-c, cancelling run and saving partial results");
    cancel.cancel();
}
