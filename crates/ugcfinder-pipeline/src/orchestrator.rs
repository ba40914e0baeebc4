//! Drives one evaluation run over a list of profiles.
//!
//! Discovery is strictly serial on the single browser session. Every profile
//! whose links were discovered gets a stats job in one [`JoinSet`]; jobs wait
//! on the [`ConcurrencyGate`] and report back over channels. The
//! orchestrator is the only writer of the result buffer: a job's metrics are
//! applied to its own slot when its completion message is received.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use ugcfinder_core::{find_emails, ProfileRecord};
use ugcfinder_stats::{aggregate, ProfileMetrics};

use crate::config::PipelineConfig;
use crate::error::RunError;
use crate::gate::ConcurrencyGate;
use crate::tracker::CompletionTracker;
use crate::traits::{ProfileBrowser, ResultSink, StatsSource};

/// What a finished run accomplished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub profiles: usize,
    pub completed: usize,
}

#[derive(Debug)]
struct Completion {
    index: usize,
    metrics: ProfileMetrics,
}

struct Job {
    index: usize,
    profile: String,
    links: Vec<String>,
}

/// Everything a spawned job needs, cloned per job.
#[derive(Clone)]
struct JobContext {
    stats: Arc<dyn StatsSource>,
    gate: ConcurrencyGate,
    cancel: CancellationToken,
    done: mpsc::UnboundedSender<Completion>,
    fatal: mpsc::UnboundedSender<RunError>,
}

struct RunState {
    ctx: JobContext,
    jobs: JoinSet<()>,
    done_rx: mpsc::UnboundedReceiver<Completion>,
    fatal_rx: mpsc::UnboundedReceiver<RunError>,
    tracker: CompletionTracker,
}

/// Processes every profile and fills in its metrics and emails.
///
/// Returns once every job has reported completion, or at the first fatal
/// error or cancellation. In the failure case the remaining jobs are
/// cancelled and joined before this returns, and any completions that
/// arrived in the meantime are still applied. No job outlives the call.
///
/// # Errors
///
/// - [`RunError::Discovery`] if navigating or reading a profile page failed
/// - [`RunError::Job`] for the first job whose stats could not be fetched
/// - [`RunError::Cancelled`] if `cancel` fired
/// - [`RunError::JobPanicked`] if a job task panicked
pub async fn process_all(
    profiles: &mut [ProfileRecord],
    browser: &mut dyn ProfileBrowser,
    stats: Arc<dyn StatsSource>,
    config: &PipelineConfig,
    cancel: &CancellationToken,
) -> Result<RunSummary, RunError> {
    let (done_tx, done_rx) = mpsc::unbounded_channel();
    let (fatal_tx, fatal_rx) = mpsc::unbounded_channel();
    let mut state = RunState {
        ctx: JobContext {
            stats,
            gate: ConcurrencyGate::new(config.max_concurrent_jobs, config.gate_first_profile),
            cancel: cancel.child_token(),
            done: done_tx,
            fatal: fatal_tx,
        },
        jobs: JoinSet::new(),
        done_rx,
        fatal_rx,
        tracker: CompletionTracker::new(profiles.len()),
    };

    tracing::info!(
        profiles = profiles.len(),
        max_concurrent_jobs = state.ctx.gate.capacity(),
        recent_videos = config.recent_videos,
        "starting run"
    );

    let outcome = match state.dispatch(profiles, browser, config.recent_videos).await {
        Ok(()) => state.wait(profiles).await,
        Err(err) => Err(err),
    };

    if let Err(err) = &outcome {
        tracing::warn!(error = %err, "run stopping, cancelling outstanding jobs");
    }
    state.shutdown(profiles, config.shutdown_grace).await;

    outcome.map(|()| RunSummary {
        profiles: profiles.len(),
        completed: state.tracker.completed(),
    })
}

/// Runs [`process_all`] and then flushes the buffer to `sink` exactly once,
/// whichever way the run ended.
///
/// # Errors
///
/// Returns the run's error if it failed. A flush failure is returned only
/// when the run itself succeeded; otherwise it is logged.
pub async fn run(
    profiles: &mut [ProfileRecord],
    browser: &mut dyn ProfileBrowser,
    stats: Arc<dyn StatsSource>,
    sink: &dyn ResultSink,
    config: &PipelineConfig,
    cancel: &CancellationToken,
) -> Result<RunSummary, RunError> {
    let outcome = process_all(profiles, browser, stats, config, cancel).await;
    if let Err(err) = &outcome {
        tracing::error!(error = %err, "run failed, saving partial results");
    }

    let flushed = sink.flush(profiles).await;
    match (outcome, flushed) {
        (Ok(summary), Ok(())) => Ok(summary),
        (Ok(_), Err(flush_err)) => Err(RunError::Flush(flush_err)),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(flush_err)) => {
            tracing::error!(error = %flush_err, "failed to save partial results");
            Err(err)
        }
    }
}

impl RunState {
    /// Serial discovery loop. Each iteration checks for an earlier job
    /// failure or cancellation before touching the browser, and every browser
    /// step is abandoned as soon as either arrives.
    async fn dispatch(
        &mut self,
        profiles: &mut [ProfileRecord],
        browser: &mut dyn ProfileBrowser,
        recent_videos: usize,
    ) -> Result<(), RunError> {
        for (index, record) in profiles.iter_mut().enumerate() {
            if let Ok(err) = self.fatal_rx.try_recv() {
                return Err(err);
            }
            if self.ctx.cancel.is_cancelled() {
                return Err(RunError::Cancelled);
            }

            let profile = record.unique_id.clone();
            let discovery_err = |source| RunError::Discovery {
                index,
                profile: profile.clone(),
                source,
            };

            tracing::info!(index, profile = %profile, "discovering recent videos");
            self.interruptible(browser.navigate(&profile))
                .await?
                .map_err(discovery_err)?;
            let links = self
                .interruptible(browser.discover_recent_video_links(recent_videos))
                .await?
                .map_err(discovery_err)?;
            tracing::debug!(index, profile = %profile, links = links.len(), "video links found");

            self.spawn_job(Job {
                index,
                profile: profile.clone(),
                links,
            });

            let text = self
                .interruptible(browser.extract_page_text())
                .await?
                .map_err(discovery_err)?;
            let emails = find_emails(&text);
            if !emails.is_empty() {
                tracing::info!(index, profile = %profile, emails = ?emails, "emails found");
            }
            record.add_emails(emails);
        }
        Ok(())
    }

    /// Awaits one browser step unless a job fails or the run is cancelled
    /// first. The step's own result is returned untouched.
    async fn interruptible<T, E, F>(&mut self, step: F) -> Result<Result<T, E>, RunError>
    where
        F: Future<Output = Result<T, E>>,
    {
        tokio::select! {
            biased;
            Some(err) = self.fatal_rx.recv() => Err(err),
            () = self.ctx.cancel.cancelled() => Err(RunError::Cancelled),
            result = step => Ok(result),
        }
    }

    fn spawn_job(&mut self, job: Job) {
        let ctx = self.ctx.clone();
        self.jobs.spawn(run_job(job, ctx));
    }

    /// Waits until every job completed, or the first error or cancellation.
    async fn wait(&mut self, profiles: &mut [ProfileRecord]) -> Result<(), RunError> {
        while !self.tracker.is_complete() {
            tokio::select! {
                biased;
                Some(err) = self.fatal_rx.recv() => return Err(err),
                () = self.ctx.cancel.cancelled() => return Err(RunError::Cancelled),
                Some(done) = self.done_rx.recv() => {
                    apply_completion(profiles, &mut self.tracker, done);
                }
                Some(joined) = self.jobs.join_next() => {
                    if let Err(join_err) = joined {
                        if join_err.is_panic() {
                            return Err(RunError::JobPanicked(join_err.to_string()));
                        }
                    }
                }
            }
        }
        tracing::info!(completed = self.tracker.completed(), "all profiles processed");
        Ok(())
    }

    /// Cancels remaining jobs, joins them within `grace` (aborting the rest),
    /// then applies any completions still queued.
    async fn shutdown(&mut self, profiles: &mut [ProfileRecord], grace: Duration) {
        self.ctx.cancel.cancel();

        let jobs = &mut self.jobs;
        let drained = tokio::time::timeout(grace, async {
            while let Some(joined) = jobs.join_next().await {
                if let Err(join_err) = joined {
                    tracing::warn!(error = %join_err, "stats job ended abnormally");
                }
            }
        })
        .await;

        if drained.is_err() {
            tracing::warn!(
                remaining = self.jobs.len(),
                grace_secs = grace.as_secs(),
                "jobs did not stop within grace period, aborting"
            );
            self.jobs.abort_all();
            while self.jobs.join_next().await.is_some() {}
        }

        while let Ok(done) = self.done_rx.try_recv() {
            apply_completion(profiles, &mut self.tracker, done);
        }
        while let Ok(err) = self.fatal_rx.try_recv() {
            tracing::debug!(error = %err, "further job failure after run ended");
        }
    }
}

fn apply_completion(
    profiles: &mut [ProfileRecord],
    tracker: &mut CompletionTracker,
    done: Completion,
) {
    if !tracker.record(done.index) {
        tracing::warn!(index = done.index, "ignoring duplicate completion signal");
        return;
    }
    if let Some(record) = profiles.get_mut(done.index) {
        record.ap = done.metrics.average_plays;
        record.ai = done.metrics.average_interaction;
        record.latest_video_time = done.metrics.latest_video_time;
    }
}

/// Fetches every link of one profile in order, aggregates, and reports.
///
/// Sends exactly one message: a completion on success, a fatal error on a
/// non-recoverable failure. Cancellation is reported by the token itself, so
/// a cancelled job exits silently.
async fn run_job(job: Job, ctx: JobContext) {
    let permit = tokio::select! {
        biased;
        () = ctx.cancel.cancelled() => return,
        permit = ctx.gate.enter(job.index) => permit,
    };
    let Ok(_permit) = permit else {
        let _ = ctx.fatal.send(RunError::GateClosed);
        return;
    };

    tracing::debug!(
        index = job.index,
        profile = %job.profile,
        permits_held = ctx.gate.held(),
        "stats job started"
    );

    let mut stats = Vec::with_capacity(job.links.len());
    for link in &job.links {
        match ctx.stats.fetch_with_retry(link, &ctx.cancel).await {
            Ok(stat) => stats.push(stat),
            Err(err) if err.is_cancelled() => {
                tracing::debug!(index = job.index, profile = %job.profile, "stats job cancelled");
                return;
            }
            Err(source) => {
                let _ = ctx.fatal.send(RunError::Job {
                    index: job.index,
                    profile: job.profile,
                    source,
                });
                return;
            }
        }
    }

    let metrics = aggregate(&stats);
    tracing::info!(
        index = job.index,
        profile = %job.profile,
        videos = stats.len(),
        ap = metrics.average_plays,
        ai = metrics.average_interaction,
        "profile metrics computed"
    );
    let _ = ctx.done.send(Completion {
        index: job.index,
        metrics,
    });
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
