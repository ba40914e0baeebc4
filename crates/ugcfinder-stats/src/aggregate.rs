//! Reduction of a profile's recent video stats into AP / AI.

use chrono::{DateTime, Utc};

use crate::types::VideoStat;

/// Summary metrics for one profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileMetrics {
    /// Post time of the newest sampled video; the Unix epoch when none.
    pub latest_video_time: DateTime<Utc>,
    /// Average plays, truncated toward zero.
    pub average_plays: u64,
    /// Mean of per-video digg/play ratios.
    pub average_interaction: f64,
}

impl Default for ProfileMetrics {
    fn default() -> Self {
        Self {
            latest_video_time: DateTime::UNIX_EPOCH,
            average_plays: 0,
            average_interaction: 0.0,
        }
    }
}

/// Aggregates `stats`, which must be ordered newest first.
///
/// A video with zero plays contributes an interaction ratio of `0.0` and still
/// counts toward the mean. An empty slice yields [`ProfileMetrics::default`].
#[must_use]
pub fn aggregate(stats: &[VideoStat]) -> ProfileMetrics {
    let Some(newest) = stats.first() else {
        return ProfileMetrics::default();
    };

    let count = stats.len() as u64;
    let total_plays: u64 = stats.iter().map(|s| s.play_count).fold(0, u64::saturating_add);

    #[allow(clippy::cast_precision_loss)]
    let ratio_sum: f64 = stats
        .iter()
        .map(|s| {
            if s.play_count == 0 {
                0.0
            } else {
                s.digg_count as f64 / s.play_count as f64
            }
        })
        .sum();

    #[allow(clippy::cast_precision_loss)]
    let average_interaction = ratio_sum / count as f64;

    ProfileMetrics {
        latest_video_time: DateTime::from_timestamp(newest.created_time, 0)
            .unwrap_or(DateTime::UNIX_EPOCH),
        average_plays: total_plays / count,
        average_interaction,
    }
}
