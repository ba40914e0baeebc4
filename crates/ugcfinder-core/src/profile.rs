use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One creator profile and the engagement metrics collected for it.
///
/// The identity fields come from the input file. `ap`, `ai`,
/// `latest_video_time` and `email` start empty and are filled in by the
/// pipeline; whatever state they hold at the end of a run is what gets saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub name: String,
    pub signature: String,
    pub unique_id: String,
    pub follower_count: u64,
    /// Not collected; kept so saved files line up with older result files.
    #[serde(default)]
    pub gender: String,
    /// Average plays across the sampled recent videos.
    #[serde(default)]
    pub ap: u64,
    /// Average interaction rate (mean digg/play ratio).
    #[serde(default)]
    pub ai: f64,
    #[serde(default)]
    pub email: Vec<String>,
    #[serde(default = "epoch")]
    pub latest_video_time: DateTime<Utc>,
}

fn epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

impl ProfileRecord {
    pub fn new(unique_id: impl Into<String>, follower_count: u64) -> Self {
        Self {
            name: String::new(),
            signature: String::new(),
            unique_id: unique_id.into(),
            follower_count,
            gender: String::new(),
            ap: 0,
            ai: 0.0,
            email: Vec::new(),
            latest_video_time: epoch(),
        }
    }

    /// Appends addresses not already present, preserving first-seen order.
    pub fn add_emails<I>(&mut self, emails: I)
    where
        I: IntoIterator<Item = String>,
    {
        for email in emails {
            if !self.email.contains(&email) {
                self.email.push(email);
            }
        }
    }
}
