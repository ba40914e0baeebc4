use serde::Deserialize;

/// Engagement counters for a single video, as reported by the stats API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoStat {
    /// Unix timestamp (seconds) the video was posted.
    pub created_time: i64,
    pub play_count: u64,
    pub digg_count: u64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub(crate) struct ApiStatistics {
    #[serde(default)]
    pub digg_count: u64,
    #[serde(default)]
    pub play_count: u64,
}

/// Raw `/api?url=...` response body.
///
/// Every field defaults to zero so that the service's "busy" reply (`{}` or
/// all zeros) parses and can be told apart from a real answer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub(crate) struct ApiResult {
    #[serde(default)]
    pub create_time: i64,
    #[serde(default)]
    pub statistics: ApiStatistics,
}

impl ApiResult {
    pub(crate) fn is_empty(&self) -> bool {
        *self == ApiResult::default()
    }
}

impl From<ApiResult> for VideoStat {
    fn from(res: ApiResult) -> Self {
        Self {
            created_time: res.create_time,
            play_count: res.statistics.play_count,
            digg_count: res.statistics.digg_count,
        }
    }
}
