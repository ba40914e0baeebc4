use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use ugcfinder_core::ProfileRecord;
use uuid::Uuid;

use crate::error::SinkError;
use crate::traits::ResultSink;

/// Writes the result buffer as pretty JSON into a directory, one new file
/// per flush.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

/// `result-YYYYMMDD-<first 8 hex digits of id>.<extension>`
pub(crate) fn result_file_name(date: NaiveDate, id: Uuid, extension: &str) -> String {
    let hex = id.simple().to_string();
    format!("result-{}-{}.{extension}", date.format("%Y%m%d"), &hex[..8])
}

/// Creates `dir` if needed and writes `body` to a freshly named result file.
pub(crate) async fn write_result_file(
    dir: &Path,
    extension: &str,
    body: Vec<u8>,
) -> Result<PathBuf, SinkError> {
    let path = dir.join(result_file_name(
        Utc::now().date_naive(),
        Uuid::new_v4(),
        extension,
    ));

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| SinkError::Io {
            path: dir.display().to_string(),
            source,
        })?;
    tokio::fs::write(&path, body)
        .await
        .map_err(|source| SinkError::Io {
            path: path.display().to_string(),
            source,
        })?;
    Ok(path)
}

#[async_trait]
impl ResultSink for JsonFileSink {
    async fn flush(&self, profiles: &[ProfileRecord]) -> Result<(), SinkError> {
        let body = serde_json::to_vec_pretty(profiles)?;
        let path = write_result_file(&self.dir, "json", body).await?;
        tracing::info!(path = %path.display(), profiles = profiles.len(), "results saved");
        Ok(())
    }
}
