//! Spreadsheet output: one row per profile under a bold header row.

use std::path::PathBuf;

use async_trait::async_trait;
use rust_xlsxwriter::{Format, Workbook};
use ugcfinder_core::ProfileRecord;

use crate::error::SinkError;
use crate::sink::write_result_file;
use crate::traits::ResultSink;

const HEADERS: [&str; 9] = [
    "Name",
    "Signature",
    "Unique ID",
    "Follower Count",
    "Gender",
    "Average Play",
    "Average Interaction Rate",
    "Email(s)",
    "Latest Video Time",
];

/// Writes the result buffer as an `.xlsx` workbook into a directory. The
/// unique-id cell links to the creator's profile page.
#[derive(Debug, Clone)]
pub struct XlsxFileSink {
    dir: PathBuf,
    profile_base_url: String,
}

impl XlsxFileSink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, profile_base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            profile_base_url: profile_base_url.into(),
        }
    }

    fn profile_link(&self, unique_id: &str) -> String {
        format!(
            "{}/@{unique_id}",
            self.profile_base_url.trim_end_matches('/')
        )
    }

    pub(crate) fn render(&self, profiles: &[ProfileRecord]) -> Result<Vec<u8>, SinkError> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Sheet1")?;

        let bold = Format::new().set_bold();
        let ratio = Format::new().set_num_format("0.0000");
        sheet.set_row_format(0, &bold)?;
        for (col, header) in (0u16..).zip(HEADERS) {
            sheet.write_string_with_format(0, col, header, &bold)?;
        }

        for (i, record) in profiles.iter().enumerate() {
            let row = u32::try_from(i + 1).map_err(|_| SinkError::TooManyRows(profiles.len()))?;
            sheet.write_string(row, 0, &record.name)?;
            sheet.write_string(row, 1, &record.signature)?;
            sheet.write_url_with_text(
                row,
                2,
                self.profile_link(&record.unique_id).as_str(),
                &record.unique_id,
            )?;
            #[allow(clippy::cast_precision_loss)]
            sheet.write_number(row, 3, record.follower_count as f64)?;
            sheet.write_string(row, 4, &record.gender)?;
            #[allow(clippy::cast_precision_loss)]
            sheet.write_number(row, 5, record.ap as f64)?;
            sheet.write_number_with_format(row, 6, record.ai, &ratio)?;
            sheet.write_string(row, 7, email_cell(record))?;
            sheet.write_string(row, 8, date_cell(record))?;
        }

        Ok(workbook.save_to_buffer()?)
    }
}

fn email_cell(record: &ProfileRecord) -> String {
    record.email.join(" ")
}

fn date_cell(record: &ProfileRecord) -> String {
    record.latest_video_time.format("%Y/%m/%d").to_string()
}

#[async_trait]
impl ResultSink for XlsxFileSink {
    async fn flush(&self, profiles: &[ProfileRecord]) -> Result<(), SinkError> {
        let body = self.render(profiles)?;
        let path = write_result_file(&self.dir, "xlsx", body).await?;
        tracing::info!(path = %path.display(), profiles = profiles.len(), "results saved");
        Ok(())
    }
}
