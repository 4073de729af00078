//! Per-request metrics log
//!
//! One delimiter-separated line per request, appended to a CSV-style
//! file. The header row is written when the file is first created.
//! Records are append-only and never rewritten; each append is a single
//! write of one complete line, serialized by a mutex so concurrent
//! requests cannot interleave records.

use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Field delimiter of the log format
pub const FIELD_DELIMITER: char = ';';

const HEADER: &str = "timestamp;time_ms_chords;time_ms_solo;info_chords;info_solo;size_bytes_chords;size_bytes_solo;size_bytes_response\n";

/// One row of the request log.
///
/// Created once per completed-or-failed request; fields for stages never
/// reached stay at their zero/empty defaults.
#[derive(Debug, Clone, Default)]
pub struct MetricsRecord {
    pub timestamp: String,
    pub time_ms_chords: u64,
    pub time_ms_solo: u64,
    pub info_chords: String,
    pub info_solo: String,
    pub size_bytes_chords: usize,
    pub size_bytes_solo: usize,
    pub size_bytes_response: usize,
}

impl MetricsRecord {
    /// Start a record stamped with the current UTC time.
    pub fn now() -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            ..Default::default()
        }
    }

    /// Render the record as one sanitized log line.
    fn to_line(&self) -> String {
        format!(
            "{};{};{};{};{};{};{};{}\n",
            sanitize(&self.timestamp),
            self.time_ms_chords,
            self.time_ms_solo,
            sanitize(&self.info_chords),
            sanitize(&self.info_solo),
            self.size_bytes_chords,
            self.size_bytes_solo,
            self.size_bytes_response,
        )
    }
}

/// Strip line breaks and replace the field delimiter with a comma, so
/// every record stays on one line with a fixed column count.
pub fn sanitize(field: &str) -> String {
    field
        .chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .map(|c| if c == FIELD_DELIMITER { ',' } else { c })
        .collect()
}

/// Append-only sink for request metrics
#[derive(Debug)]
pub struct MetricsLog {
    file: Mutex<tokio::fs::File>,
    path: PathBuf,
}

impl MetricsLog {
    /// Open the log file for appending, writing the header row if the
    /// file is new.
    pub async fn open(path: &Path) -> std::io::Result<Self> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;

        if file.metadata().await?.len() == 0 {
            file.write_all(HEADER.as_bytes()).await?;
            file.flush().await?;
        }

        Ok(Self {
            file: Mutex::new(file),
            path: path.to_path_buf(),
        })
    }

    /// Append one record as a single whole-line write.
    pub async fn append(&self, record: &MetricsRecord) -> std::io::Result<()> {
        let line = record.to_line();
        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
