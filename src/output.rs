//! Output writing and report naming

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use log::info;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{ReportError, ReportResult};
use crate::unicode_utils::fold_accents;

const MISSING_SUPERVISOR: &str = "Sin_Supervisor";

/// Destination for finished reports
pub trait OutputSink: Send + Sync {
    /// Store `bytes` under `file_name`, returning where they ended up
    fn write(&self, file_name: &str, bytes: &[u8]) -> ReportResult<PathBuf>;
}

/// Writes reports into a directory
///
/// Bytes go to a temporary file in the target directory that is renamed
/// into place once complete, so readers never see a partial report.
#[derive(Debug, Clone)]
pub struct FileSystemOutput {
    dir: PathBuf,
}

impl FileSystemOutput {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl OutputSink for FileSystemOutput {
    fn write(&self, file_name: &str, bytes: &[u8]) -> ReportResult<PathBuf> {
        let path = self.dir.join(file_name);
        let write_error = |reason: String| ReportError::OutputWrite {
            path: path.display().to_string(),
            reason,
        };

        std::fs::create_dir_all(&self.dir).map_err(|e| {
            write_error(format!("failed to create directory {}: {}", self.dir.display(), e))
        })?;

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| write_error(e.to_string()))?;
        tmp.write_all(bytes).map_err(|e| write_error(e.to_string()))?;
        tmp.as_file().sync_all().map_err(|e| write_error(e.to_string()))?;
        tmp.persist(&path).map_err(|e| write_error(e.error.to_string()))?;

        info!("Report saved to: {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

/// Keeps reports in memory; handy for hosts that upload the bytes themselves
#[derive(Debug, Default)]
pub struct MemoryOutput {
    files: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names and contents written so far
    pub fn files(&self) -> Vec<(String, Vec<u8>)> {
        self.files.lock().map(|files| files.clone()).unwrap_or_default()
    }
}

impl OutputSink for MemoryOutput {
    fn write(&self, file_name: &str, bytes: &[u8]) -> ReportResult<PathBuf> {
        let mut files = self.files.lock().map_err(|_| ReportError::OutputWrite {
            path: file_name.to_string(),
            reason: "output buffer lock poisoned".to_string(),
        })?;
        files.push((file_name.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(file_name))
    }
}

/// Metadata handed to the report history store after a successful write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub title: String,
    pub supervisor: String,
    pub date: String,
    pub path: PathBuf,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
}

/// `Reporte_CFE_<yyyyMMdd_HHmm>_Supervisor_<name>_<NN>.pdf`
///
/// `NN` is the last two digits of the millisecond clock, which keeps names
/// apart when several reports are produced within the same minute.
pub fn build_file_name(supervisor: &str, now: DateTime<Local>) -> String {
    format!(
        "Reporte_CFE_{}_Supervisor_{}_{:02}.pdf",
        now.format("%Y%m%d_%H%M"),
        sanitize_supervisor_name(supervisor),
        now.timestamp_millis().rem_euclid(100)
    )
}

/// Reduce a person's name to `[A-Za-z0-9_-]`
///
/// Every whitespace run becomes one `_`, including leading and trailing
/// runs. Only an empty name falls back to `Sin_Supervisor`.
pub fn sanitize_supervisor_name(name: &str) -> String {
    if name.is_empty() {
        return MISSING_SUPERVISOR.to_string();
    }
    let mut sanitized = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for ch in fold_accents(name).chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                sanitized.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
            sanitized.push(ch);
        }
    }
    sanitized
}
