use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::record::{header_row, LogRecord};
use crate::config::LogConfig;
use crate::scoring::Prediction;

/// Default log file name, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "nhl_live_predictions.csv";

/// Append-only CSV log of predictions.
///
/// Assumes a single writer: the header check and the row write are not
/// guarded against another process appending at the same time.
#[derive(Debug, Clone)]
pub struct ResultLog {
    path: PathBuf,
    tier_column: bool,
}

impl ResultLog {
    pub fn new(path: impl Into<PathBuf>, tier_column: bool) -> Self {
        Self {
            path: path.into(),
            tier_column,
        }
    }

    pub fn from_config(config: &LogConfig) -> Self {
        Self::new(&config.path, config.tier_column)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tier_column(&self) -> bool {
        self.tier_column
    }

    /// Append one row, writing the header first if the file is new or empty.
    pub fn append(&self, prediction: &Prediction) -> Result<LogRecord> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log directory at {}", parent.display())
                })?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open prediction log at {}", self.path.display()))?;

        let is_empty = file
            .metadata()
            .with_context(|| format!("Failed to stat prediction log at {}", self.path.display()))?
            .len()
            == 0;

        let record = LogRecord::from_prediction(prediction);
        let mut buf = String::new();
        if is_empty {
            buf.push_str(&header_row(self.tier_column));
            buf.push('\n');
        }
        buf.push_str(&record.to_row(self.tier_column));
        buf.push('\n');

        // Header and row go out in one write so a row is never split.
        file.write_all(buf.as_bytes())
            .with_context(|| format!("Failed to write prediction log at {}", self.path.display()))?;

        tracing::info!(
            path = %self.path.display(),
            period = record.period.number(),
            probability = record.probability,
            header = is_empty,
            "appended prediction"
        );

        Ok(record)
    }

    /// Last `n` raw lines of the log, header included when the file is short.
    ///
    /// Returns `None` if the log has not been created yet.
    pub fn last(&self, n: usize) -> Result<Option<Vec<String>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read prediction log at {}", self.path.display()))?;

        let lines: Vec<&str> = content.lines().collect();
        let start = lines.len().saturating_sub(n);
        Ok(Some(lines[start..].iter().map(|l| l.to_string()).collect()))
    }

    /// Parsed data rows, skipping the header.
    pub fn records(&self) -> Result<Vec<LogRecord>> {
        let Some(lines) = self.last(usize::MAX)? else {
            return Ok(Vec::new());
        };

        lines
            .iter()
            .enumerate()
            .filter(|(i, line)| !(*i == 0 && line.starts_with("Period")))
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                LogRecord::parse_row(line)
                    .with_context(|| format!("Malformed row {} in {}", i + 1, self.path.display()))
            })
            .collect()
    }
}
