//! Timestamped CSV persistence for evaluation runs

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;

use crate::model::EvaluationRecord;

/// Report file name prefix; the timestamp makes each run's file unique
const REPORT_FILE_PREFIX: &str = "faithfulness_";

/// Error type for report persistence
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write report row: {0}")]
    Csv(#[from] csv::Error),
}

/// Write one run's records into `results_dir` as a timestamped CSV.
///
/// The header row comes from the record's field names, so the column
/// order is fixed by `EvaluationRecord`. Returns the path written.
pub fn write_report(
    results_dir: &Path,
    records: &[EvaluationRecord],
) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(results_dir)?;

    let file_name = format!(
        "{REPORT_FILE_PREFIX}{}.csv",
        Utc::now().format("%Y%m%d_%H%M%S")
    );
    let path = results_dir.join(file_name);

    let mut writer = csv::Writer::from_path(&path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    tracing::info!(rows = records.len(), path = %path.display(), "Saved faithfulness report");
    Ok(path)
}
