//! Reading the list of project ids from CSV.

use std::fmt;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

pub const PROJECT_ID_PREFIX: &str = "b.";
pub const DEFAULT_ID_COLUMN: &str = "id";

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Cannot read {path}: {cause}")]
    Io {
        path: String,
        cause: std::io::Error,
    },
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("CSV input has no {0:?} column")]
    MissingColumn(String),
}

/// A project id as used by the data-management API, with the `b.` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectId(String);

impl ProjectId {
    /// Prefix a raw id from the input with `b.`.
    pub fn from_raw(raw: &str) -> Self {
        ProjectId(format!("{}{}", PROJECT_ID_PREFIX, raw.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn read_project_ids<R: Read>(reader: R, column: &str) -> Result<Vec<ProjectId>, InputError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let index = rdr
        .headers()?
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == column)
        .ok_or_else(|| InputError::MissingColumn(column.to_string()))?;

    let mut ids = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        match record.get(index).filter(|v| !v.is_empty()) {
            Some(raw) => ids.push(ProjectId::from_raw(raw)),
            None => warn!("Skipping row {} without a project id", row + 2),
        }
    }
    Ok(ids)
}

pub fn read_project_ids_from_file(path: &Path, column: &str) -> Result<Vec<ProjectId>, InputError> {
    let file = std::fs::File::open(path).map_err(|cause| InputError::Io {
        path: path.display().to_string(),
        cause,
    })?;
    read_project_ids(file, column)
}
