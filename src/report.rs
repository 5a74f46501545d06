//! Builds the per-project report and writes it as JSON.

use crate::api::{ClientError, DataManagementClient};
use crate::input::ProjectId;
use crate::model::RevitMatch;
use crate::search::find_first_revit_match;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const PROJECT_FILES_FOLDER: &str = "Project Files";
pub const DEFAULT_REPORT_FILE_NAME: &str = "revit_data.json";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{0}")]
    ClientError(#[from] ClientError),
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Failed to write report to {path}: {cause}")]
    WriteError {
        path: String,
        cause: std::io::Error,
    },
}

/// What to do when a request for one project fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop the whole run on the first failure.
    #[default]
    Abort,
    /// Record the failure on the project's line and carry on.
    Skip,
}

impl ErrorPolicy {
    pub fn names() -> Vec<&'static str> {
        use strum::IntoEnumIterator;
        ErrorPolicy::iter().map(|p| p.into()).collect()
    }
}

/// Look up one project. A failure carries whatever project name was resolved
/// before it, empty when the project itself could not be fetched.
async fn lookup_project(
    client: &mut DataManagementClient,
    project_id: &ProjectId,
) -> Result<RevitMatch, (String, ClientError)> {
    let project = client
        .get_project(project_id.as_str())
        .await
        .map_err(|e| (String::new(), e))?;
    let project_name = project.name().to_string();
    let with_name = |e: ClientError| (project_name.clone(), e);

    let top_folders = client
        .get_top_folders(project_id.as_str())
        .await
        .map_err(with_name)?;
    let Some(project_files) = top_folders
        .iter()
        .find(|folder| folder.is_folder() && folder.display_name() == PROJECT_FILES_FOLDER)
    else {
        debug!("Project {} has no \"{}\" folder", project_id, PROJECT_FILES_FOLDER);
        return Ok(RevitMatch::not_found(project_id.as_str(), project_name.as_str()));
    };

    let found = find_first_revit_match(
        client,
        project_id.as_str(),
        project_name.as_str(),
        &project_files.id,
    )
    .await
    .map_err(with_name)?;
    Ok(found.unwrap_or_else(|| RevitMatch::not_found(project_id.as_str(), project_name.as_str())))
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    )
    .map(|style| style.progress_chars("#>-"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

/// One record per project id, in input order.
pub async fn build_report(
    client: &mut DataManagementClient,
    project_ids: &[ProjectId],
    policy: ErrorPolicy,
) -> Result<Vec<RevitMatch>, ReportError> {
    let pb = progress_bar(project_ids.len());
    let mut records = Vec::with_capacity(project_ids.len());

    for project_id in project_ids {
        pb.set_message(project_id.to_string());
        let record = match lookup_project(client, project_id).await {
            Ok(record) => record,
            Err((project_name, e)) => match policy {
                ErrorPolicy::Abort => {
                    pb.abandon();
                    return Err(e.into());
                }
                ErrorPolicy::Skip => {
                    warn!("Skipping project {}: {}", project_id, e);
                    RevitMatch::failed(project_id.as_str(), project_name, e.to_string())
                }
            },
        };

        info!(
            "Added to report: {} ({}) -> {}",
            record.project_id,
            record.project_name,
            if record.is_found() { record.file_name.as_str() } else { "no Revit file" }
        );
        records.push(record);
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(records)
}

/// Pretty JSON with four-space indentation.
pub fn to_json(records: &[RevitMatch]) -> Result<String, ReportError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut ser)?;
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write the report through a temporary file in the target directory, then
/// move it into place.
pub fn write_report(path: &Path, records: &[RevitMatch]) -> Result<(), ReportError> {
    let json = to_json(records)?;
    let write_error = |cause: std::io::Error| ReportError::WriteError {
        path: path.display().to_string(),
        cause,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(write_error)?;
    file.write_all(json.as_bytes()).map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;

    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}
