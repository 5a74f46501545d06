use clap::ArgMatches;
use revit_version_report::{
    api::DataManagementClient,
    commands::{
        PARAMETER_CONFIG, PARAMETER_ENV_FILE, PARAMETER_ID_COLUMN, PARAMETER_INPUT,
        PARAMETER_ON_ERROR, PARAMETER_OUTPUT,
    },
    configuration::Configuration,
    error::RunError,
    input::{read_project_ids_from_file, DEFAULT_ID_COLUMN},
    report::{build_report, write_report, ErrorPolicy, DEFAULT_REPORT_FILE_NAME},
    token_cache::SystemClock,
};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

pub async fn execute_command(matches: &ArgMatches) -> Result<(), RunError> {
    // clap enforces the input argument and supplies defaults for the rest
    let input = matches
        .get_one::<PathBuf>(PARAMETER_INPUT)
        .map(PathBuf::as_path)
        .unwrap_or_else(|| Path::new(""));
    let output = matches
        .get_one::<PathBuf>(PARAMETER_OUTPUT)
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_FILE_NAME));
    let id_column = matches
        .get_one::<String>(PARAMETER_ID_COLUMN)
        .map(String::as_str)
        .unwrap_or(DEFAULT_ID_COLUMN);
    let policy = matches
        .get_one::<String>(PARAMETER_ON_ERROR)
        .and_then(|s| ErrorPolicy::from_str(s).ok())
        .unwrap_or_default();

    let configuration = Configuration::load(
        matches.get_one::<PathBuf>(PARAMETER_CONFIG).map(PathBuf::as_path),
        matches.get_one::<PathBuf>(PARAMETER_ENV_FILE).map(PathBuf::as_path),
    )?;

    let project_ids = read_project_ids_from_file(input, id_column)?;
    info!(
        "Read {} project ids from {}",
        project_ids.len(),
        input.display()
    );

    let mut client = DataManagementClient::from_configuration(&configuration, Arc::new(SystemClock))?;
    let records = build_report(&mut client, &project_ids, policy).await?;
    write_report(&output, &records)?;

    Ok(())
}
