//! Command line definition.

use crate::input::DEFAULT_ID_COLUMN;
use crate::report::{ErrorPolicy, DEFAULT_REPORT_FILE_NAME};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

pub const PARAMETER_INPUT: &str = "input";
pub const PARAMETER_OUTPUT: &str = "output";
pub const PARAMETER_ID_COLUMN: &str = "id-column";
pub const PARAMETER_ON_ERROR: &str = "on-error";
pub const PARAMETER_CONFIG: &str = "config";
pub const PARAMETER_ENV_FILE: &str = "env-file";
pub const PARAMETER_VERBOSE: &str = "verbose";

pub fn create_cli_command() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg_required_else_help(true)
        .arg(
            Arg::new(PARAMETER_INPUT)
                .required(true)
                .value_name("CSV")
                .help("CSV file with one project per row")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(PARAMETER_OUTPUT)
                .short('o')
                .long(PARAMETER_OUTPUT)
                .num_args(1)
                .default_value(DEFAULT_REPORT_FILE_NAME)
                .help("Path of the JSON report")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(PARAMETER_ID_COLUMN)
                .long(PARAMETER_ID_COLUMN)
                .num_args(1)
                .default_value(DEFAULT_ID_COLUMN)
                .help("Name of the CSV column holding the project id"),
        )
        .arg(
            Arg::new(PARAMETER_ON_ERROR)
                .long(PARAMETER_ON_ERROR)
                .num_args(1)
                .default_value("abort")
                .help("Abort the run on the first failed request, or record it and continue")
                .value_parser(ErrorPolicy::names()),
        )
        .arg(
            Arg::new(PARAMETER_CONFIG)
                .short('c')
                .long(PARAMETER_CONFIG)
                .num_args(1)
                .help("YAML configuration file; environment variables take precedence")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(PARAMETER_ENV_FILE)
                .long(PARAMETER_ENV_FILE)
                .num_args(1)
                .help("Dotenv file to load instead of ./.env")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(PARAMETER_VERBOSE)
                .short('v')
                .long(PARAMETER_VERBOSE)
                .action(ArgAction::SetTrue)
                .help("Enable verbose output for debugging"),
        )
}

pub fn create_cli_commands() -> ArgMatches {
    create_cli_command().get_matches()
}
