use revit_version_report::commands::{create_cli_commands, PARAMETER_VERBOSE};
use tracing_subscriber::EnvFilter;

mod cli;
use cli::execute_command;

/// Main entry point for the program
#[tokio::main]
async fn main() {
    let matches = create_cli_commands();

    // Intialize the logging subsystem; RUST_LOG wins over --verbose
    let default_level = if matches.get_flag(PARAMETER_VERBOSE) {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = execute_command(&matches).await {
        let code = e.exit_code();
        eprintln!("ERROR: {}", e);
        tracing::debug!("Exiting with {} ({})", code.code(), code.message());
        ::std::process::exit(code.code());
    }
}
