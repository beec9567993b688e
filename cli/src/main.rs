//! devport CLI - Manage a local development server
//!
//! Starts the dev server on the first free port of its range, stops it
//! (including strays bound inside the range), restarts it, and reports
//! whether it is running.

mod console;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use devport_core::{ConfigStore, LifecycleCommand, ProjectController, Reporter};
use tracing_subscriber::EnvFilter;

use crate::console::ConsoleReporter;

#[derive(Parser)]
#[command(name = "devport")]
#[command(author, version, about = "Manage a local development server")]
struct Cli {
    /// Command to run: start, stop, restart or status (default: start)
    command: Option<String>,

    /// Project directory (default: current directory)
    #[arg(short = 'C', long, env = "DEVPORT_PROJECT_DIR")]
    project_dir: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if is_informational(&e) => e.exit(),
        Err(e) => {
            // Unrecognized input exits 1 like an unknown command, not clap's 2
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };
    init_tracing(cli.verbose);

    let reporter = ConsoleReporter::detect();

    let command = match cli.command.as_deref() {
        None => LifecycleCommand::default(),
        Some(name) => match name.parse::<LifecycleCommand>() {
            Ok(command) => command,
            Err(e) => {
                reporter.error(&e.to_string());
                reporter.info(&format!(
                    "Available commands: {}",
                    LifecycleCommand::available()
                ));
                return ExitCode::FAILURE;
            }
        },
    };

    match run(command, cli.project_dir, reporter).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            reporter.error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

/// `--help` and `--version` keep clap's own output and exit status.
fn is_informational(err: &clap::Error) -> bool {
    matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

async fn run(
    command: LifecycleCommand,
    project_dir: Option<PathBuf>,
    reporter: ConsoleReporter,
) -> anyhow::Result<bool> {
    let dir = match project_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    let dir = std::fs::canonicalize(&dir)
        .with_context(|| format!("Project directory {} not found", dir.display()))?;

    let project = ConfigStore::new(&dir)
        .load()
        .await
        .context("Failed to load project configuration")?;
    tracing::debug!(command = %command, dir = %dir.display(), "Dispatching");

    let controller = ProjectController::system(project, reporter);
    Ok(controller.run(command).await)
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_command_is_optional() {
        let cli = Cli::try_parse_from(["devport"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["devport", "STATUS", "-C", "/tmp"]).unwrap();
        assert_eq!(cli.command.as_deref(), Some("STATUS"));
        assert_eq!(cli.project_dir, Some(PathBuf::from("/tmp")));
    }

    #[test]
    fn test_unrecognized_arguments_are_failures() {
        let err = Cli::try_parse_from(["devport", "start", "extra"]).err().unwrap();
        assert!(!is_informational(&err));

        let err = Cli::try_parse_from(["devport", "--bogus"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert!(!is_informational(&err));
    }

    #[test]
    fn test_help_and_version_keep_clap_exit() {
        let err = Cli::try_parse_from(["devport", "--help"]).err().unwrap();
        assert!(is_informational(&err));

        let err = Cli::try_parse_from(["devport", "--version"]).err().unwrap();
        assert!(is_informational(&err));
    }
}
