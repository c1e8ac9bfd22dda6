// crates/tdf-cli/src/main.rs
// ============================================================================
// Module: TDF Harness CLI Entry Point
// Description: Command dispatcher for suite listing, checking, and runs.
// Purpose: Provide the `tdf-harness` command-line interface.
// Dependencies: clap, serde_jcs, serde_json, tdf-cli, tdf-config, tdf-core, thiserror
// ============================================================================

//! ## Overview
//! `tdf-harness` lists suites under a tests root, checks definition files
//! without running them, runs tests against the configured collaborators,
//! and validates configuration files. Machine-readable output is canonical
//! JSON on stdout; diagnostics go to stderr.
//!
//! Exit status is non-zero when a command fails, when a checked file does
//! not parse, or when any executed test fails.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use serde_json::Value;
use serde_json::json;
use tdf_cli::Harness;
use tdf_cli::Selection;
use tdf_cli::SystemClock;
use tdf_config::HarnessConfig;
use tdf_core::EventLog;
use tdf_core::LogLevel;
use tdf_core::RunSummary;
use tdf_core::StderrEventSink;
use tdf_core::load_suite;
use tdf_core::parse_test_file;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "tdf-harness", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List suite folders and their definition files.
    Suites(SuitesCommand),
    /// Parse definition files and print their tests.
    Check(CheckCommand),
    /// Execute tests and print the run summary.
    Run(RunCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for the `suites` command.
#[derive(Args, Debug)]
struct SuitesCommand {
    /// Tests root holding one folder per suite.
    #[arg(long, value_name = "DIR")]
    root: PathBuf,
    /// Definition file extension, without the dot.
    #[arg(long, value_name = "EXT", default_value = "tdf")]
    extension: String,
}

/// Arguments for the `check` command.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Definition files to parse.
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,
}

/// Arguments for the `run` command.
#[derive(Args, Debug)]
struct RunCommand {
    /// Optional config file path (defaults to tdf-harness.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Suite folder to run; repeat for several.
    #[arg(long = "suite", value_name = "NAME", conflicts_with = "files")]
    suites: Vec<String>,
    /// Definition files to run instead of suite folders.
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a harness configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for the `config validate` command.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to tdf-harness.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a printable message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("tdf-harness {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Suites(command) => command_suites(&command),
        Commands::Check(command) => command_check(&command),
        Commands::Run(command) => command_run(command),
        Commands::Config {
            command,
        } => command_config(&command),
    }
}

/// Prints CLI help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the `suites` command.
fn command_suites(command: &SuitesCommand) -> CliResult<ExitCode> {
    let log = stderr_log(LogLevel::Warn);
    let suite = load_suite(&command.root, &command.extension, &log)
        .map_err(|err| CliError::new(format!("failed to load suites: {err}")))?;
    write_json_value(&suite.available_suites())?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `check` command.
fn command_check(command: &CheckCommand) -> CliResult<ExitCode> {
    let mut rejected = 0_usize;
    for path in &command.files {
        match parse_test_file(path) {
            Ok(file) => {
                let tests: Vec<Value> = file.tests().iter().map(|test| test.describe()).collect();
                write_json_value(&json!({
                    "file": path.display().to_string(),
                    "tests": tests,
                }))?;
            }
            Err(err) => {
                rejected += 1;
                write_stderr_line(&format!("{}: {err}", path.display()))
                    .map_err(|err| CliError::new(output_error("stderr", &err)))?;
            }
        }
    }
    Ok(if rejected == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Executes the `run` command.
fn command_run(command: RunCommand) -> CliResult<ExitCode> {
    let config = HarnessConfig::load_optional(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?
        .unwrap_or_default();
    let harness = Harness::build(config)
        .map_err(|err| CliError::new(format!("failed to start harness: {err}")))?;
    let selection = Selection::from_args(command.suites, command.files);
    let summary = harness.run(&selection).map_err(|err| CliError::new(err.to_string()))?;
    write_json_value(&summary_json(&summary)?)?;
    Ok(if summary.all_passed() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = HarnessConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Renders a run summary with its totals.
fn summary_json(summary: &RunSummary) -> CliResult<Value> {
    let outcomes = serde_json::to_value(&summary.outcomes)
        .map_err(|err| CliError::new(format!("failed to render run summary: {err}")))?;
    Ok(json!({
        "total": summary.total(),
        "passed": summary.passed(),
        "failed": summary.failed(),
        "outcomes": outcomes,
    }))
}

/// Builds an event log writing to stderr.
fn stderr_log(level: LogLevel) -> EventLog {
    EventLog::new(Arc::new(StderrEventSink), Arc::new(SystemClock), level)
}

/// Writes a JSON value to stdout in canonical form.
fn write_json_value(value: &Value) -> CliResult<()> {
    let mut bytes = serde_jcs::to_vec(value)
        .map_err(|err| CliError::new(format!("failed to render json: {err}")))?;
    bytes.push(b'\n');
    let mut stdout = std::io::stdout();
    stdout.write_all(&bytes).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
