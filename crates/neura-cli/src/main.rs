// crates/neura-cli/src/main.rs
// ============================================================================
// Module: Neura CLI Entry Point
// Description: Command dispatcher for Neura decision, memory, and auth calls.
// Purpose: Expose every client operation from the shell with JSON in and out.
// Dependencies: clap, neura-client, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The `neura` binary resolves configuration once (file, then environment
//! fallbacks, then command-line overrides), builds a [`NeuraClient`], and runs
//! one subcommand. Request payloads are read as JSON from a file or stdin;
//! results are written to stdout as pretty JSON. Errors go to stderr with exit
//! code 1, or 2 when a decision wait times out.
//! Security posture: API keys are never accepted as arguments; supply them via
//! config file or `NEURA_API_KEY`.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use neura_client::AuthRequest;
use neura_client::ClientConfig;
use neura_client::ClientError;
use neura_client::ConfigError;
use neura_client::DecisionId;
use neura_client::DecisionRequest;
use neura_client::FileEventSink;
use neura_client::MemoryRequest;
use neura_client::MemorySearchRequest;
use neura_client::NeuraClient;
use neura_client::PollConfig;
use neura_client::StderrEventSink;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum request payload size read from a file or stdin.
const MAX_INPUT_BYTES: usize = 1024 * 1024;
/// Input path that selects stdin.
const STDIN_PATH: &str = "-";
/// Exit code used when a decision wait times out.
const EXIT_TIMEOUT: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "neura", version, disable_help_subcommand = true)]
struct Cli {
    /// Config file path (defaults to `NEURA_CONFIG`, then ./neura.toml if present).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Service endpoint override.
    #[arg(long, value_name = "URL", global = true)]
    endpoint: Option<String>,
    /// Emit request and poll events as JSON lines on stderr.
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    log_json: bool,
    /// Append request and poll events as JSON lines to a file.
    #[arg(long, value_name = "PATH", global = true, conflicts_with = "log_json")]
    log_file: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Submit a decision request.
    Decide(DecideCommand),
    /// Dry-run a decision request.
    Validate(InputArgs),
    /// Fetch the current state of a decision.
    Get(GetCommand),
    /// Poll a decision until it is ACT or DENY.
    Wait(WaitCommand),
    /// Memory storage utilities.
    Memory {
        /// Selected memory subcommand.
        #[command(subcommand)]
        command: MemoryCommand,
    },
    /// Credential utilities.
    Auth {
        /// Selected auth subcommand.
        #[command(subcommand)]
        command: AuthCommand,
    },
}

/// JSON payload input.
#[derive(Args, Debug)]
struct InputArgs {
    /// JSON payload file, or `-` for stdin.
    #[arg(long, value_name = "PATH")]
    input: String,
}

/// Configuration for the `decide` command.
#[derive(Args, Debug)]
struct DecideCommand {
    /// Payload input.
    #[command(flatten)]
    input: InputArgs,
    /// Wait for a terminal outcome when the submission is still pending.
    #[arg(long, action = ArgAction::SetTrue)]
    wait: bool,
    /// Wait options.
    #[command(flatten)]
    poll: PollArgs,
}

/// Configuration for the `get` command.
#[derive(Args, Debug)]
struct GetCommand {
    /// Decision identifier.
    id: String,
}

/// Configuration for the `wait` command.
#[derive(Args, Debug)]
struct WaitCommand {
    /// Decision identifier.
    id: String,
    /// Wait options.
    #[command(flatten)]
    poll: PollArgs,
}

/// Poll budget overrides.
#[derive(Args, Debug, Clone, Copy)]
struct PollArgs {
    /// Total wait budget in milliseconds (negative values mean no wait).
    #[arg(long, value_name = "MS", allow_negative_numbers = true)]
    timeout_ms: Option<i64>,
    /// Interval between polls in milliseconds.
    #[arg(long, value_name = "MS", allow_negative_numbers = true)]
    interval_ms: Option<i64>,
}

/// Memory subcommands.
#[derive(Subcommand, Debug)]
enum MemoryCommand {
    /// Store a memory.
    Store(InputArgs),
    /// Search stored memories.
    Search(InputArgs),
}

/// Auth subcommands.
#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Register a new credential.
    Register(InputArgs),
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI errors.
#[derive(Debug, Error)]
enum CliError {
    /// Client operation failed.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Input payload could not be read.
    #[error("failed to read input {path}: {error}")]
    InputRead {
        /// Input path label.
        path: String,
        /// Underlying error.
        error: String,
    },
    /// Input payload exceeds the size limit.
    #[error("input exceeds size limit ({limit} bytes)")]
    InputTooLarge {
        /// Maximum size in bytes.
        limit: usize,
    },
    /// Input payload is not valid for the command.
    #[error("invalid input json: {0}")]
    InputJson(String),
    /// Event log could not be opened.
    #[error("failed to open event log {path}: {error}")]
    EventLog {
        /// Event log path.
        path: String,
        /// Underlying error.
        error: String,
    },
    /// Output could not be written.
    #[error("failed to write output: {0}")]
    Output(String),
}

impl CliError {
    /// Maps the error to a process exit code.
    fn exit_code(&self) -> ExitCode {
        match self {
            Self::Client(err) if err.is_timeout() => ExitCode::from(EXIT_TIMEOUT),
            _ => ExitCode::FAILURE,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Runs the CLI and maps failures to exit codes.
fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = writeln!(std::io::stderr(), "neura: {err}");
            err.exit_code()
        }
    }
}

/// Executes the CLI command dispatcher.
fn run(cli: Cli) -> CliResult<()> {
    let config = resolve_config(cli.config.as_deref(), cli.endpoint.as_deref())?;
    let client = attach_event_sink(NeuraClient::new(config)?, cli.log_json, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Decide(command) => command_decide(&client, &command),
        Commands::Validate(input) => {
            let request: DecisionRequest = read_input(&input.input)?;
            write_json(&client.validate(&request)?)
        }
        Commands::Get(command) => write_json(&client.get_decision(&DecisionId::new(command.id))?),
        Commands::Wait(command) => {
            let poll = poll_config(&client, command.poll);
            write_json(&client.wait_for_decision_with(&DecisionId::new(command.id), poll)?)
        }
        Commands::Memory {
            command,
        } => command_memory(&client, &command),
        Commands::Auth {
            command: AuthCommand::Register(input),
        } => {
            let request: AuthRequest = read_input(&input.input)?;
            write_json(&client.auth().register(&request)?)
        }
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Runs `decide`, optionally waiting for a terminal outcome.
fn command_decide(client: &NeuraClient, command: &DecideCommand) -> CliResult<()> {
    let request: DecisionRequest = read_input(&command.input.input)?;
    let record = if command.wait {
        client.decide_and_wait(&request, poll_config(client, command.poll))?
    } else {
        client.decide(&request)?
    };
    write_json(&record)
}

/// Runs memory subcommands.
fn command_memory(client: &NeuraClient, command: &MemoryCommand) -> CliResult<()> {
    match command {
        MemoryCommand::Store(input) => {
            let request: MemoryRequest = read_input(&input.input)?;
            write_json(&client.memory().store(&request)?)
        }
        MemoryCommand::Search(input) => {
            let request: MemorySearchRequest = read_input(&input.input)?;
            write_json(&client.memory().search(&request)?)
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves configuration: file, then environment fallbacks, then overrides.
fn resolve_config(path: Option<&Path>, endpoint: Option<&str>) -> CliResult<ClientConfig> {
    let mut config = ClientConfig::discover(path)?.resolve_from_env();
    if let Some(endpoint) = endpoint {
        config.endpoint = Some(endpoint.to_string());
    }
    Ok(config)
}

/// Installs the requested event sink.
fn attach_event_sink(
    client: NeuraClient,
    log_json: bool,
    log_file: Option<&Path>,
) -> CliResult<NeuraClient> {
    if let Some(path) = log_file {
        let sink = FileEventSink::new(path).map_err(|err| CliError::EventLog {
            path: path.display().to_string(),
            error: err.to_string(),
        })?;
        return Ok(client.with_event_sink(Arc::new(sink)));
    }
    if log_json {
        return Ok(client.with_event_sink(Arc::new(StderrEventSink)));
    }
    Ok(client)
}

/// Merges poll overrides onto the client's configured defaults.
fn poll_config(client: &NeuraClient, args: PollArgs) -> PollConfig {
    let defaults = client.default_poll_config();
    let timeout_ms = args.timeout_ms.unwrap_or_else(|| duration_ms(defaults.timeout));
    let interval_ms = args.interval_ms.unwrap_or_else(|| duration_ms(defaults.interval));
    PollConfig::from_millis(timeout_ms, interval_ms)
}

/// Converts a duration to signed milliseconds, saturating.
fn duration_ms(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

/// Reads and decodes a JSON payload from a file or stdin.
fn read_input<T: DeserializeOwned>(path: &str) -> CliResult<T> {
    let bytes = if path == STDIN_PATH {
        read_limited(std::io::stdin().lock(), path)?
    } else {
        let file = fs::File::open(path).map_err(|err| CliError::InputRead {
            path: path.to_string(),
            error: err.to_string(),
        })?;
        read_limited(file, path)?
    };
    serde_json::from_slice(&bytes).map_err(|err| CliError::InputJson(err.to_string()))
}

/// Reads at most [`MAX_INPUT_BYTES`] from `reader`.
fn read_limited<R: Read>(reader: R, path: &str) -> CliResult<Vec<u8>> {
    let limit = u64::try_from(MAX_INPUT_BYTES).unwrap_or(u64::MAX).saturating_add(1);
    let mut bytes = Vec::new();
    reader.take(limit).read_to_end(&mut bytes).map_err(|err| CliError::InputRead {
        path: path.to_string(),
        error: err.to_string(),
    })?;
    if bytes.len() > MAX_INPUT_BYTES {
        return Err(CliError::InputTooLarge {
            limit: MAX_INPUT_BYTES,
        });
    }
    Ok(bytes)
}

/// Writes a value to stdout as pretty JSON.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered =
        serde_json::to_string_pretty(value).map_err(|err| CliError::Output(err.to_string()))?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}").map_err(|err| CliError::Output(err.to_string()))
}
