mod commands;
mod helpers;

use clap::Parser;
use rmatrix_core::domain::ReconstructionError;
use tracing_subscriber::EnvFilter;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(args) {
        Ok(code) => code,
        Err(error) => {
            let reconstruction_error = error.as_reconstruction_error();
            eprintln!("{}", reconstruction_error.diagnostic_line());
            eprintln!("{}", reconstruction_error.exit_line());
            reconstruction_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("rmatrix-rs".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            init_logging(cli.log_level.as_deref());
            dispatch_parsed(cli.command)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

/// Logs go to stderr so that tables on stdout stay machine readable.
/// `--log-level` wins over `RUST_LOG`; without either only warnings are shown.
fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new("warn"));

    // A subscriber may already be installed when the driver runs in-process.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser)]
#[command(
    name = "rmatrix-rs",
    about = "R-matrix resonance cross-section reconstruction"
)]
struct Cli {
    /// Tracing filter directive, e.g. `debug` or `rmatrix_core=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Evaluate cross sections of a resonance record
    Evaluate(commands::EvaluateArgs),
    /// Print the energy grid resolving the resonances of a record
    Grid(commands::GridArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Evaluate(args) => commands::run_evaluate_command(args),
        CliCommand::Grid(args) => commands::run_grid_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(ReconstructionError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_reconstruction_error(&self) -> ReconstructionError {
        match self {
            Self::Usage(message) => {
                ReconstructionError::input("INPUT.CLI_USAGE", message.clone())
            }
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => {
                ReconstructionError::io("IO.CLI", format!("{error:#}"))
            }
        }
    }
}

impl From<ReconstructionError> for CliError {
    fn from(error: ReconstructionError) -> Self {
        Self::Compute(error)
    }
}
