// SquareSum CLI - magic-square puzzle client
// Talks to the remote solver service; see squaresum-protocol for the wire contract.

mod exit_codes;
mod jobs;
mod puzzle_ops;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use squaresum_client::ClientError;
use squaresum_config::Settings;
use squaresum_core::ValidationError;
use squaresum_protocol::{CountMode, GameMode};

use exit_codes::{EXIT_JOB_FAILED, EXIT_NETWORK, EXIT_SERVICE, EXIT_SUCCESS, EXIT_USAGE};

/// Command failure carrying its exit code.
pub struct CliError {
    pub code: u8,
    pub message: String,
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        Self { code: EXIT_USAGE, message: err.to_string() }
    }
}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        let code = match &err {
            ClientError::Network(_) | ClientError::Parse(_) => EXIT_NETWORK,
            ClientError::Http(..) | ClientError::Service(_) => EXIT_SERVICE,
            ClientError::InvalidRequest(_) => EXIT_USAGE,
            ClientError::Superseded => EXIT_JOB_FAILED,
        };
        Self { code, message: err.to_string() }
    }
}

#[derive(Parser)]
#[command(name = "sqsum")]
#[command(about = "Magic-square puzzle client (solve and count via the remote service)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Auto,
    Exact,
    Estimate,
}

impl From<ModeArg> for CountMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Auto => CountMode::Auto,
            ModeArg::Exact => CountMode::Exact,
            ModeArg::Estimate => CountMode::Estimate,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GameModeArg {
    Unbounded,
    BoundedBySizeSquared,
}

impl From<GameModeArg> for GameMode {
    fn from(mode: GameModeArg) -> Self {
        match mode {
            GameModeArg::Unbounded => GameMode::Unbounded,
            GameModeArg::BoundedBySizeSquared => GameMode::BoundedBySizeSquared,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check a puzzle file without contacting the service
    Validate {
        /// Path to a puzzle JSON file
        #[arg(long, short = 'i')]
        input: PathBuf,
    },

    /// Solve a puzzle synchronously and print the completed grid
    #[command(after_help = "\
Examples:
  sqsum solve -i puzzle.json
  sqsum solve -i puzzle.json --annotate     # mark your cells with *
  sqsum solve -i puzzle.json --trace --json")]
    Solve {
        /// Path to a puzzle JSON file
        #[arg(long, short = 'i')]
        input: PathBuf,

        /// Include the solver's trace log
        #[arg(long)]
        trace: bool,

        /// Print the full JSON response instead of the grid text
        #[arg(long)]
        json: bool,

        /// Mark cells you provided with a trailing *
        #[arg(long)]
        annotate: bool,
    },

    /// Start a counting job (optionally watch it to completion)
    #[command(after_help = "\
Examples:
  sqsum count -i puzzle.json --watch
  sqsum count -i puzzle.json --mode exact --yes
  sqsum count -i puzzle.json --mode auto --max-seconds 10 --watch

Without --watch the job id is printed; follow it with
`sqsum status <job_id>` and stop it with `sqsum cancel <job_id>`.")]
    Count {
        /// Path to a puzzle JSON file
        #[arg(long, short = 'i')]
        input: PathBuf,

        /// Counting strategy
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Time budget in seconds (auto mode)
        #[arg(long)]
        max_seconds: Option<f64>,

        /// Sample paths for the statistical estimate
        #[arg(long)]
        sample_paths: Option<u32>,

        /// Let the service fan out across processes
        #[arg(long)]
        multiprocessing: bool,

        /// Worker count (service chooses when omitted)
        #[arg(long)]
        workers: Option<u32>,

        /// Poll until the job reaches a terminal state
        #[arg(long)]
        watch: bool,

        /// Confirm an exact-mode run (may run without a time limit)
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Fetch one status snapshot for a counting job
    Status {
        /// Job id returned by `count`
        job_id: String,
    },

    /// Request cancellation of a counting job
    Cancel {
        /// Job id returned by `count`
        job_id: String,
    },

    /// Write an empty puzzle template file
    Export {
        /// Grid side length (2-7)
        #[arg(long)]
        size: usize,

        /// Required sum for every row, column, and both diagonals
        #[arg(long)]
        target: i64,

        /// Value-range rule
        #[arg(long, value_enum, default_value = "unbounded")]
        game_mode: GameModeArg,

        /// Output file
        #[arg(long, short = 'o')]
        output: PathBuf,
    },

    /// Ping the solver service
    Health,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    let settings = Settings::load();

    let result = match cli.command {
        Commands::Validate { input } => puzzle_ops::run_validate(&input),
        Commands::Solve { input, trace, json, annotate } => {
            puzzle_ops::run_solve(&settings, &input, trace, json, annotate)
        }
        Commands::Count {
            input,
            mode,
            max_seconds,
            sample_paths,
            multiprocessing,
            workers,
            watch,
            yes,
        } => jobs::run_count(
            &settings,
            &input,
            jobs::CountArgs {
                mode: mode.map(Into::into),
                max_seconds,
                sample_paths,
                multiprocessing,
                workers,
                watch,
                yes,
            },
        ),
        Commands::Status { job_id } => jobs::run_status(&settings, &job_id),
        Commands::Cancel { job_id } => jobs::run_cancel(&settings, &job_id),
        Commands::Export { size, target, game_mode, output } => {
            puzzle_ops::run_export(size, target, game_mode.into(), &output)
        }
        Commands::Health => jobs::run_health(&settings),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(err) => {
            eprintln!("Error: {}", err.message);
            ExitCode::from(err.code)
        }
    }
}
