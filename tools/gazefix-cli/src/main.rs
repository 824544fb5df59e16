//! gazefix CLI: I-DT fixation detection for recorded gaze streams.
//!
//! Usage:
//!   gazefix detect <INPUT>     Detect fixations in a sample file
//!   gazefix validate <INPUT>   Check a sample file for malformed rows
//!   gazefix config show        Print the effective configuration
//!   gazefix config init        Write a default configuration file

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gazefix_common::config::AppConfig;
use gazefix_gaze_model::DataFormat;

mod commands;

#[derive(Parser)]
#[command(
    name = "gazefix",
    about = "Dispersion-threshold fixation detection for 3D gaze data",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    /// Configuration file (defaults to $XDG_CONFIG_HOME/gazefix/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect fixations in a sample file (`-` reads stdin)
    Detect {
        /// Sample file (.jsonl or .csv)
        input: PathBuf,

        /// Input format: jsonl|csv (guessed from the extension, stdin is jsonl)
        #[arg(long)]
        input_format: Option<DataFormat>,

        /// Fixation output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: jsonl|csv (guessed from the output path otherwise)
        #[arg(long)]
        format: Option<DataFormat>,

        /// Samples in the candidate window
        #[arg(long)]
        min_points: Option<usize>,

        /// Dispersion bound to start a fixation
        #[arg(long)]
        min_size: Option<f64>,

        /// Dispersion bound to continue a fixation
        #[arg(long)]
        max_size: Option<f64>,

        /// Emit a fixation still open at end of input
        #[arg(long)]
        flush_trailing: bool,

        /// Write a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Validate a sample file
    Validate {
        /// Sample file (.jsonl or .csv)
        input: PathBuf,

        /// Input format: jsonl|csv (guessed from the extension, stdin is jsonl)
        #[arg(long)]
        input_format: Option<DataFormat>,
    },

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Destination (defaults to the standard location)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => AppConfig::load(),
    };

    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if cli.json_logs {
        config.logging.json = true;
    }
    gazefix_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Detect {
            input,
            input_format,
            output,
            format,
            min_points,
            min_size,
            max_size,
            flush_trailing,
            report,
        } => commands::detect::run(
            commands::detect::DetectArgs {
                input,
                input_format,
                output,
                format,
                min_points,
                min_size,
                max_size,
                flush_trailing,
                report,
            },
            &config,
        ),
        Commands::Validate {
            input,
            input_format,
        } => commands::validate::run(input, input_format),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config, cli.config.as_deref()),
            ConfigAction::Init { path, force } => commands::config::init(path, force),
        },
    }
}
