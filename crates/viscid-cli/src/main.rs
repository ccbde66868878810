//! Command-line driver for the viscid diffusion solver.
//!
//! ```text
//! viscid run --width 256 --height 256 --steps 1000 --init gaussian \
//!            --sample-every 50 --output out --format points
//! viscid validate --config run.json
//! viscid info
//! ```

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Parallel finite-difference diffusion solver for 2D velocity fields.
#[derive(Parser)]
#[command(name = "viscid")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Parallel 2D diffusion solver", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation
    Run(commands::run::RunArgs),
    /// Validate a configuration file
    Validate(commands::validate::ValidateArgs),
    /// Show worker and default-configuration information
    Info(commands::info::InfoArgs),
}

fn parse_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&cli.log_level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Info(args) => commands::info::execute(args),
    }
}
