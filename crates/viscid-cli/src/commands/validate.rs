//! `viscid validate`: check a configuration file without running it.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use super::{load_config, warn_if_unstable, STABILITY_LIMIT};

/// Validate arguments
#[derive(Args)]
pub struct ValidateArgs {
    /// Configuration file (JSON)
    #[arg(short, long)]
    pub config: PathBuf,
}

/// Load, validate and report the stability number.
pub fn execute(args: ValidateArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let number = warn_if_unstable(&config);
    info!(
        path = %args.config.display(),
        width = config.width,
        height = config.height,
        steps = config.steps,
        "configuration is valid"
    );
    println!("stability number: {number:.6} (limit {STABILITY_LIMIT})");
    Ok(())
}
