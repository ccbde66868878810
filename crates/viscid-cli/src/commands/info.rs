//! `viscid info`: environment and defaults.

use anyhow::{Context, Result};
use clap::Args;
use viscid::engine::RunConfig;

/// Info arguments
#[derive(Args)]
pub struct InfoArgs {
    /// Print only the default configuration as JSON
    #[arg(long)]
    pub json: bool,
}

/// Print the resolved worker count and the default configuration.
pub fn execute(args: InfoArgs) -> Result<()> {
    let defaults = RunConfig::default();
    let json =
        serde_json::to_string_pretty(&defaults).context("failed to serialize default config")?;
    if !args.json {
        println!("viscid {}", env!("CARGO_PKG_VERSION"));
        println!("default workers: {}", rayon::current_num_threads());
        println!("default configuration:");
    }
    println!("{json}");
    Ok(())
}
