//! Subcommand implementations.

pub mod info;
pub mod run;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;
use viscid::engine::RunConfig;

/// Above this the explicit 5-point scheme is unstable.
pub const STABILITY_LIMIT: f64 = 0.5;

/// Load and validate a JSON configuration file.
pub fn load_config(path: &Path) -> Result<RunConfig> {
    RunConfig::from_json_file(path)
        .with_context(|| format!("failed to load configuration {}", path.display()))
}

/// Log a warning when the stability number exceeds [`STABILITY_LIMIT`].
pub fn warn_if_unstable(config: &RunConfig) -> f64 {
    let number = config.stability_number();
    if number > STABILITY_LIMIT {
        warn!(
            stability_number = number,
            limit = STABILITY_LIMIT,
            "parameters exceed the explicit-scheme stability limit; the solution will diverge"
        );
    }
    number
}
