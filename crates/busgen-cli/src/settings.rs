//! Configuration loading and logging setup shared by every command

use anyhow::{Context, Result};
use busgen::{GeneratorConfig, LogLevel};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Configuration file read when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "busgen.toml";

/// Load the configuration.
///
/// An explicit path must exist. Without one, `busgen.toml` in the current
/// directory is used if present, otherwise the defaults.
pub fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    match path {
        Some(path) => GeneratorConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                load_config(Some(default))
            } else {
                Ok(GeneratorConfig::default())
            }
        }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` selects an `EnvFilter` formatted subscriber; otherwise events at
/// `level` and above go through the busgen log sink to standard error.
pub fn init_tracing(level: &str) -> Result<()> {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
        return Ok(());
    }

    let level: LogLevel = level.parse()?;
    busgen_logging::init_logging(level);
    Ok(())
}
