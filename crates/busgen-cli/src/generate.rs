//! Generate command implementation

use anyhow::{Context, Result};
use busgen::{DirectoryUniverse, Engine, GeneratorConfig, TargetOutcome, generate_all};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Command-line values replacing configured ones
#[derive(Debug, Default)]
pub struct Overrides {
    pub output: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub reuse_cache: bool,
}

impl Overrides {
    fn apply(self, mut config: GeneratorConfig) -> GeneratorConfig {
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(cache_dir) = self.cache_dir {
            config.cache_dir = cache_dir;
        }
        config.reuse_cached_artifacts |= self.reuse_cache;
        config
    }
}

/// Run one generation pass over the universe at `universe`
pub fn run(config: GeneratorConfig, universe: &Path, overrides: Overrides) -> Result<()> {
    let config = overrides.apply(config);
    let output_dir = config.output_dir.clone();

    println!("Generating from universe: {}", universe.display());
    let engine = Arc::new(
        Engine::with_output_dir(config, Arc::new(DirectoryUniverse::new(universe)))
            .context("Failed to start generation engine")?,
    );

    let report = generate_all(&engine);
    engine.shutdown();

    for warning in &report.scan_warnings {
        println!("⚠ skipped: {warning}");
    }
    for (target, outcome) in &report.outcomes {
        match outcome {
            TargetOutcome::Generated { class_name } => println!("✓ {class_name}"),
            TargetOutcome::Failed { error } => println!("✗ {target}: {error}"),
        }
    }

    if let Some(error) = report.first_error() {
        return Err(error.clone()).context("Generation failed");
    }
    println!("\nSources written to {}", output_dir.display());
    Ok(())
}
