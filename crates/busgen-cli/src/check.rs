//! Check command implementation

use anyhow::Result;
use busgen::GeneratorConfig;

/// Validate the configuration and print a summary
pub fn run(config: &GeneratorConfig) -> Result<()> {
    config.validate()?;

    for line in summary(config) {
        println!("✓ {line}");
    }
    println!("\nConfiguration is valid!");
    Ok(())
}

fn summary(config: &GeneratorConfig) -> Vec<String> {
    vec![
        format!("Packages: {}", config.packages.join(", ")),
        format!("Remote annotation: {}", config.annotations.remote),
        format!("Observes annotation: {}", config.annotations.observes),
        format!("Loader contract: {}", config.loader_contract),
        format!("Workers: {} (max {} pending jobs)", config.worker_threads, config.max_pending_jobs),
        format!("Output: {}", config.output_dir.display()),
        format!("Cache: {}", config.cache_dir.display()),
    ]
}
