//! Scan command implementation

use anyhow::Result;
use busgen::{DirectoryUniverse, GeneratorConfig, TypeScanner};
use std::path::Path;
use std::sync::Arc;

/// Print every type under the configured packages carrying `annotation`
pub fn run(config: GeneratorConfig, universe: &Path, annotation: Option<String>) -> Result<()> {
    config.validate()?;
    let annotation = annotation.unwrap_or_else(|| config.annotations.remote.clone());

    let scanner = TypeScanner::new(Arc::new(DirectoryUniverse::new(universe)));
    let outcome = scanner.scan(&annotation, &config.packages);

    println!("Types annotated @{annotation}:");
    for name in outcome.type_names() {
        println!("  {name}");
    }
    for warning in outcome.warnings() {
        println!("⚠ skipped: {warning}");
    }
    println!("\n{} type(s) found", outcome.types().len());
    Ok(())
}
