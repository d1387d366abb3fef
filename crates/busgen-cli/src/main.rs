//! busgen CLI - Annotation-driven code generation
//!
//! Commands:
//! - `busgen generate` - Generate the proxy loader and observer subscriptions
//! - `busgen scan` - List the types carrying an annotation
//! - `busgen check` - Validate a busgen.toml configuration

use busgen::GenError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod check;
mod generate;
mod scan;
mod settings;

#[derive(Parser)]
#[command(name = "busgen")]
#[command(author, version, about = "Annotation-driven Java code generation", long_about = None)]
struct Cli {
    /// Path to busgen.toml (default: ./busgen.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off); RUST_LOG takes precedence
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the proxy loader and every observer subscription class
    Generate {
        /// Directory holding the type universe (one JSON file per type)
        #[arg(short, long)]
        universe: PathBuf,

        /// Output directory for generated sources (overrides the config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Cache directory (overrides the config)
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Serve cached artifacts instead of regenerating them
        #[arg(long)]
        reuse_cache: bool,
    },

    /// List the types in the configured packages carrying an annotation
    Scan {
        /// Directory holding the type universe (one JSON file per type)
        #[arg(short, long)]
        universe: PathBuf,

        /// Annotation to look for (default: the configured remote annotation)
        #[arg(short, long)]
        annotation: Option<String>,
    },

    /// Validate a busgen.toml configuration
    Check,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = settings::load_config(cli.config.as_deref())?;
    settings::init_tracing(cli.log_level.as_deref().unwrap_or(&config.log_level))?;

    match cli.command {
        Commands::Generate {
            universe,
            output,
            cache_dir,
            reuse_cache,
        } => {
            let overrides = generate::Overrides {
                output,
                cache_dir,
                reuse_cache,
            };
            generate::run(config, &universe, overrides)
        }
        Commands::Scan {
            universe,
            annotation,
        } => scan::run(config, &universe, annotation),
        Commands::Check => check::run(&config),
    }
}

/// Generation failures map to their error's exit code; anything else is 1
fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<GenError>())
        .map_or(1, |e| u8::try_from(e.exit_code()).unwrap_or(1))
}
