//! Config Composer CLI
//!
//! Entry point for the `config-compose` command-line tool.

use clap::{Parser, Subcommand};
use config_composer::config::{
    BaseSource, BuiltinDefaults, BuiltinSource, ComposedConfig, FileSource, StaticSource,
};
use config_composer::ConfigError;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "config-compose")]
#[command(about = "Compose a test-runner configuration from a base and overrides", version)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a base configuration with override files
    Compose {
        /// Base configuration file, JSON or TOML (default: built-in defaults)
        #[arg(long, short = 'b')]
        base: Option<PathBuf>,

        /// Override file, JSON or TOML; repeatable, applied in order
        #[arg(long = "override", short = 'o')]
        overrides: Vec<PathBuf>,

        /// Apply the stock coverage exclusions after the override files
        #[arg(long)]
        stock: bool,

        /// Print only the composed mapping, without provenance
        #[arg(long)]
        config_only: bool,

        /// Write output to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print the built-in base configuration
    Defaults,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Compose {
            base,
            overrides,
            stock,
            config_only,
            output,
        } => {
            run_compose(base, overrides, stock, config_only, output);
        }
        Commands::Defaults => {
            run_defaults();
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_compose(
    base_path: Option<PathBuf>,
    override_paths: Vec<PathBuf>,
    stock: bool,
    config_only: bool,
    output: Option<PathBuf>,
) {
    let composed = match build_composed(base_path, override_paths, stock) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    let rendered = if config_only {
        composed.config_json()
    } else {
        composed.to_json()
    };
    let rendered = match rendered {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, rendered) {
                eprintln!("Error writing {}: {}", path.display(), e);
                process::exit(1);
            }
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", rendered),
    }
}

fn build_composed(
    base_path: Option<PathBuf>,
    override_paths: Vec<PathBuf>,
    stock: bool,
) -> Result<ComposedConfig, ConfigError> {
    let base: Box<dyn BaseSource> = match base_path {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(BuiltinSource::default()),
    };
    let files: Vec<FileSource> = override_paths.into_iter().map(FileSource::new).collect();
    let stock_layer = StaticSource::stock();

    let mut layers: Vec<&dyn BaseSource> = files.iter().map(|f| f as &dyn BaseSource).collect();
    if stock {
        layers.push(&stock_layer);
    }

    ComposedConfig::build(base.as_ref(), &layers)
}

fn run_defaults() {
    let base = BuiltinDefaults::default().base();
    match serde_json::to_string_pretty(&base) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}
