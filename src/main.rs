use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use mlregistry::cli;

#[derive(Parser)]
#[command(name = "mlregistry", version)]
#[command(about = "Build the ML training recommendations registry", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build registry.yaml and REGISTRY.md from a research YAML file
    Build {
        /// Research YAML (defaults to data/research.yaml)
        #[arg(short = 'i', long)]
        input: Option<PathBuf>,

        /// Output directory (defaults to data)
        #[arg(short = 'o', long)]
        output_dir: Option<PathBuf>,

        /// Identifier store (defaults to data/mlr_registry.json)
        #[arg(long)]
        id_store: Option<PathBuf>,

        /// Also write the Markdown report to this README section
        #[arg(long)]
        readme_section: Option<PathBuf>,

        /// Path to config file (defaults to ./mlregistry.toml or ~/.config/mlregistry/config.toml)
        #[arg(long)]
        config: Option<String>,
    },
    /// Validate a research YAML file without building anything
    Validate {
        /// Research YAML (defaults to data/research.yaml)
        #[arg(short = 'i', long)]
        input: Option<PathBuf>,

        /// Path to config file
        #[arg(long)]
        config: Option<String>,
    },
    /// Print a summary of a saved registry.yaml
    Show {
        /// Registry YAML file
        path: String,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Build {
            input,
            output_dir,
            id_store,
            readme_section,
            config,
        } => {
            cli::build::run(input, output_dir, id_store, readme_section, config)?;
        }
        Commands::Validate { input, config } => {
            cli::validate::run(input, config)?;
        }
        Commands::Show { path } => {
            cli::show::run(&path)?;
        }
    }

    Ok(())
}
