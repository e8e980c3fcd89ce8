//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{init, list};
use crate::domain::{Platform, Taskfile};
use crate::loader::{Config, Loader};

#[derive(Parser)]
#[command(name = "taskfile")]
#[command(author, version, about = "Resolve Taskfiles with their includes and platform overlays")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory containing the Taskfile
    #[arg(long, short = 'd', global = true, default_value = ".")]
    pub dir: PathBuf,

    /// Entrypoint file name (defaults to the configured one)
    #[arg(long, short = 't', global = true)]
    pub taskfile: Option<String>,

    /// Platform used to pick overlay files (defaults to the host)
    #[arg(long, global = true, env = "TASKFILE_PLATFORM")]
    pub platform: Option<String>,

    /// Configuration file to use instead of the global one
    #[arg(long, global = true, env = "TASKFILE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new Taskfile in the directory
    Init,

    /// List tasks that have a description
    List {
        /// Include tasks without a description
        #[arg(long, short)]
        all: bool,
    },

    /// Show one resolved task
    Show {
        /// Task name, namespaced for included tasks (e.g. docs:serve)
        task: String,
    },

    /// Print the whole resolved Taskfile
    Dump,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let output = Output::new(cli.format.unwrap_or(config.default_format));
    let entrypoint = cli.taskfile.clone().unwrap_or_else(|| config.entrypoint.clone());
    let platform = cli
        .platform
        .as_deref()
        .map(Platform::new)
        .unwrap_or_else(|| config.effective_platform());

    debug!(dir = %cli.dir.display(), %entrypoint, %platform, "taskfile starting");

    match cli.command {
        Commands::Init => init::run(&output, &cli.dir, &entrypoint)?,

        Commands::List { all } => {
            let taskfile = load(&cli.dir, &entrypoint, platform)?;
            list::list(&output, &taskfile, all);
        }

        Commands::Show { task } => {
            let taskfile = load(&cli.dir, &entrypoint, platform)?;
            list::show(&output, &taskfile, &task)?;
        }

        Commands::Dump => {
            let taskfile = load(&cli.dir, &entrypoint, platform)?;
            output.data(&taskfile);
        }
    }

    Ok(())
}

fn load(dir: &std::path::Path, entrypoint: &str, platform: Platform) -> Result<Taskfile> {
    Ok(Loader::new(platform).load(dir, entrypoint)?)
}

/// Installs the stderr subscriber; `RUST_LOG` wins over `--verbose`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
