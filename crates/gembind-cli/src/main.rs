//! gembind command-line interface.
//!
//! Generates typed C# bindings from an engine reflection document, grouped
//! by the plugins of a project.
//!
//! # Examples
//!
//! ```bash
//! # Generate bindings for every active plugin of a project
//! gembind generate -r reflection.json --project ~/Projects/Racer -o Generated
//!
//! # List the plugins of a project with their generation order
//! gembind gems --project ~/Projects/Racer --order
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use gembind_cli::commands;
use gembind_cli::{GemsArgs, GenerateArgs};
use gembind_core::cli::{ExitCode, OutputFormat};
use tracing::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// gembind - C# bindings for engine plugins.
#[derive(Parser, Debug)]
#[command(name = "gembind")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    format: String,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate C# bindings from a reflection document.
    ///
    /// Symbols are assigned to the plugins of the project (or engine) and
    /// written per plugin, in dependency order.
    Generate(GenerateArgs),

    /// List discovered plugins and their dependencies.
    Gems(GemsArgs),
}

fn main() {
    let cli = Cli::parse();

    let code = match init_logging(cli.verbose).and_then(|()| execute(cli)) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::ERROR
        }
    };

    std::process::exit(code.as_i32());
}

/// Sets up tracing on stderr; `--verbose` forces the debug level,
/// otherwise `RUST_LOG` applies with `info` as the default.
fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}

fn execute(cli: Cli) -> Result<ExitCode> {
    let output_format = cli.format.parse::<OutputFormat>()?;

    match cli.command {
        Commands::Generate(args) => commands::generate::run(&args, output_format),
        Commands::Gems(args) => commands::gems::run(&args, output_format),
    }
}
