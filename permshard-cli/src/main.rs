//! permshard CLI - Command-line interface
//!
//! This binary provides a command-line interface to the permshard library.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::config::ConfigCommands;
use commands::run::{NamingArg, RunArgs};
use commands::verify::VerifyArgs;

#[derive(Parser)]
#[command(name = "permshard")]
#[command(version = permshard::VERSION)]
#[command(about = "Generate every permutation in parallel, one file per leading element", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.permshard/config.ini
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging on stdout
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate all permutations of the given elements and merge them
    Run {
        /// Distinct elements to permute (default: 1 2 3 4 5 6 7 8 9 10)
        elements: Vec<String>,

        /// Directory for per-task files (default from config: perm_output)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Combined output file (default from config: combined_permutations.txt)
        #[arg(long)]
        combined: Option<PathBuf>,

        /// Maximum worker threads, 0 for one per CPU core
        #[arg(long)]
        workers: Option<usize>,

        /// Per-task file naming scheme
        #[arg(long, value_enum)]
        naming: Option<NamingArg>,
    },

    /// Check that a combined output holds every permutation exactly once
    Verify {
        /// Combined output file (default from config)
        #[arg(long)]
        combined: Option<PathBuf>,

        /// Number of elements the run permuted
        #[arg(long)]
        length: usize,
    },

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            elements,
            output_dir,
            combined,
            workers,
            naming,
        } => commands::run::run(RunArgs {
            elements,
            output_dir,
            combined,
            workers,
            naming,
            config: cli.config,
            debug: cli.debug,
        }),
        Commands::Verify { combined, length } => commands::verify::run(VerifyArgs {
            combined,
            length,
            config: cli.config,
            debug: cli.debug,
        }),
        Commands::Config(command) => commands::config::run(command, cli.config),
    };

    if let Err(e) = result {
        e.exit();
    }
}
