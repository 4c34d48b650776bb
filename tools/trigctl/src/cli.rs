//! Command-line interface definitions for trigctl.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Drive an in-process LED device activity trigger from the shell.
#[derive(Parser)]
#[command(name = "trigctl", version, about)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// TOML file with `[trigger]` and `[log]` settings.
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Execute control commands from a script (stdin if omitted).
    Run(RunArgs),
    /// Check a control payload and print the device it names.
    Parse(ParseArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Parser)]
pub struct RunArgs {
    /// Script file, one command per line.
    pub script: Option<PathBuf>,

    /// Stop at the first rejected command.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `parse` subcommand.
#[derive(Parser)]
pub struct ParseArgs {
    /// Payload as it would be written to `register`, e.g. `8:1`.
    pub input: String,
}
