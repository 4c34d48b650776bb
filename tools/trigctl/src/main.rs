//! trigctl: host driver for the LED device activity trigger.
//!
//! Runs a registry in-process against a journaling blink engine and feeds
//! it control commands, so the control surface can be exercised without
//! hardware.

mod backend;
mod cli;
mod config;
mod script;

use std::fmt;
use std::io::{self, Read, Write};

use anyhow::{Context, Result, bail};
use clap::Parser;
use devtrig_core::log::{self, LogLevel};
use ledtrig_dev::control::parse_dev_id;

use crate::cli::{Cli, Command, ParseArgs, RunArgs};
use crate::config::Config;
use crate::script::Session;

fn stderr_log(level: LogLevel, args: fmt::Arguments<'_>) {
    eprintln!("[{}] {}", level.name(), args);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    log::set_max_level(config.log_level);
    // SAFETY: `stderr_log` never calls back into the registry.
    unsafe { log::set_log_fn(stderr_log) };

    match cli.command {
        Command::Run(args) => cmd_run(&args, &config),
        Command::Parse(args) => cmd_parse(&args),
    }
}

fn cmd_run(args: &RunArgs, config: &Config) -> Result<()> {
    let script = match &args.script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut script = String::new();
            io::stdin()
                .read_to_string(&mut script)
                .context("Failed to read script from stdin")?;
            script
        }
    };

    let session = Session::new(config.trigger);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let rejected = session.run_script(&script, args.strict, &mut out)?;
    session.finish(&mut out)?;
    out.flush()?;

    if rejected > 0 {
        bail!("{rejected} command(s) rejected");
    }
    Ok(())
}

fn cmd_parse(args: &ParseArgs) -> Result<()> {
    match parse_dev_id(args.input.as_bytes()) {
        Ok(dev) => {
            println!("{dev}");
            Ok(())
        }
        Err(err) => bail!("'{}': {err}", args.input.escape_debug()),
    }
}
