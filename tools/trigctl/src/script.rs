//! Control script interpreter.
//!
//! One command per line; blank lines and `#` comments are skipped:
//!
//! ```text
//! write register 8:1
//! activity 8:1
//! read devices
//! write unregister 8:1
//! stats
//! endpoints
//! ```

use std::io::Write;
use std::sync::Arc;

use anyhow::{Result, bail};
use ledtrig_dev::control::{EndpointMode, parse_dev_id};
use ledtrig_dev::{ControlSurface, Registry, TriggerConfig};

use crate::backend::ConsoleBackend;

/// A parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Read an endpoint and print its content.
    Read(String),
    /// Write a payload to an endpoint.
    Write(String, String),
    /// Signal activity through the hot path.
    Activity(String),
    /// Print the fire-path counters.
    Stats,
    /// List the endpoint directory.
    Endpoints,
}

impl Command {
    /// Parses one line. Returns `Ok(None)` for blank lines and comments.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        let command = match words.as_slice() {
            ["read", endpoint] => Self::Read((*endpoint).to_string()),
            ["write", endpoint, payload] => {
                Self::Write((*endpoint).to_string(), (*payload).to_string())
            }
            ["activity", dev] => Self::Activity((*dev).to_string()),
            ["stats"] => Self::Stats,
            ["endpoints"] => Self::Endpoints,
            _ => bail!("unrecognized command: {line}"),
        };
        Ok(Some(command))
    }
}

/// A registry plus its control surface.
pub struct Session {
    ctl: ControlSurface<ConsoleBackend>,
}

impl Session {
    /// Creates a session with an empty registry.
    pub fn new(config: TriggerConfig) -> Self {
        let registry = Arc::new(Registry::with_config(ConsoleBackend::default(), config));
        Self {
            ctl: ControlSurface::new(registry),
        }
    }

    /// Returns the registry.
    pub fn registry(&self) -> &Registry<ConsoleBackend> {
        self.ctl.registry()
    }

    /// Executes one command, printing results and backend events to `out`.
    ///
    /// Rejected control writes are returned as errors; the session stays
    /// usable.
    pub fn execute(&self, command: &Command, out: &mut impl Write) -> Result<()> {
        let result = self.dispatch(command, out);
        for line in self.registry().backend().drain() {
            writeln!(out, "{line}")?;
        }
        result
    }

    fn dispatch(&self, command: &Command, out: &mut impl Write) -> Result<()> {
        match command {
            Command::Read(endpoint) => {
                let mut content = Vec::new();
                let mut buf = [0u8; 64];
                loop {
                    let n = self
                        .ctl
                        .read_named(endpoint, content.len(), &mut buf)
                        .map_err(|err| anyhow::anyhow!("read {endpoint}: {err}"))?;
                    if n == 0 {
                        break;
                    }
                    content.extend_from_slice(&buf[..n]);
                }
                out.write_all(&content)?;
            }
            Command::Write(endpoint, payload) => {
                self.ctl
                    .write_named(endpoint, payload.as_bytes())
                    .map_err(|err| anyhow::anyhow!("write {endpoint} {payload}: {err}"))?;
            }
            Command::Activity(dev) => {
                let dev = parse_dev_id(dev.as_bytes())
                    .map_err(|err| anyhow::anyhow!("activity {dev}: {err}"))?;
                self.registry().signal_activity(dev);
            }
            Command::Stats => {
                let stats = self.registry().stats();
                writeln!(
                    out,
                    "fired {} missed {} dropped {}",
                    stats.fired, stats.missed, stats.dropped
                )?;
            }
            Command::Endpoints => {
                for (name, mode) in self.ctl.endpoints() {
                    let r = if mode.contains(EndpointMode::READ) { 'r' } else { '-' };
                    let w = if mode.contains(EndpointMode::WRITE) { 'w' } else { '-' };
                    writeln!(out, "{r}{w} {name}")?;
                }
            }
        }
        Ok(())
    }

    /// Runs a whole script. Returns the number of rejected commands.
    ///
    /// With `strict`, stops at the first rejected command and returns it as
    /// the error.
    pub fn run_script(&self, script: &str, strict: bool, out: &mut impl Write) -> Result<usize> {
        let mut rejected = 0;
        for (idx, line) in script.lines().enumerate() {
            let outcome = Command::parse(line).and_then(|command| match command {
                Some(command) => self.execute(&command, out),
                None => Ok(()),
            });
            if let Err(err) = outcome {
                if strict {
                    return Err(err.context(format!("line {}", idx + 1)));
                }
                writeln!(out, "line {}: {err}", idx + 1)?;
                rejected += 1;
            }
        }
        Ok(rejected)
    }

    /// Tears the registry down, printing the released triggers.
    pub fn finish(self, out: &mut impl Write) -> Result<()> {
        self.registry().teardown();
        for line in self.registry().backend().drain() {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}
