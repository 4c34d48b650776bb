//! Configuration loading.

use std::path::Path;

use anyhow::{Context, Result, bail};
use devtrig_core::log::LogLevel;
use ledtrig_dev::TriggerConfig;
use ledtrig_dev::config::BLINK_DELAY_MS;
use serde::Deserialize;

/// On-disk configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    trigger: TriggerSection,
    log: LogSection,
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
struct TriggerSection {
    delay_on_ms: u64,
    delay_off_ms: u64,
    invert: bool,
}

impl Default for TriggerSection {
    fn default() -> Self {
        Self {
            delay_on_ms: BLINK_DELAY_MS,
            delay_off_ms: BLINK_DELAY_MS,
            invert: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LogSection {
    level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Resolved tool configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Pulse parameters for the registry.
    pub trigger: TriggerConfig,
    /// Most verbose log level printed to stderr.
    pub log_level: LogLevel,
}

impl Config {
    /// Loads configuration from `path`, or the defaults if `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Self::from_file(ConfigFile::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        Self::from_file(file)
    }

    fn from_file(file: ConfigFile) -> Result<Self> {
        let Some(log_level) = LogLevel::from_name(&file.log.level) else {
            bail!("unknown log level '{}'", file.log.level);
        };
        Ok(Self {
            trigger: TriggerConfig {
                delay_on_ms: file.trigger.delay_on_ms,
                delay_off_ms: file.trigger.delay_off_ms,
                invert: file.trigger.invert,
            },
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.trigger, TriggerConfig::default());
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn empty_file_is_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.trigger, TriggerConfig::default());
    }

    #[test]
    fn overrides() {
        let config = Config::parse(
            r#"
            [trigger]
            delay-on-ms = 10
            invert = true

            [log]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.trigger,
            TriggerConfig {
                delay_on_ms: 10,
                delay_off_ms: 30,
                invert: true,
            }
        );
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn rejects_unknown_level() {
        let err = Config::parse("[log]\nlevel = \"loud\"\n").unwrap_err();
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Config::parse("[trigger]\nbrightness = 3\n").is_err());
    }
}
