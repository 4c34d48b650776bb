//! Trigger configuration.
//!
//! Compile-time defaults live here as constants; [`TriggerConfig`] carries
//! the values a registry is constructed with, so hosts can override them.

/// Default on and off time of a one-shot pulse, in milliseconds.
pub const BLINK_DELAY_MS: u64 = 30;

/// Size of the trigger name buffer in bytes, including the reserved
/// terminator byte.
pub const MAX_NAME_LEN: usize = 20;

/// Largest control-surface write accepted, in bytes.
pub const MAX_WRITE_LEN: usize = MAX_NAME_LEN;

/// Pulse parameters forwarded to the backend on every fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerConfig {
    /// Time the LED stays on, in milliseconds.
    pub delay_on_ms: u64,
    /// Time the LED stays off afterwards, in milliseconds.
    pub delay_off_ms: u64,
    /// Pulse off-then-on instead of on-then-off.
    pub invert: bool,
}

impl TriggerConfig {
    /// The default configuration: 30 ms on, 30 ms off, not inverted.
    pub const DEFAULT: Self = Self {
        delay_on_ms: BLINK_DELAY_MS,
        delay_off_ms: BLINK_DELAY_MS,
        invert: false,
    };
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TriggerConfig::default();
        assert_eq!(config.delay_on_ms, 30);
        assert_eq!(config.delay_off_ms, 30);
        assert!(!config.invert);
    }

    #[test]
    fn write_limit_matches_name_buffer() {
        assert_eq!(MAX_WRITE_LEN, 20);
    }
}
