//! Trigger error types.

use core::fmt;

/// Errors surfaced to control-surface callers.
///
/// Registry conditions such as duplicate registration, unknown devices, or
/// dropped signals are not errors; they are logged or counted instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerError {
    /// The written payload was empty, too long, or not `<major>:<minor>`.
    InvalidArgument,
    /// The endpoint does not support the requested direction.
    PermissionDenied,
    /// No endpoint with the requested name exists.
    NotFound,
}

impl fmt::Display for TriggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => f.write_str("invalid argument"),
            Self::PermissionDenied => f.write_str("permission denied"),
            Self::NotFound => f.write_str("no such endpoint"),
        }
    }
}

impl core::error::Error for TriggerError {}

/// Errors a [`TriggerBackend`](crate::backend::TriggerBackend) may report
/// when registering a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendError {
    /// The backend could not allocate the trigger.
    OutOfMemory,
    /// A trigger with the same name is already registered.
    NameInUse,
    /// The backend is not accepting registrations.
    Unavailable,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory => f.write_str("out of memory"),
            Self::NameInUse => f.write_str("trigger name already in use"),
            Self::Unavailable => f.write_str("trigger backend unavailable"),
        }
    }
}

impl core::error::Error for BackendError {}
