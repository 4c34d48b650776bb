//! LED device activity trigger.
//!
//! Associates device numbers (`major:minor`) with LED triggers registered
//! on a blink engine, and lets drivers signal "activity on this device" to
//! produce a short one-shot pulse.
//!
//! - [`registry`]: the device-to-trigger map and its lock discipline
//! - [`control`]: the `devices` / `register` / `unregister` / `trigger`
//!   text endpoints
//! - [`activity`]: the installed instance and the hot-path
//!   [`signal_activity`](activity::signal_activity) function
//! - [`backend`]: the blink-engine contract and owned trigger handles
//!
//! The registry is an ordinary value; tests and hosts can create as many
//! as they like. The [`activity`] module adds an optional process-wide
//! instance for drivers that only know a device number.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

#[cfg(not(loom))]
pub mod activity;
pub mod backend;
pub mod config;
pub mod control;
pub mod entry;
pub mod error;
pub mod registry;

pub use backend::{TriggerBackend, TriggerHandle};
pub use config::TriggerConfig;
pub use control::{ControlSurface, Endpoint};
pub use devtrig_core::DevId;
pub use entry::{EntryState, FireOutcome, TriggerName};
pub use error::{BackendError, TriggerError};
pub use registry::{AddOutcome, Registry, RegistryStats};
