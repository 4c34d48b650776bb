//! Trigger backend contract.
//!
//! The backend is the blink engine that actually drives LEDs. The registry
//! only needs three things from it: register a named trigger, unregister
//! it again, and fire a one-shot pulse. [`TriggerHandle`] owns a registered
//! trigger and unregisters it when dropped, so every removal path releases
//! the backend resource exactly once.

extern crate alloc;

use alloc::sync::Arc;

use crate::config::TriggerConfig;
use crate::error::BackendError;

/// A blink engine that owns named LED triggers.
pub trait TriggerBackend: Send + Sync {
    /// Backend-specific handle for a registered trigger.
    type Handle: Send + Sync;

    /// Registers a trigger under `name`.
    ///
    /// May allocate or block; the registry never calls it with its lock held.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the trigger could not be created.
    fn register(&self, name: &str) -> Result<Self::Handle, BackendError>;

    /// Unregisters a trigger. Must not fail.
    fn unregister(&self, handle: Self::Handle);

    /// Requests a single on/off pulse. Fire-and-forget; must return quickly.
    fn blink_oneshot(&self, handle: &Self::Handle, delay_on_ms: u64, delay_off_ms: u64, invert: bool);
}

/// An owned, registered trigger.
///
/// Dropping the handle unregisters it from the backend.
pub struct TriggerHandle<B: TriggerBackend> {
    backend: Arc<B>,
    /// `Some` for the whole life of the handle; taken only in `drop`.
    raw: Option<B::Handle>,
}

impl<B: TriggerBackend> TriggerHandle<B> {
    /// Registers `name` with `backend` and wraps the result.
    ///
    /// # Errors
    ///
    /// Propagates the backend's [`BackendError`].
    pub fn register(backend: &Arc<B>, name: &str) -> Result<Self, BackendError> {
        let raw = backend.register(name)?;
        Ok(Self {
            backend: Arc::clone(backend),
            raw: Some(raw),
        })
    }

    /// Fires a one-shot pulse with the configured timing.
    pub fn blink(&self, config: &TriggerConfig) {
        if let Some(raw) = &self.raw {
            self.backend
                .blink_oneshot(raw, config.delay_on_ms, config.delay_off_ms, config.invert);
        }
    }
}

impl<B: TriggerBackend> Drop for TriggerHandle<B> {
    fn drop(&mut self) {
        if let Some(raw) = self.raw.take() {
            self.backend.unregister(raw);
        }
    }
}
