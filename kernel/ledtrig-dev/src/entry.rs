//! Registry entries.
//!
//! A [`TriggerEntry`] binds one device number to one backend trigger. The
//! entry is visible in the registry before its trigger exists: the backend
//! is called outside the registry lock, and the handle is installed
//! afterwards.
//!
//! Entries carry no lock of their own. They are only mutated through the
//! registry's exclusive lock, so any number of readers holding the shared
//! lock can fire the same entry at once.
//!
//! State machine: `Registering → Active → Released`
//! (also `Registering → Released` when removed before the handle arrives).

use core::fmt::{self, Write as _};

use devtrig_core::DevId;

use crate::backend::{TriggerBackend, TriggerHandle};
use crate::config::{MAX_NAME_LEN, TriggerConfig};

/// Visible bytes of a trigger name; the last buffer byte is reserved.
const NAME_CAPACITY: usize = MAX_NAME_LEN - 1;

/// Bounded trigger name, `dev-<major>:<minor>`.
///
/// Names that do not fit are truncated, never rejected.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TriggerName {
    buf: [u8; NAME_CAPACITY],
    len: usize,
}

impl TriggerName {
    /// Derives the trigger name for `dev`.
    pub fn for_device(dev: DevId) -> Self {
        let mut name = Self {
            buf: [0; NAME_CAPACITY],
            len: 0,
        };
        // Truncation is reported as success by `write_str`.
        let _ = write!(name, "dev-{}:{}", dev.major(), dev.minor());
        name
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII is ever written, so any prefix is valid UTF-8.
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }
}

impl fmt::Write for TriggerName {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = NAME_CAPACITY - self.len;
        let take = s.len().min(room);
        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        Ok(())
    }
}

impl fmt::Display for TriggerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for TriggerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

/// Lifecycle state of a [`TriggerEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// In the registry, backend registration still in flight.
    Registering,
    /// Backend handle installed; fires reach the LED.
    Active,
    /// Handle released (or never obtained). Terminal.
    Released,
}

/// Result of firing an entry or a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// A pulse was requested from the backend.
    Fired,
    /// The device has an entry whose trigger is still being registered.
    Pending,
    /// No entry exists for the device.
    NotFound,
    /// The registry was being modified; the signal was dropped.
    Contended,
}

/// One device-to-trigger binding.
pub struct TriggerEntry<B: TriggerBackend> {
    name: TriggerName,
    ticket: u64,
    handle: Option<TriggerHandle<B>>,
    released: bool,
}

impl<B: TriggerBackend> TriggerEntry<B> {
    /// Creates an entry in the `Registering` state.
    ///
    /// `ticket` tells successive entries for the same device apart, so a
    /// handle is only ever installed into the entry it was registered for.
    pub fn new(dev: DevId, ticket: u64) -> Self {
        Self {
            name: TriggerName::for_device(dev),
            ticket,
            handle: None,
            released: false,
        }
    }

    /// Returns the trigger name.
    pub fn name(&self) -> &TriggerName {
        &self.name
    }

    /// Returns the registration ticket.
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> EntryState {
        match (&self.handle, self.released) {
            (Some(_), _) => EntryState::Active,
            (None, false) => EntryState::Registering,
            (None, true) => EntryState::Released,
        }
    }

    /// Installs the backend handle, moving `Registering → Active`.
    ///
    /// # Errors
    ///
    /// Gives the handle back if the entry has already left `Registering`;
    /// the caller drops it, which unregisters it.
    pub fn install(&mut self, handle: TriggerHandle<B>) -> Result<(), TriggerHandle<B>> {
        if self.state() != EntryState::Registering {
            return Err(handle);
        }
        self.handle = Some(handle);
        Ok(())
    }

    /// Fires a pulse. Takes no lock; concurrent fires all reach the backend.
    pub fn fire(&self, config: &TriggerConfig) -> FireOutcome {
        match &self.handle {
            Some(handle) => {
                handle.blink(config);
                FireOutcome::Fired
            }
            None if self.released => FireOutcome::NotFound,
            None => FireOutcome::Pending,
        }
    }

    /// Releases the backend handle, if any, and moves to `Released`.
    ///
    /// Returns `true` if a handle was released by this call. Calling it
    /// again is a no-op.
    pub fn release(&mut self) -> bool {
        self.released = true;
        self.handle.take().is_some()
    }
}
