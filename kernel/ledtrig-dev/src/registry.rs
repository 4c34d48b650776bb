//! Device trigger registry.
//!
//! Maps device numbers to triggers. Administrative operations (`add`,
//! `remove`, `teardown`) take the lock exclusively and may wait; `list`
//! waits for a shared lock. [`Registry::fire`] only ever *tries* the shared
//! lock: if a writer is active the signal is dropped and counted, so the
//! activity path has a small, bounded cost in any calling context.
//!
//! Backend registration during `add` runs after the exclusive lock is
//! released. The new entry is visible as `Registering` in the meantime and
//! fires against it are harmless no-ops. The handle is then installed under
//! a second, brief exclusive lock, which is the only way entries change.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use devtrig_core::sync::RwLock;
use devtrig_core::{DevId, kdebug, kerr, kinfo, kwarn};

use crate::backend::{TriggerBackend, TriggerHandle};
use crate::config::TriggerConfig;
use crate::entry::{FireOutcome, TriggerEntry, TriggerName};
use crate::error::BackendError;

/// Result of [`Registry::add`].
///
/// None of these need handling by the caller; they are reported for
/// diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new trigger was registered. It may already have been removed again
    /// by a concurrent `remove` or `teardown`.
    Registered,
    /// The device already had a trigger; the first one is kept.
    ///
    /// If the first trigger is still being registered and the backend then
    /// refuses it, the device ends up with no trigger at all.
    Duplicate,
    /// The backend refused the trigger; the registry is unchanged.
    Failed(BackendError),
    /// The registry has been torn down.
    ShutDown,
}

/// Snapshot of the fire-path counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Pulses requested from the backend.
    pub fired: u64,
    /// Signals for devices without an active trigger.
    pub missed: u64,
    /// Signals dropped because a lock was contended.
    pub dropped: u64,
}

#[derive(Default)]
struct Counters {
    fired: AtomicU64,
    missed: AtomicU64,
    dropped: AtomicU64,
}

impl Counters {
    fn record(&self, outcome: FireOutcome) {
        let counter = match outcome {
            FireOutcome::Fired => &self.fired,
            FireOutcome::Pending | FireOutcome::NotFound => &self.missed,
            FireOutcome::Contended => &self.dropped,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// The device trigger registry.
///
/// Holds at most one entry per [`DevId`]. Dropping the registry tears it
/// down, releasing every outstanding trigger.
pub struct Registry<B: TriggerBackend> {
    backend: Arc<B>,
    config: TriggerConfig,
    entries: RwLock<BTreeMap<DevId, TriggerEntry<B>>>,
    next_ticket: AtomicU64,
    shut_down: AtomicBool,
    counters: Counters,
}

impl<B: TriggerBackend> Registry<B> {
    /// Creates an empty registry with the default pulse configuration.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, TriggerConfig::default())
    }

    /// Creates an empty registry with the given pulse configuration.
    pub fn with_config(backend: B, config: TriggerConfig) -> Self {
        Self {
            backend: Arc::new(backend),
            config,
            entries: RwLock::new(BTreeMap::new()),
            next_ticket: AtomicU64::new(0),
            shut_down: AtomicBool::new(false),
            counters: Counters::default(),
        }
    }

    /// Returns the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the pulse configuration.
    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }

    /// Creates and registers a trigger for `dev`.
    ///
    /// A second `add` for the same device logs a warning and keeps the first
    /// trigger.
    pub fn add(&self, dev: DevId) -> AddOutcome {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        let name = TriggerName::for_device(dev);

        {
            let mut entries = self.entries.write();
            if self.shut_down.load(Ordering::Relaxed) {
                drop(entries);
                kwarn!("ledtrig-dev: add {} after teardown ignored", dev);
                return AddOutcome::ShutDown;
            }
            if entries.contains_key(&dev) {
                drop(entries);
                kwarn!("ledtrig-dev: device {} already registered", dev);
                return AddOutcome::Duplicate;
            }
            entries.insert(dev, TriggerEntry::new(dev, ticket));
        }

        match TriggerHandle::register(&self.backend, name.as_str()) {
            Ok(handle) => {
                let installed = {
                    let mut entries = self.entries.write();
                    match entries.get_mut(&dev).filter(|entry| entry.ticket() == ticket) {
                        Some(entry) => entry.install(handle),
                        None => Err(handle),
                    }
                };
                if let Err(orphan) = installed {
                    // Removed while the backend was working.
                    drop(orphan);
                    kdebug!("ledtrig-dev: trigger {} removed during registration", name);
                } else {
                    kinfo!("ledtrig-dev: registered trigger {}", name);
                }
                AddOutcome::Registered
            }
            Err(err) => {
                {
                    let mut entries = self.entries.write();
                    if entries.get(&dev).is_some_and(|entry| entry.ticket() == ticket) {
                        entries.remove(&dev);
                    }
                }
                kerr!("ledtrig-dev: failed to register trigger {}: {}", name, err);
                AddOutcome::Failed(err)
            }
        }
    }

    /// Removes the trigger for `dev` and releases it.
    ///
    /// Returns `false` if the device had no trigger.
    pub fn remove(&self, dev: DevId) -> bool {
        let mut entries = self.entries.write();
        let Some(mut entry) = entries.remove(&dev) else {
            return false;
        };
        entry.release();
        drop(entries);
        kinfo!("ledtrig-dev: unregistered trigger {}", entry.name());
        true
    }

    /// Fires a one-shot pulse on the trigger for `dev`.
    ///
    /// Never waits: if the registry is being modified the signal is dropped.
    /// Concurrent fires only share the lock, so they never drop each other.
    pub fn fire(&self, dev: DevId) -> FireOutcome {
        let outcome = match self.entries.try_read() {
            None => FireOutcome::Contended,
            Some(entries) => match entries.get(&dev) {
                Some(entry) => entry.fire(&self.config),
                None => FireOutcome::NotFound,
            },
        };
        self.counters.record(outcome);
        outcome
    }

    /// Hot-path alias for [`fire`](Self::fire) that discards the outcome.
    #[inline]
    pub fn signal_activity(&self, dev: DevId) {
        let _ = self.fire(dev);
    }

    /// Returns the registered device numbers in ascending order.
    pub fn list(&self) -> Vec<DevId> {
        self.entries.read().keys().copied().collect()
    }

    /// Returns `true` if `dev` has an entry.
    pub fn contains(&self, dev: DevId) -> bool {
        self.entries.read().contains_key(&dev)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if the registry holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns the fire-path counters.
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            fired: self.counters.fired.load(Ordering::Relaxed),
            missed: self.counters.missed.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
        }
    }

    /// Returns `true` once [`teardown`](Self::teardown) has run.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    /// Removes and releases every entry, and refuses further `add`s.
    ///
    /// Safe to call more than once; later calls find nothing to release.
    pub fn teardown(&self) {
        let mut entries = self.entries.write();
        self.shut_down.store(true, Ordering::Release);
        let mut drained = core::mem::take(&mut *entries);
        let mut released = 0usize;
        for entry in drained.values_mut() {
            if entry.release() {
                released += 1;
            }
        }
        drop(entries);
        if !drained.is_empty() {
            kdebug!(
                "ledtrig-dev: teardown removed {} entries, released {} triggers",
                drained.len(),
                released
            );
        }
    }
}

impl<B: TriggerBackend> Drop for Registry<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}
