//! Activity entry point and module lifecycle.
//!
//! Drivers that do not hold a [`Registry`] reference signal activity through
//! the free functions here, which forward to the registry installed by
//! [`init`]. [`signal_activity`] only uses try-locks on the way down, so it
//! is safe to call from any context; it simply does nothing while no
//! registry is installed or while one is being swapped.

extern crate alloc;

use alloc::sync::Arc;

use devtrig_core::sync::RwLock;
use devtrig_core::{DevId, kinfo};

use crate::backend::TriggerBackend;
use crate::entry::FireOutcome;
use crate::registry::{AddOutcome, Registry};

/// Object-safe view of a registry, used for the installed instance.
pub trait ActivitySink: Send + Sync {
    /// See [`Registry::add`].
    fn add(&self, dev: DevId) -> AddOutcome;
    /// See [`Registry::remove`].
    fn remove(&self, dev: DevId) -> bool;
    /// See [`Registry::fire`].
    fn fire(&self, dev: DevId) -> FireOutcome;
    /// See [`Registry::teardown`].
    fn teardown(&self);
}

impl<B: TriggerBackend> ActivitySink for Registry<B> {
    fn add(&self, dev: DevId) -> AddOutcome {
        Registry::add(self, dev)
    }

    fn remove(&self, dev: DevId) -> bool {
        Registry::remove(self, dev)
    }

    fn fire(&self, dev: DevId) -> FireOutcome {
        Registry::fire(self, dev)
    }

    fn teardown(&self) {
        Registry::teardown(self);
    }
}

/// The installed registry.
static INSTANCE: RwLock<Option<Arc<dyn ActivitySink>>> = RwLock::new(None);

/// Installs `sink` as the process-wide registry.
///
/// Returns `false`, leaving the current one in place, if a registry is
/// already installed.
pub fn init(sink: Arc<dyn ActivitySink>) -> bool {
    let mut instance = INSTANCE.write();
    if instance.is_some() {
        return false;
    }
    *instance = Some(sink);
    drop(instance);
    kinfo!("ledtrig-dev: activity trigger installed");
    true
}

/// Uninstalls the process-wide registry and tears it down.
///
/// Returns `false` if nothing was installed.
pub fn exit() -> bool {
    let Some(sink) = INSTANCE.write().take() else {
        return false;
    };
    sink.teardown();
    kinfo!("ledtrig-dev: activity trigger removed");
    true
}

/// Signals activity on `dev`.
///
/// Bounded and non-blocking; the signal is dropped if any lock on the way
/// is contended.
pub fn signal_activity(dev: DevId) {
    let Some(instance) = INSTANCE.try_read() else {
        return;
    };
    if let Some(sink) = instance.as_ref() {
        sink.fire(dev);
    }
}

/// Adds a trigger for `dev` on the installed registry.
///
/// Returns `None` if no registry is installed.
pub fn add(dev: DevId) -> Option<AddOutcome> {
    INSTANCE.read().as_ref().map(|sink| sink.add(dev))
}

/// Removes the trigger for `dev` from the installed registry.
///
/// Returns `false` if no registry is installed or `dev` had no trigger.
pub fn remove(dev: DevId) -> bool {
    INSTANCE.read().as_ref().is_some_and(|sink| sink.remove(dev))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;
    use core::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct Counting {
        unregistered: AtomicU32,
        blinks: AtomicU32,
    }

    impl TriggerBackend for Counting {
        type Handle = ();

        fn register(&self, _name: &str) -> Result<(), BackendError> {
            Ok(())
        }

        fn unregister(&self, _handle: ()) {
            self.unregistered.fetch_add(1, Ordering::SeqCst);
        }

        fn blink_oneshot(&self, _handle: &(), _on: u64, _off: u64, _invert: bool) {
            self.blinks.fetch_add(1, Ordering::SeqCst);
        }
    }

    // Single test: the installed instance is process-wide.
    #[test]
    fn module_lifecycle() {
        let dev = DevId::new(8, 1);

        // Nothing installed: everything is a no-op.
        signal_activity(dev);
        assert_eq!(add(dev), None);
        assert!(!remove(dev));
        assert!(!exit());

        let registry = Arc::new(Registry::new(Counting::default()));
        assert!(init(registry.clone()));
        assert!(!init(Arc::new(Registry::new(Counting::default()))));

        assert_eq!(add(dev), Some(AddOutcome::Registered));
        assert_eq!(add(dev), Some(AddOutcome::Duplicate));
        signal_activity(dev);
        signal_activity(DevId::new(8, 2));
        assert_eq!(registry.backend().blinks.load(Ordering::SeqCst), 1);

        // Installed-instance lock held by an administrator: signal is dropped.
        {
            let _admin = INSTANCE.write();
            signal_activity(dev);
        }
        assert_eq!(registry.backend().blinks.load(Ordering::SeqCst), 1);

        assert!(add(DevId::new(8, 2)).is_some());
        assert!(remove(DevId::new(8, 2)));
        assert_eq!(registry.backend().unregistered.load(Ordering::SeqCst), 1);

        assert!(exit());
        assert!(registry.is_shut_down());
        assert!(registry.is_empty());
        assert_eq!(registry.backend().unregistered.load(Ordering::SeqCst), 2);

        signal_activity(dev);
        assert_eq!(registry.backend().blinks.load(Ordering::SeqCst), 1);
    }
}
