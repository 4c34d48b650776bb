//! Spinning reader-writer lock.
//!
//! Allows multiple concurrent readers or a single exclusive writer.
//! Uses an `AtomicU32` for state: 0 = unlocked, positive = reader count,
//! `u32::MAX` = write-locked.
//!
//! [`RwLock::try_read`] never waits for a writer, which makes it the entry
//! point for callers that would rather skip work than block. It only fails
//! while the lock is write-held.

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};

use super::loom_compat::{AtomicU32, Ordering, spin_loop};

/// Sentinel value indicating the lock is held exclusively for writing.
const WRITE_LOCKED: u32 = u32::MAX;

/// A spinning reader-writer lock.
///
/// Const-constructable and suitable for `static` items (except under loom).
pub struct RwLock<T> {
    state: AtomicU32,
    data: UnsafeCell<T>,
}

// SAFETY: The RwLock ensures that `T` is either accessed by multiple shared
// readers (requiring `T: Sync`) or by a single exclusive writer (requiring
// `T: Send`).
unsafe impl<T: Send> Send for RwLock<T> {}
unsafe impl<T: Send + Sync> Sync for RwLock<T> {}

impl<T> RwLock<T> {
    /// Creates a new unlocked `RwLock` wrapping `value`.
    #[cfg(not(loom))]
    pub const fn new(value: T) -> Self {
        Self {
            state: AtomicU32::new(0),
            data: UnsafeCell::new(value),
        }
    }

    /// Creates a new unlocked `RwLock` wrapping `value`.
    #[cfg(loom)]
    pub fn new(value: T) -> Self {
        Self {
            state: AtomicU32::new(0),
            data: UnsafeCell::new(value),
        }
    }

    /// Acquires a shared read lock, spinning until no writer holds the lock.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        loop {
            let s = self.state.load(Ordering::Relaxed);
            if s != WRITE_LOCKED
                && self
                    .state
                    .compare_exchange_weak(s, s + 1, Ordering::Acquire, Ordering::Relaxed)
                    .is_ok()
            {
                return RwLockReadGuard { lock: self };
            }
            spin_loop();
        }
    }

    /// Acquires an exclusive write lock, spinning until no readers or writers
    /// hold the lock.
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        loop {
            if self
                .state
                .compare_exchange_weak(0, WRITE_LOCKED, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
            {
                return RwLockWriteGuard { lock: self };
            }
            spin_loop();
        }
    }

    /// Tries to acquire a shared read lock without waiting for a writer.
    ///
    /// Returns `None` only while a writer holds the lock. A CAS lost to
    /// another reader is retried; each retry means some reader made
    /// progress, so this never spins on a writer.
    pub fn try_read(&self) -> Option<RwLockReadGuard<'_, T>> {
        let mut s = self.state.load(Ordering::Relaxed);
        while s != WRITE_LOCKED {
            match self
                .state
                .compare_exchange_weak(s, s + 1, Ordering::Acquire, Ordering::Relaxed)
            {
                Ok(_) => return Some(RwLockReadGuard { lock: self }),
                Err(current) => s = current,
            }
        }
        None
    }

    /// Tries to acquire an exclusive write lock without blocking.
    pub fn try_write(&self) -> Option<RwLockWriteGuard<'_, T>> {
        if self
            .state
            .compare_exchange(0, WRITE_LOCKED, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            Some(RwLockWriteGuard { lock: self })
        } else {
            None
        }
    }

    /// Returns a mutable reference to the data; no locking is needed since
    /// the borrow is exclusive.
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    /// Consumes the lock and returns the inner value.
    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

/// RAII guard for a shared read lock on an [`RwLock`].
pub struct RwLockReadGuard<'a, T> {
    lock: &'a RwLock<T>,
}

impl<T> Deref for RwLockReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: Read lock is held, no writer can exist.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> Drop for RwLockReadGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.state.fetch_sub(1, Ordering::Release);
    }
}

/// RAII guard for an exclusive write lock on an [`RwLock`].
pub struct RwLockWriteGuard<'a, T> {
    lock: &'a RwLock<T>,
}

impl<T> Deref for RwLockWriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: Write lock is held, no other reader or writer can exist.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> DerefMut for RwLockWriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: Write lock is held, no other reader or writer can exist.
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for RwLockWriteGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.state.store(0, Ordering::Release);
    }
}
