//! Synchronization primitives for the trigger registry.
//!
//! Provides the spinning [`RwLock`]. It is const-constructable so it can
//! live in `static` items, and offers try-acquire entry points for callers
//! that must never wait.

mod rwlock;

pub(crate) mod loom_compat;

pub use rwlock::{RwLock, RwLockReadGuard, RwLockWriteGuard};
