//! Loom compatibility shim.
//!
//! When compiled with `cfg(loom)`, re-exports loom's atomics and spin hint.
//! Otherwise, re-exports the standard `core` equivalents.
//!
//! The lock state machine uses these, so they can be explored under loom's
//! deterministic scheduler without code changes. Lock payloads stay in a
//! plain `core::cell::UnsafeCell`.

// ---------------------------------------------------------------------------
// Loom mode
// ---------------------------------------------------------------------------

#[cfg(loom)]
pub(crate) use loom::hint::spin_loop;
#[cfg(loom)]
pub(crate) use loom::sync::atomic::{AtomicU32, Ordering};

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

#[cfg(not(loom))]
pub(crate) use core::hint::spin_loop;
#[cfg(not(loom))]
pub(crate) use core::sync::atomic::{AtomicU32, Ordering};
