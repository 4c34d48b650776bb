//! Core types and synchronization primitives for the device activity trigger.
//!
//! This crate contains the host-testable pieces the trigger driver is built
//! on: the [`DevId`](id::DevId) device number, the leveled kernel log
//! macros, and the spinning reader-writer lock used by the trigger registry.
//!
//! Nothing here allocates or blocks on a scheduler, so the types are usable
//! from interrupt-like contexts. Building with `--cfg loom` swaps the
//! atomics for loom's so the lock protocol can be model-checked.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

pub mod id;
pub mod log;
pub mod sync;

pub use id::DevId;
