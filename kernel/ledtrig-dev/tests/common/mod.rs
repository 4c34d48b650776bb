//! Shared test backend.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::{Duration, Instant};

use ledtrig_dev::{BackendError, TriggerBackend};

/// A spin gate threads park on until another thread opens it.
#[derive(Default)]
pub struct Gate {
    armed: AtomicBool,
    waiting: AtomicU32,
}

impl Gate {
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    pub fn open(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }

    /// Blocks the caller while the gate is armed.
    pub fn pass(&self) {
        if !self.armed.load(Ordering::SeqCst) {
            return;
        }
        self.waiting.fetch_add(1, Ordering::SeqCst);
        while self.armed.load(Ordering::SeqCst) {
            std::thread::yield_now();
        }
        self.waiting.fetch_sub(1, Ordering::SeqCst);
    }

    /// Waits until some thread is parked on the gate.
    pub fn wait_for_waiter(&self) {
        while self.waiting.load(Ordering::SeqCst) == 0 {
            std::thread::yield_now();
        }
    }

    /// Waits until `count` threads are parked at once. Returns `false` if
    /// that does not happen within `timeout`.
    pub fn wait_for_waiters(&self, count: u32, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.waiting.load(Ordering::SeqCst) < count {
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::yield_now();
        }
        true
    }
}

/// Backend that records every call and can stall registration, release or
/// pulses.
#[derive(Default)]
pub struct Recording {
    next: AtomicU32,
    pub registered: AtomicU32,
    pub unregistered: AtomicU32,
    pub blinks: AtomicU32,
    pub names: Mutex<Vec<String>>,
    live: Mutex<HashSet<u32>>,
    pub double_release: AtomicBool,
    pub register_gate: Gate,
    pub unregister_gate: Gate,
    pub blink_gate: Gate,
}

impl Recording {
    pub fn registered(&self) -> u32 {
        self.registered.load(Ordering::SeqCst)
    }

    pub fn unregistered(&self) -> u32 {
        self.unregistered.load(Ordering::SeqCst)
    }

    pub fn blinks(&self) -> u32 {
        self.blinks.load(Ordering::SeqCst)
    }

    pub fn live(&self) -> usize {
        self.live.lock().unwrap().len()
    }
}

impl TriggerBackend for Recording {
    type Handle = u32;

    fn register(&self, name: &str) -> Result<u32, BackendError> {
        self.register_gate.pass();
        let id = self.next.fetch_add(1, Ordering::SeqCst);
        self.names.lock().unwrap().push(name.to_owned());
        self.live.lock().unwrap().insert(id);
        self.registered.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    fn unregister(&self, handle: u32) {
        self.unregister_gate.pass();
        if !self.live.lock().unwrap().remove(&handle) {
            self.double_release.store(true, Ordering::SeqCst);
        }
        self.unregistered.fetch_add(1, Ordering::SeqCst);
    }

    fn blink_oneshot(&self, handle: &u32, delay_on_ms: u64, delay_off_ms: u64, _invert: bool) {
        self.blink_gate.pass();
        assert!(self.live.lock().unwrap().contains(handle), "blink on released trigger");
        assert_eq!((delay_on_ms, delay_off_ms), (30, 30));
        self.blinks.fetch_add(1, Ordering::SeqCst);
    }
}
