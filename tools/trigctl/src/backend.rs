//! Journaling blink engine.
//!
//! Stands in for real LED hardware: every call is recorded as a line of
//! text that the script runner prints after each command.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use ledtrig_dev::{BackendError, TriggerBackend};

/// Handle for a journaled trigger.
pub struct ConsoleTrigger {
    id: u32,
    name: String,
}

/// Backend that records registrations and pulses as text.
#[derive(Default)]
pub struct ConsoleBackend {
    next_id: AtomicU32,
    journal: Mutex<Vec<String>>,
}

impl ConsoleBackend {
    /// Takes the lines recorded since the last call.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        // A panicking writer cannot leave a half-pushed line behind.
        self.journal.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl TriggerBackend for ConsoleBackend {
    type Handle = ConsoleTrigger;

    fn register(&self, name: &str) -> Result<ConsoleTrigger, BackendError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push(format!("led: trigger #{id} '{name}' registered"));
        Ok(ConsoleTrigger {
            id,
            name: name.to_string(),
        })
    }

    fn unregister(&self, handle: ConsoleTrigger) {
        self.lock().push(format!(
            "led: trigger #{} '{}' unregistered",
            handle.id, handle.name
        ));
    }

    fn blink_oneshot(&self, handle: &ConsoleTrigger, delay_on_ms: u64, delay_off_ms: u64, invert: bool) {
        let shape = if invert { "off/on" } else { "on/off" };
        self.lock().push(format!(
            "led: {} pulse {shape} {delay_on_ms}ms/{delay_off_ms}ms",
            handle.name
        ));
    }
}
