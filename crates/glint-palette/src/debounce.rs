//! Query debouncing with generation-counter cancellation.
//!
//! The session stamps every armed timer with a generation; by the time a
//! timer fires, only the latest generation is still live, so superseded
//! and torn-down timers become no-ops instead of stale mutations.

use std::time::Duration;

/// Settle delay between the last keystroke and the adapter call.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

/// Generation counter behind the debounce timer.
#[derive(Debug, Default)]
pub struct Debouncer {
    generation: u64,
}

impl Debouncer {
    /// Create a debouncer with no pending fire.
    pub fn new() -> Self {
        Self::default()
    }

    /// Note a new raw value. Returns the generation the eventual fire
    /// must present; any earlier generation is superseded.
    pub fn arm(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// True when a fire carrying this generation is still the live one.
    pub fn is_live(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Invalidate anything pending.
    pub fn cancel(&mut self) {
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_arm_supersedes_pending() {
        let mut debouncer = Debouncer::new();
        let first = debouncer.arm();
        let second = debouncer.arm();

        assert!(!debouncer.is_live(first));
        assert!(debouncer.is_live(second));
    }

    #[test]
    fn test_cancel_invalidates() {
        let mut debouncer = Debouncer::new();
        let armed = debouncer.arm();
        debouncer.cancel();
        assert!(!debouncer.is_live(armed));
    }
}
