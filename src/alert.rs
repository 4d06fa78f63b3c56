// HealthNode - Alert Latch
//
// One toggled indicator per node.  Every qualifying reading flips it, so two
// alerting readings in a row leave it where it started.

use crate::hal::AlertOutput;

pub struct AlertLatch<O> {
    output: O,
    active: bool,
    toggles: u32,
}

impl<O: AlertOutput> AlertLatch<O> {
    /// Starts inactive and drives the output to match.
    pub fn new(mut output: O) -> Self {
        output.set_active(false);
        Self { output, active: false, toggles: 0 }
    }

    /// Flip the latch and return the new state.
    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        self.toggles = self.toggles.wrapping_add(1);
        self.output.set_active(self.active);
        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn toggles(&self) -> u32 {
        self.toggles
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct RecordingLed(Arc<Mutex<Vec<bool>>>);

    impl AlertOutput for RecordingLed {
        fn set_active(&mut self, active: bool) {
            self.0.lock().unwrap().push(active);
        }
    }

    #[test]
    fn test_two_toggles_restore_original_state() {
        let led = RecordingLed::default();
        let mut latch = AlertLatch::new(led.clone());
        assert!(!latch.is_active());

        assert!(latch.toggle());
        assert!(!latch.toggle());
        assert!(!latch.is_active());
        assert_eq!(latch.toggles(), 2);

        // Initial off, then on, then off.
        assert_eq!(*led.0.lock().unwrap(), vec![false, true, false]);
    }
}
