use chrono::Duration;
use gridmarket_core::Timestamp;
use gridmarket_ports::Clock;
use parking_lot::RwLock;

/// Fixed clock that only advances when told to
///
/// Gives market tests deterministic event timestamps.
pub struct ManualClock {
    current_time: RwLock<Timestamp>,
}

impl ManualClock {
    pub fn new(initial_time: Timestamp) -> Self {
        Self {
            current_time: RwLock::new(initial_time),
        }
    }

    /// Advance the clock by a duration
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current_time.write();
        *current += duration;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.current_time.read()
    }

    fn name(&self) -> &str {
        "ManualClock"
    }
}
