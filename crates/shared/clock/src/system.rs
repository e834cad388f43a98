use chrono::Utc;
use gridmarket_core::Timestamp;
use gridmarket_ports::Clock;

/// Wall-clock time, used by the running service to stamp market events
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}
