//! Gridmarket Clock Infrastructure
//!
//! Time sources for stamping market events:
//!
//! - [`SystemClock`]: wall-clock time, used by the running service
//! - [`ManualClock`]: frozen time that only moves when advanced, used by tests
//!
//! ## Usage
//!
//! ```ignore
//! use gridmarket_clock::{ManualClock, SystemClock};
//! use chrono::Duration;
//!
//! let clock = ManualClock::new(start);
//! clock.advance(Duration::minutes(5));
//! ```

mod manual;
mod system;

pub use manual::ManualClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use gridmarket_ports::Clock;
