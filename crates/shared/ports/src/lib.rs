//! Gridmarket Ports
//!
//! Port definitions (traits) for the gridmarket service.
//! These define the boundaries between market logic and infrastructure.

mod clearing;
mod clock;
mod error;

pub use clearing::{ClearedPoint, ClearingAlgorithm};
pub use clock::Clock;
pub use error::{ClearingError, ClearingResult, ReservationError, ReservationResult};
