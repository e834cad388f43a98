//! Gridmarket Reservation Manager
//!
//! Precondition gate for a double-auction market round. Participants first
//! *make* a reservation (declare intent to trade on one side), and later
//! *take* it when they submit a binding offer.
//!
//! ## Round lifecycle
//!
//! ```text
//!   EMPTY ──make──► RESERVING ──both sides populated──► FORMED
//!                                                          │
//!                                                        take
//!                                                          ▼
//!                                   CLOSED ◄──clear()── CONFIRMING
//! ```
//!
//! The manager only enforces the FORMED predicate and the take guards.
//! Advancing the round (and calling [`ReservationManager::clear`]) is the
//! job of the round driver.
//!
//! ## Guarantees
//!
//! - Both mappings sit behind a single lock, so each call is atomic.
//! - A rejected call leaves the mappings untouched.
//! - Two racing `make_reservation` calls for one identity: exactly one wins.

mod manager;

pub use manager::{ReservationManager, ReservationSnapshot};

// Re-export the error taxonomy from ports for convenience
pub use gridmarket_ports::{ReservationError, ReservationResult};
