//! Gridmarket Core Domain
//!
//! Pure domain types for the gridmarket double-auction service.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod curves;
pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use curves::{CurveOverflow, Point, PolyLine};
pub use entities::{MarketParticipant, ParticipantId, Side};
pub use values::{MarketName, Price, Quantity, Timestamp};
