//! Gridmarket Market Service
//!
//! Runs double-auction markets in fixed-length rounds:
//!
//! - **Market**: per-market round state, reservations and offers
//! - **MarketList**: all markets by name
//! - **Director**: the round driver, publishes events on the market bus
//! - **Registration**: participant-side view of the round
//!
//! ## Architecture
//!
//! ```text
//!                  ┌─────────────────┐
//!                  │    Director     │──── MarketEvent bus ────┐
//!                  └────────┬────────┘                         │
//!                           │ reset / collect / clear          ▼
//!                           ▼                          ┌───────────────┐
//!                  ┌─────────────────┐  reserve/offer  │ Participants  │
//!                  │   MarketList    │◄────────────────│ (registration │
//!                  └────────┬────────┘                 │  state)       │
//!                           │                          └───────────────┘
//!                           ▼
//!   ┌────────────────────────────────────────────┐
//!   │ Market: ReservationManager + OfferManager  │
//!   └────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod director;
pub mod error;
pub mod events;
pub mod market;
pub mod market_list;
pub mod offers;
pub mod participant;
pub mod registration;

// Re-export main types
pub use config::{ConfigError, MarketServiceConfig, ParticipantConfig};
pub use director::{Director, RoundReport};
pub use error::{MarketError, OfferError, Result};
pub use events::MarketEvent;
pub use market::{ClearingOutcome, Market, MarketState};
pub use market_list::MarketList;
pub use offers::OfferManager;
pub use participant::{OfferMode, ParticipantReport, SimulatedParticipant};
pub use registration::{MarketRegistration, RegistrationState, RegistrationTrigger};
