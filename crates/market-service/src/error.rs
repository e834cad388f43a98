//! Market service errors

use gridmarket_core::{MarketName, ParticipantId, Side};
use gridmarket_ports::{ClearingError, ReservationError};
use thiserror::Error;

use crate::market::MarketState;

/// Rejected offers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OfferError {
    #[error("{identity} submitted an empty {side} curve")]
    EmptyCurve { identity: ParticipantId, side: Side },

    #[error("{identity} already submitted a {side} offer")]
    DuplicateOffer { identity: ParticipantId, side: Side },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    #[error("Market {market_name} cannot {operation} while in state {state:?}")]
    WrongState {
        market_name: MarketName,
        state: MarketState,
        operation: &'static str,
    },

    #[error("Market {market_name} did not form: buyers={buyers}, sellers={sellers}")]
    NotFormed {
        market_name: MarketName,
        buyers: usize,
        sellers: usize,
    },

    #[error("Unknown market: {0}")]
    UnknownMarket(MarketName),

    #[error("Reservation rejected: {0}")]
    Reservation(#[from] ReservationError),

    #[error("Offer rejected: {0}")]
    Offer(#[from] OfferError),

    #[error("Clearing failed: {0}")]
    Clearing(#[from] ClearingError),
}

impl MarketError {
    /// Faults caused by one participant rather than by the market itself
    pub fn is_participant_fault(&self) -> bool {
        matches!(self, MarketError::Reservation(_) | MarketError::Offer(_))
    }
}

pub type Result<T> = std::result::Result<T, MarketError>;
