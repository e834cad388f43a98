use gridmarket_core::{CurveOverflow, ParticipantId, Quantity, Side};
use thiserror::Error;

/// Reservation protocol violations
///
/// Each is a caller error: the participant reserved twice, confirmed
/// without reserving, or confirmed twice. None of them are retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReservationError {
    #[error("{identity} already holds a {side} reservation")]
    DuplicateReservation { identity: ParticipantId, side: Side },

    #[error("{identity} has no {side} reservation")]
    NoSuchReservation { identity: ParticipantId, side: Side },

    #[error("{identity} already took its {side} reservation")]
    AlreadyTaken { identity: ParticipantId, side: Side },

    #[error("{identity} is reserved as {reserved}, cannot reserve as {requested}")]
    SideConflict {
        identity: ParticipantId,
        reserved: Side,
        requested: Side,
    },
}

impl ReservationError {
    /// The participant at fault
    pub fn identity(&self) -> &ParticipantId {
        match self {
            ReservationError::DuplicateReservation { identity, .. }
            | ReservationError::NoSuchReservation { identity, .. }
            | ReservationError::AlreadyTaken { identity, .. }
            | ReservationError::SideConflict { identity, .. } => identity,
        }
    }
}

pub type ReservationResult<T> = std::result::Result<T, ReservationError>;

/// Domain-level errors for clearing a market
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClearingError {
    #[error("No demand offers to clear")]
    NoDemand,

    #[error("No supply offers to clear")]
    NoSupply,

    #[error(
        "Demand and supply do not intersect: demand max quantity={demand_max_quantity:?}, supply min quantity={supply_min_quantity:?}"
    )]
    NoIntersection {
        demand_max_quantity: Option<Quantity>,
        supply_min_quantity: Option<Quantity>,
    },

    #[error("Curves too large to clear: {0}")]
    Overflow(#[from] CurveOverflow),
}

pub type ClearingResult<T> = std::result::Result<T, ClearingError>;
