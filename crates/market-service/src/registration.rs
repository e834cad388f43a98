//! Participant-side market registration
//!
//! Each participant tracks where it is in the market round with a small
//! state machine driven by the events it receives and the outcome of its
//! own reservation and offer calls.
//!
//! | From \ Trigger       | req. reservations | reserve ok (offer) | reserve ok (aggregate) | reserve fail | req. offers | offers ok | offers fail | aggregate | price | error |
//! |----------------------|-------------------|--------------------|------------------------|--------------|-------------|-----------|-------------|-----------|-------|-------|
//! | RegistrationWait     | RegistrationWait  | OfferWait          | AggregateWait          | RegistrationWait | RegistrationWait | - | - | RegistrationWait | RegistrationWait | RegistrationWait |
//! | OfferWait            | RegistrationWait  | -                  | -                      | -            | OfferWait   | PriceWait | RegistrationWait | OfferWait | RegistrationWait | RegistrationWait |
//! | AggregateWait        | RegistrationWait  | -                  | -                      | -            | AggregateWait | PriceWait | - | OfferWait | RegistrationWait | RegistrationWait |
//! | PriceWait            | RegistrationWait  | -                  | -                      | -            | RegistrationWait | - | - | PriceWait | RegistrationWait | RegistrationWait |
//!
//! `-` means the trigger is ignored in that state.

use gridmarket_core::{MarketName, Side};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationState {
    RegistrationWait,
    OfferWait,
    AggregateWait,
    PriceWait,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationTrigger {
    ReceivedRequestReservations,
    SuccessReserveWithOffer,
    SuccessReserveWithAggregate,
    FailReserve,
    ReceivedRequestOffers,
    SuccessOffers,
    FailOffers,
    ReceivedReportAggregate,
    ReceivedReportPrice,
    ReceivedErrorReport,
}

/// Transition table; `None` for triggers a state ignores
fn next_state(
    state: RegistrationState,
    trigger: RegistrationTrigger,
) -> Option<RegistrationState> {
    use RegistrationState::*;
    use RegistrationTrigger::*;

    match (state, trigger) {
        (_, ReceivedErrorReport) => Some(RegistrationWait),
        (_, ReceivedRequestReservations) => Some(RegistrationWait),
        (_, ReceivedReportPrice) => Some(RegistrationWait),

        (RegistrationWait, SuccessReserveWithOffer) => Some(OfferWait),
        (RegistrationWait, SuccessReserveWithAggregate) => Some(AggregateWait),
        (RegistrationWait, FailReserve) => Some(RegistrationWait),
        (RegistrationWait, ReceivedRequestOffers) => Some(RegistrationWait),
        (RegistrationWait, ReceivedReportAggregate) => Some(RegistrationWait),

        (OfferWait, ReceivedRequestOffers) => Some(OfferWait),
        (OfferWait, SuccessOffers) => Some(PriceWait),
        (OfferWait, FailOffers) => Some(RegistrationWait),
        (OfferWait, ReceivedReportAggregate) => Some(OfferWait),

        (AggregateWait, ReceivedRequestOffers) => Some(AggregateWait),
        (AggregateWait, SuccessOffers) => Some(PriceWait),
        (AggregateWait, ReceivedReportAggregate) => Some(OfferWait),

        (PriceWait, ReceivedRequestOffers) => Some(RegistrationWait),
        (PriceWait, ReceivedReportAggregate) => Some(PriceWait),

        _ => None,
    }
}

/// One participant's registration in one market
#[derive(Debug, Clone)]
pub struct MarketRegistration {
    market_name: MarketName,
    side: Side,
    state: RegistrationState,
    has_reservation: bool,
}

impl MarketRegistration {
    pub fn new(market_name: impl Into<MarketName>, side: Side) -> Self {
        Self {
            market_name: market_name.into(),
            side,
            state: RegistrationState::RegistrationWait,
            has_reservation: false,
        }
    }

    pub fn market_name(&self) -> &str {
        &self.market_name
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn state(&self) -> RegistrationState {
        self.state
    }

    pub fn has_reservation(&self) -> bool {
        self.has_reservation
    }

    /// Apply a trigger and return the resulting state
    pub fn fire(&mut self, trigger: RegistrationTrigger) -> RegistrationState {
        match next_state(self.state, trigger) {
            Some(next) => {
                self.state = next;
                // Back at the start of a round means the reservation is gone
                self.has_reservation = match (next, trigger) {
                    (RegistrationState::RegistrationWait, _) => false,
                    (
                        _,
                        RegistrationTrigger::SuccessReserveWithOffer
                        | RegistrationTrigger::SuccessReserveWithAggregate,
                    ) => true,
                    _ => self.has_reservation,
                };
            }
            None => debug!(
                "[REGISTRATION] {} {} ignored {:?} in {:?}",
                self.market_name, self.side, trigger, self.state
            ),
        }
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::RegistrationState::*;
    use super::RegistrationTrigger::*;
    use super::*;

    #[test]
    fn test_offer_round_trip_through_states() {
        let mut reg = MarketRegistration::new("electricity", Side::Buy);

        assert_eq!(reg.fire(ReceivedRequestReservations), RegistrationWait);
        assert_eq!(reg.fire(SuccessReserveWithOffer), OfferWait);
        assert!(reg.has_reservation());
        assert_eq!(reg.fire(ReceivedRequestOffers), OfferWait);
        assert_eq!(reg.fire(SuccessOffers), PriceWait);
        assert!(reg.has_reservation());
        assert_eq!(reg.fire(ReceivedReportPrice), RegistrationWait);
        assert!(!reg.has_reservation());
    }

    #[test]
    fn test_aggregate_path() {
        let mut reg = MarketRegistration::new("electricity", Side::Sell);

        reg.fire(SuccessReserveWithAggregate);
        assert_eq!(reg.state(), AggregateWait);
        assert_eq!(reg.fire(ReceivedRequestOffers), AggregateWait);
        assert_eq!(reg.fire(ReceivedReportAggregate), OfferWait);
        assert_eq!(reg.fire(SuccessOffers), PriceWait);
    }

    #[test]
    fn test_failed_reservation_stays_waiting() {
        let mut reg = MarketRegistration::new("electricity", Side::Buy);
        assert_eq!(reg.fire(FailReserve), RegistrationWait);
        assert!(!reg.has_reservation());
        // Offers requested without a reservation change nothing
        assert_eq!(reg.fire(ReceivedRequestOffers), RegistrationWait);
    }

    #[test]
    fn test_ignored_triggers_keep_state() {
        let mut reg = MarketRegistration::new("electricity", Side::Buy);
        reg.fire(SuccessReserveWithOffer);

        assert_eq!(reg.fire(FailReserve), OfferWait);
        assert_eq!(reg.fire(SuccessReserveWithAggregate), OfferWait);
        assert!(reg.has_reservation());

        reg.fire(SuccessOffers);
        assert_eq!(reg.fire(SuccessOffers), PriceWait);
        // A new round's request for offers while waiting for a price resets
        assert_eq!(reg.fire(ReceivedRequestOffers), RegistrationWait);
    }

    #[test]
    fn test_error_resets_from_any_state() {
        for start in [SuccessReserveWithOffer, SuccessReserveWithAggregate] {
            let mut reg = MarketRegistration::new("electricity", Side::Sell);
            reg.fire(start);
            assert_eq!(reg.fire(ReceivedErrorReport), RegistrationWait);
            assert!(!reg.has_reservation());
        }
    }
}
