//! Market - one named market and its round state
//!
//! ```text
//! AcceptReservations ──collect_offers (formed)──► AcceptOffers ──clear──► Cleared
//!         │
//!         └──collect_offers (not formed)──► Void
//! ```
//!
//! `reset` returns any state to `AcceptReservations` for the next round.

use gridmarket_core::{MarketName, MarketParticipant, ParticipantId, PolyLine, Price, Quantity, Side};
use gridmarket_ports::ClearingAlgorithm;
use gridmarket_reservation::{ReservationManager, ReservationSnapshot};
use log::{debug, info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{MarketError, OfferError, Result};
use crate::offers::OfferManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketState {
    AcceptReservations,
    AcceptOffers,
    Cleared,
    /// Round abandoned: one side had no reservations
    Void,
}

/// Result of clearing one market
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearingOutcome {
    pub market_name: MarketName,
    pub price: Price,
    pub quantity: Quantity,
    /// Buyers whose offers were cleared
    pub buyers: Vec<ParticipantId>,
    /// Sellers whose offers were cleared
    pub sellers: Vec<ParticipantId>,
    /// Reserved but never offered
    pub unconfirmed: Vec<ParticipantId>,
}

pub struct Market {
    name: MarketName,
    state: Mutex<MarketState>,
    reservations: ReservationManager,
    offers: OfferManager,
}

impl Market {
    pub fn new(name: impl Into<MarketName>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::new(MarketState::AcceptReservations),
            reservations: ReservationManager::new(),
            offers: OfferManager::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> MarketState {
        *self.state.lock()
    }

    pub fn reservation_snapshot(&self) -> ReservationSnapshot {
        self.reservations.snapshot()
    }

    pub fn has_market_formed(&self) -> bool {
        self.reservations.has_market_formed()
    }

    fn wrong_state(&self, state: MarketState, operation: &'static str) -> MarketError {
        MarketError::WrongState {
            market_name: self.name.clone(),
            state,
            operation,
        }
    }

    pub fn make_reservation(&self, participant: &MarketParticipant) -> Result<()> {
        let state = self.state.lock();
        if *state != MarketState::AcceptReservations {
            return Err(self.wrong_state(*state, "make a reservation"));
        }

        self.reservations.make_reservation(participant)?;
        Ok(())
    }

    /// Close reservations and decide whether this round trades
    pub fn collect_offers(&self) -> Result<()> {
        let mut state = self.state.lock();
        if *state != MarketState::AcceptReservations {
            return Err(self.wrong_state(*state, "collect offers"));
        }

        if self.reservations.has_market_formed() {
            *state = MarketState::AcceptOffers;
            debug!(
                "[MARKET] {} formed with {} buyers, {} sellers",
                self.name,
                self.reservations.buyer_count(),
                self.reservations.seller_count()
            );
            Ok(())
        } else {
            *state = MarketState::Void;
            let buyers = self.reservations.buyer_count();
            let sellers = self.reservations.seller_count();
            info!(
                "[MARKET] {} did not form: buyers={}, sellers={}",
                self.name, buyers, sellers
            );
            Err(MarketError::NotFormed {
                market_name: self.name.clone(),
                buyers,
                sellers,
            })
        }
    }

    /// Submit a participant's curve, consuming its reservation
    pub fn make_offer(&self, participant: &MarketParticipant, curve: PolyLine) -> Result<()> {
        let state = self.state.lock();
        if *state != MarketState::AcceptOffers {
            return Err(self.wrong_state(*state, "accept an offer"));
        }

        if curve.is_empty() {
            return Err(OfferError::EmptyCurve {
                identity: participant.identity.clone(),
                side: participant.side,
            }
            .into());
        }

        self.reservations.take_reservation(participant)?;
        self.offers.make_offer(participant, curve)?;
        Ok(())
    }

    /// Clear the round with the given algorithm
    pub fn clear(&self, algorithm: &dyn ClearingAlgorithm) -> Result<ClearingOutcome> {
        let mut state = self.state.lock();
        if *state != MarketState::AcceptOffers {
            return Err(self.wrong_state(*state, "clear"));
        }
        *state = MarketState::Cleared;

        let mut unconfirmed = self.reservations.untaken(Side::Buy);
        unconfirmed.extend(self.reservations.untaken(Side::Sell));
        if !unconfirmed.is_empty() {
            warn!(
                "[MARKET] {} participants reserved in {} without offering: {:?}",
                unconfirmed.len(),
                self.name,
                unconfirmed
            );
        }

        let demand = self.offers.aggregate_demand()?;
        let supply = self.offers.aggregate_supply()?;
        let cleared = algorithm.clear(&demand, &supply)?;

        info!(
            "[MARKET] {} cleared at price={} quantity={} ({})",
            self.name,
            cleared.price,
            cleared.quantity,
            algorithm.name()
        );

        Ok(ClearingOutcome {
            market_name: self.name.clone(),
            price: cleared.price,
            quantity: cleared.quantity,
            buyers: self.offers.buy_offers().into_keys().collect(),
            sellers: self.offers.sell_offers().into_keys().collect(),
            unconfirmed,
        })
    }

    /// Horizontal sum of the curves offered so far on `side`
    pub fn aggregate(&self, side: Side) -> Result<PolyLine> {
        Ok(self.offers.aggregate(side)?)
    }

    /// Drop reservations and offers and reopen for reservations
    pub fn reset(&self) {
        let mut state = self.state.lock();
        self.reservations.clear();
        self.offers.clear();
        *state = MarketState::AcceptReservations;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridmarket_clearing::CurveIntersectionClearing;
    use gridmarket_core::Point;
    use gridmarket_ports::{ClearingError, ReservationError};
    use rust_decimal_macros::dec;

    fn demand_curve() -> PolyLine {
        PolyLine::from_points([
            Point::new(dec!(0), dec!(1000)),
            Point::new(dec!(1000), dec!(0)),
        ])
    }

    fn supply_curve() -> PolyLine {
        PolyLine::from_points([
            Point::new(dec!(0), dec!(100)),
            Point::new(dec!(1000), dec!(100)),
        ])
    }

    fn formed_market() -> (Market, MarketParticipant, MarketParticipant) {
        let market = Market::new("electricity");
        let buyer = MarketParticipant::buyer("B1");
        let seller = MarketParticipant::seller("S1");
        market.make_reservation(&buyer).unwrap();
        market.make_reservation(&seller).unwrap();
        market.collect_offers().unwrap();
        (market, buyer, seller)
    }

    #[test]
    fn test_full_round() {
        let (market, buyer, seller) = formed_market();
        assert_eq!(market.state(), MarketState::AcceptOffers);

        market.make_offer(&buyer, demand_curve()).unwrap();
        market.make_offer(&seller, supply_curve()).unwrap();

        let outcome = market.clear(&CurveIntersectionClearing::new()).unwrap();

        assert_eq!(outcome.price, dec!(100));
        assert_eq!(outcome.quantity, dec!(900));
        assert_eq!(outcome.buyers, vec![ParticipantId::new("B1")]);
        assert_eq!(outcome.sellers, vec![ParticipantId::new("S1")]);
        assert!(outcome.unconfirmed.is_empty());
        assert_eq!(market.state(), MarketState::Cleared);
    }

    #[test]
    fn test_void_when_one_side_missing() {
        let market = Market::new("electricity");
        market
            .make_reservation(&MarketParticipant::buyer("B1"))
            .unwrap();

        let err = market.collect_offers().unwrap_err();

        assert_eq!(
            err,
            MarketError::NotFormed {
                market_name: "electricity".to_string(),
                buyers: 1,
                sellers: 0,
            }
        );
        assert_eq!(market.state(), MarketState::Void);
        assert!(matches!(
            market.make_offer(&MarketParticipant::buyer("B1"), demand_curve()),
            Err(MarketError::WrongState { .. })
        ));
    }

    #[test]
    fn test_reservations_closed_after_collect() {
        let (market, _, _) = formed_market();
        let err = market
            .make_reservation(&MarketParticipant::buyer("B2"))
            .unwrap_err();
        assert!(matches!(err, MarketError::WrongState { .. }));
        assert_eq!(market.reservation_snapshot().buyers, 1);
    }

    #[test]
    fn test_offer_requires_reservation() {
        let (market, _, _) = formed_market();
        let err = market
            .make_offer(&MarketParticipant::buyer("B9"), demand_curve())
            .unwrap_err();

        assert!(matches!(
            err,
            MarketError::Reservation(ReservationError::NoSuchReservation { .. })
        ));
        assert!(err.is_participant_fault());
    }

    #[test]
    fn test_second_offer_rejected() {
        let (market, buyer, _) = formed_market();
        market.make_offer(&buyer, demand_curve()).unwrap();

        let err = market.make_offer(&buyer, demand_curve()).unwrap_err();
        assert!(matches!(
            err,
            MarketError::Reservation(ReservationError::AlreadyTaken { .. })
        ));
    }

    #[test]
    fn test_empty_curve_keeps_reservation() {
        let (market, buyer, _) = formed_market();

        let err = market.make_offer(&buyer, PolyLine::new()).unwrap_err();
        assert!(matches!(err, MarketError::Offer(OfferError::EmptyCurve { .. })));

        // The reservation was not consumed, a valid curve still goes through
        market.make_offer(&buyer, demand_curve()).unwrap();
    }

    #[test]
    fn test_clearing_failure_still_closes_round() {
        let (market, buyer, _) = formed_market();
        market.make_offer(&buyer, demand_curve()).unwrap();

        let err = market.clear(&CurveIntersectionClearing::new()).unwrap_err();

        assert_eq!(err, MarketError::Clearing(ClearingError::NoSupply));
        assert_eq!(market.state(), MarketState::Cleared);
    }

    #[test]
    fn test_reset_reopens() {
        let (market, buyer, seller) = formed_market();
        market.make_offer(&buyer, demand_curve()).unwrap();
        market.make_offer(&seller, supply_curve()).unwrap();
        market.clear(&CurveIntersectionClearing::new()).unwrap();

        market.reset();

        assert_eq!(market.state(), MarketState::AcceptReservations);
        assert_eq!(market.reservation_snapshot(), ReservationSnapshot::default());
        market.make_reservation(&buyer).unwrap();
    }

    #[test]
    fn test_large_curves_clear() {
        let (market, buyer, seller) = formed_market();
        market
            .make_offer(
                &buyer,
                PolyLine::from_points([
                    Point::new(dec!(0), dec!(10000000000)),
                    Point::new(dec!(10000000000), dec!(0)),
                ]),
            )
            .unwrap();
        market
            .make_offer(
                &seller,
                PolyLine::from_points([
                    Point::new(dec!(0), dec!(0)),
                    Point::new(dec!(10000000000), dec!(10000000000)),
                ]),
            )
            .unwrap();

        let outcome = market.clear(&CurveIntersectionClearing::new()).unwrap();

        assert_eq!(outcome.price, dec!(5000000000));
        assert_eq!(outcome.quantity, dec!(5000000000));
    }

    #[test]
    fn test_oversized_curves_report_overflow() {
        let huge = dec!(1000000000000000);
        let (market, buyer, seller) = formed_market();
        market
            .make_offer(
                &buyer,
                PolyLine::from_points([Point::new(dec!(0), huge), Point::new(huge, dec!(0))]),
            )
            .unwrap();
        market
            .make_offer(
                &seller,
                PolyLine::from_points([Point::new(dec!(0), dec!(0)), Point::new(huge, huge)]),
            )
            .unwrap();

        let err = market.clear(&CurveIntersectionClearing::new()).unwrap_err();

        assert!(matches!(err, MarketError::Clearing(ClearingError::Overflow(_))));
        assert_eq!(market.state(), MarketState::Cleared);
    }

    #[test]
    fn test_aggregate_of_offers_so_far() {
        let (market, buyer, _) = formed_market();
        market.make_offer(&buyer, demand_curve()).unwrap();

        assert_eq!(market.aggregate(Side::Buy).unwrap(), demand_curve());
        assert!(market.aggregate(Side::Sell).unwrap().is_empty());
    }
}
