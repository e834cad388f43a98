//! Offer Manager
//!
//! Holds the curves submitted by participants that took their reservation.
//! One curve per participant per round.

use std::collections::BTreeMap;

use gridmarket_clearing::aggregate;
use gridmarket_core::{MarketParticipant, ParticipantId, PolyLine, Side};
use gridmarket_ports::ClearingResult;
use parking_lot::Mutex;

use crate::error::OfferError;

#[derive(Debug, Default)]
struct Offers {
    buy: BTreeMap<ParticipantId, PolyLine>,
    sell: BTreeMap<ParticipantId, PolyLine>,
}

impl Offers {
    fn side(&self, side: Side) -> &BTreeMap<ParticipantId, PolyLine> {
        match side {
            Side::Buy => &self.buy,
            Side::Sell => &self.sell,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut BTreeMap<ParticipantId, PolyLine> {
        match side {
            Side::Buy => &mut self.buy,
            Side::Sell => &mut self.sell,
        }
    }
}

#[derive(Debug, Default)]
pub struct OfferManager {
    offers: Mutex<Offers>,
}

impl OfferManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a participant's curve for this round
    pub fn make_offer(
        &self,
        participant: &MarketParticipant,
        curve: PolyLine,
    ) -> Result<(), OfferError> {
        if curve.is_empty() {
            return Err(OfferError::EmptyCurve {
                identity: participant.identity.clone(),
                side: participant.side,
            });
        }

        let mut offers = self.offers.lock();
        let book = offers.side_mut(participant.side);
        if book.contains_key(&participant.identity) {
            return Err(OfferError::DuplicateOffer {
                identity: participant.identity.clone(),
                side: participant.side,
            });
        }

        book.insert(participant.identity.clone(), curve);
        Ok(())
    }

    /// Demand curves keyed by buyer
    pub fn buy_offers(&self) -> BTreeMap<ParticipantId, PolyLine> {
        self.offers.lock().buy.clone()
    }

    /// Supply curves keyed by seller
    pub fn sell_offers(&self) -> BTreeMap<ParticipantId, PolyLine> {
        self.offers.lock().sell.clone()
    }

    pub fn offer_count(&self, side: Side) -> usize {
        self.offers.lock().side(side).len()
    }

    /// Horizontal sum of all demand curves
    pub fn aggregate_demand(&self) -> ClearingResult<PolyLine> {
        self.aggregate(Side::Buy)
    }

    /// Horizontal sum of all supply curves
    pub fn aggregate_supply(&self) -> ClearingResult<PolyLine> {
        self.aggregate(Side::Sell)
    }

    pub fn aggregate(&self, side: Side) -> ClearingResult<PolyLine> {
        let curves: Vec<PolyLine> = self.offers.lock().side(side).values().cloned().collect();
        aggregate(&curves)
    }

    pub fn clear(&self) {
        let mut offers = self.offers.lock();
        offers.buy.clear();
        offers.sell.clear();
    }
}
