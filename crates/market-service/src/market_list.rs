//! MarketList - every market the service runs, by name

use std::collections::BTreeMap;

use gridmarket_core::{MarketName, MarketParticipant, PolyLine, Side};
use gridmarket_ports::ClearingAlgorithm;
use gridmarket_reservation::ReservationSnapshot;
use parking_lot::RwLock;

use crate::error::{MarketError, Result};
use crate::market::{ClearingOutcome, Market, MarketState};

#[derive(Default)]
pub struct MarketList {
    markets: RwLock<BTreeMap<MarketName, Market>>,
}

impl MarketList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a market; returns false if it already exists
    pub fn add_market(&self, market_name: &str) -> bool {
        let mut markets = self.markets.write();
        if markets.contains_key(market_name) {
            return false;
        }
        markets.insert(market_name.to_string(), Market::new(market_name));
        true
    }

    /// Reserve in `market_name`, creating the market on first use
    pub fn make_reservation(&self, market_name: &str, participant: &MarketParticipant) -> Result<()> {
        {
            let markets = self.markets.read();
            if let Some(market) = markets.get(market_name) {
                return market.make_reservation(participant);
            }
        }

        let mut markets = self.markets.write();
        markets
            .entry(market_name.to_string())
            .or_insert_with(|| Market::new(market_name))
            .make_reservation(participant)
    }

    pub fn make_offer(
        &self,
        market_name: &str,
        participant: &MarketParticipant,
        curve: PolyLine,
    ) -> Result<()> {
        let markets = self.markets.read();
        let market = markets
            .get(market_name)
            .ok_or_else(|| MarketError::UnknownMarket(market_name.to_string()))?;
        market.make_offer(participant, curve)
    }

    /// Close reservations everywhere; returns the markets that did not form
    pub fn collect_offers(&self) -> Vec<(MarketName, MarketError)> {
        let markets = self.markets.read();
        markets
            .iter()
            .filter_map(|(name, market)| market.collect_offers().err().map(|e| (name.clone(), e)))
            .collect()
    }

    /// Both sides' aggregate curves for every market accepting offers
    pub fn aggregates(&self) -> Vec<(MarketName, Side, Result<PolyLine>)> {
        let markets = self.markets.read();
        markets
            .iter()
            .filter(|(_, market)| market.state() == MarketState::AcceptOffers)
            .flat_map(|(name, market)| {
                [Side::Buy, Side::Sell]
                    .into_iter()
                    .map(move |side| (name.clone(), side, market.aggregate(side)))
            })
            .collect()
    }

    /// Clear every market that is accepting offers
    pub fn clear_markets(
        &self,
        algorithm: &dyn ClearingAlgorithm,
    ) -> Vec<(MarketName, Result<ClearingOutcome>)> {
        let markets = self.markets.read();
        markets
            .iter()
            .filter(|(_, market)| market.state() == MarketState::AcceptOffers)
            .map(|(name, market)| (name.clone(), market.clear(algorithm)))
            .collect()
    }

    pub fn reset_all(&self) {
        for market in self.markets.read().values() {
            market.reset();
        }
    }

    pub fn market_names(&self) -> Vec<MarketName> {
        self.markets.read().keys().cloned().collect()
    }

    pub fn market_count(&self) -> usize {
        self.markets.read().len()
    }

    pub fn state(&self, market_name: &str) -> Option<MarketState> {
        self.markets.read().get(market_name).map(Market::state)
    }

    pub fn reservation_snapshot(&self, market_name: &str) -> Option<ReservationSnapshot> {
        self.markets
            .read()
            .get(market_name)
            .map(Market::reservation_snapshot)
    }
}
