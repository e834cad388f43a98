//! Director - drives market rounds
//!
//! Every `market_period` the director:
//! 1. Resets all markets
//! 2. Waits `reservation_delay`, then publishes `RequestReservations`
//! 3. Waits `offer_delay`, closes reservations, publishes `RequestOffers`
//! 4. Halfway through `clear_delay`, publishes each formed market's
//!    aggregate demand and supply for participants that offer in response
//! 5. At the end of `clear_delay`, clears every formed market, publishes prices
//!
//! Participant faults never abort a round: the faulty participant simply
//! has no reservation or offer in it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use gridmarket_clearing::create_clearing_algorithm;
use gridmarket_core::MarketName;
use gridmarket_ports::{ClearingAlgorithm, Clock};
use log::{debug, info, warn};
use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::config::MarketServiceConfig;
use crate::error::MarketError;
use crate::events::MarketEvent;
use crate::market::ClearingOutcome;
use crate::market_list::MarketList;

/// What happened in one round
#[derive(Debug, Clone)]
pub struct RoundReport {
    pub round: u64,
    pub cleared: Vec<ClearingOutcome>,
    /// Markets that did not form or failed to clear
    pub errors: Vec<(MarketName, MarketError)>,
}

pub struct Director {
    markets: Arc<MarketList>,
    config: MarketServiceConfig,
    clock: Arc<dyn Clock>,
    algorithm: Box<dyn ClearingAlgorithm>,
    events: broadcast::Sender<MarketEvent>,
    round: AtomicU64,
}

impl Director {
    pub fn new(
        markets: Arc<MarketList>,
        config: MarketServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let algorithm = create_clearing_algorithm(&config.clearing_algorithm);
        let (events, _) = broadcast::channel(config.event_capacity);

        Self {
            markets,
            config,
            clock,
            algorithm,
            events,
            round: AtomicU64::new(0),
        }
    }

    /// Subscribe to the market event bus
    pub fn subscribe(&self) -> broadcast::Receiver<MarketEvent> {
        self.events.subscribe()
    }

    pub fn markets(&self) -> Arc<MarketList> {
        self.markets.clone()
    }

    pub fn rounds_started(&self) -> u64 {
        self.round.load(Ordering::SeqCst)
    }

    fn publish(&self, event: MarketEvent) {
        if self.events.send(event).is_err() {
            debug!("[DIRECTOR] No subscribers for market event");
        }
    }

    /// Run one complete round
    pub async fn run_round(&self) -> RoundReport {
        let round = self.round.fetch_add(1, Ordering::SeqCst) + 1;
        self.markets.reset_all();

        time::sleep(self.config.reservation_delay()).await;
        info!("[DIRECTOR] Round {} requesting reservations", round);
        self.publish(MarketEvent::RequestReservations {
            round,
            timestamp: self.clock.now(),
        });

        time::sleep(self.config.offer_delay()).await;
        let mut errors = Vec::new();
        for (market_name, err) in self.markets.collect_offers() {
            self.publish(MarketEvent::MarketError {
                round,
                timestamp: self.clock.now(),
                market_name: market_name.clone(),
                message: err.to_string(),
            });
            errors.push((market_name, err));
        }
        info!("[DIRECTOR] Round {} requesting offers", round);
        self.publish(MarketEvent::RequestOffers {
            round,
            timestamp: self.clock.now(),
        });

        let aggregate_delay = self.config.clear_delay() / 2;
        time::sleep(aggregate_delay).await;
        self.report_aggregates(round);

        time::sleep(self.config.clear_delay() - aggregate_delay).await;
        let mut cleared = Vec::new();
        for (market_name, result) in self.markets.clear_markets(self.algorithm.as_ref()) {
            match result {
                Ok(outcome) => {
                    self.publish(MarketEvent::ClearedPrice {
                        round,
                        timestamp: self.clock.now(),
                        market_name,
                        price: outcome.price,
                        quantity: outcome.quantity,
                    });
                    cleared.push(outcome);
                }
                Err(err) => {
                    warn!("[DIRECTOR] Market {} failed to clear: {}", market_name, err);
                    self.publish(MarketEvent::MarketError {
                        round,
                        timestamp: self.clock.now(),
                        market_name: market_name.clone(),
                        message: err.to_string(),
                    });
                    errors.push((market_name, err));
                }
            }
        }

        info!(
            "[DIRECTOR] Round {} done: {} cleared, {} errors",
            round,
            cleared.len(),
            errors.len()
        );
        RoundReport {
            round,
            cleared,
            errors,
        }
    }

    fn report_aggregates(&self, round: u64) {
        for (market_name, side, result) in self.markets.aggregates() {
            match result {
                Ok(curve) => {
                    debug!(
                        "[DIRECTOR] Round {} {} {} aggregate has {} points",
                        round,
                        market_name,
                        side,
                        curve.len()
                    );
                    self.publish(MarketEvent::ReportAggregate {
                        round,
                        timestamp: self.clock.now(),
                        market_name,
                        side,
                        curve,
                    });
                }
                // Clearing hits the same overflow and reports it
                Err(err) => warn!(
                    "[DIRECTOR] Market {} {} aggregate unavailable: {}",
                    market_name, side, err
                ),
            }
        }
    }

    fn ticker(&self) -> time::Interval {
        let mut ticker = time::interval(self.config.market_period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }

    /// Run `rounds` rounds, one every `market_period`
    pub async fn run(&self, rounds: u64) -> Vec<RoundReport> {
        let mut ticker = self.ticker();
        let mut reports = Vec::new();
        for _ in 0..rounds {
            ticker.tick().await;
            reports.push(self.run_round().await);
        }
        reports
    }

    /// Run a round every `market_period` until the task is dropped
    pub async fn run_forever(&self) {
        let mut ticker = self.ticker();
        loop {
            ticker.tick().await;
            self.run_round().await;
        }
    }
}
