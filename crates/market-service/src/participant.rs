//! Simulated market participant
//!
//! An agent that listens on the event bus and, every round, reserves on its
//! side and offers the same curve. In [`OfferMode::Immediate`] it offers as
//! soon as offers are requested; in [`OfferMode::AfterAggregate`] it waits for
//! the other side's aggregate curve first. Used by the service binary to
//! populate markets from configuration, and by tests.

use std::sync::Arc;

use gridmarket_core::{MarketName, MarketParticipant, PolyLine, Price, Quantity, Side};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use crate::config::ParticipantConfig;
use crate::events::MarketEvent;
use crate::market_list::MarketList;
use crate::registration::{MarketRegistration, RegistrationState, RegistrationTrigger};

/// When a reserved participant submits its curve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferMode {
    /// On `RequestOffers`
    #[default]
    Immediate,
    /// On the other side's `ReportAggregate`
    AfterAggregate,
}

/// What a participant saw over its lifetime
#[derive(Debug, Clone, Default)]
pub struct ParticipantReport {
    pub reservations: usize,
    pub offers: usize,
    /// Aggregates from the other side that it offered against
    pub aggregates: usize,
    /// (round, price, quantity) for every cleared round it offered in
    pub prices: Vec<(u64, Price, Quantity)>,
    pub errors: Vec<String>,
}

pub struct SimulatedParticipant {
    participant: MarketParticipant,
    registration: MarketRegistration,
    curve: PolyLine,
    offer_mode: OfferMode,
    markets: Arc<MarketList>,
    report: ParticipantReport,
}

impl SimulatedParticipant {
    pub fn new(
        identity: &str,
        market_name: impl Into<MarketName>,
        side: Side,
        curve: PolyLine,
        markets: Arc<MarketList>,
    ) -> Self {
        Self {
            participant: MarketParticipant::new(identity, side),
            registration: MarketRegistration::new(market_name, side),
            curve,
            offer_mode: OfferMode::Immediate,
            markets,
            report: ParticipantReport::default(),
        }
    }

    pub fn with_offer_mode(mut self, offer_mode: OfferMode) -> Self {
        self.offer_mode = offer_mode;
        self
    }

    pub fn from_config(config: &ParticipantConfig, markets: Arc<MarketList>) -> Self {
        Self::new(
            &config.identity,
            config.market_name.clone(),
            config.side,
            config.curve(),
            markets,
        )
        .with_offer_mode(config.offer_mode)
    }

    pub fn participant(&self) -> &MarketParticipant {
        &self.participant
    }

    /// Run on its own task until the event bus closes
    pub fn spawn(self, events: broadcast::Receiver<MarketEvent>) -> JoinHandle<ParticipantReport> {
        tokio::spawn(self.run(events))
    }

    pub async fn run(mut self, mut events: broadcast::Receiver<MarketEvent>) -> ParticipantReport {
        loop {
            match events.recv().await {
                Ok(event) => self.handle(event),
                Err(RecvError::Lagged(missed)) => {
                    warn!(
                        "[PARTICIPANT] {} missed {} market events",
                        self.participant, missed
                    );
                }
                Err(RecvError::Closed) => break,
            }
        }
        debug!("[PARTICIPANT] {} leaving the market", self.participant);
        self.report
    }

    fn handle(&mut self, event: MarketEvent) {
        if let Some(market_name) = event.market_name()
            && market_name != self.registration.market_name()
        {
            return;
        }

        match event {
            MarketEvent::RequestReservations { .. } => self.on_request_reservations(),
            MarketEvent::RequestOffers { .. } => self.on_request_offers(),
            MarketEvent::ReportAggregate { side, curve, .. } => {
                if side == self.participant.side.opposite() {
                    self.on_report_aggregate(&curve);
                }
            }
            MarketEvent::ClearedPrice {
                round,
                price,
                quantity,
                ..
            } => {
                if self.registration.state() == RegistrationState::PriceWait {
                    info!(
                        "[PARTICIPANT] {} round {} cleared at {} for {}",
                        self.participant, round, price, quantity
                    );
                    self.report.prices.push((round, price, quantity));
                }
                self.registration
                    .fire(RegistrationTrigger::ReceivedReportPrice);
            }
            MarketEvent::MarketError { message, .. } => {
                self.report.errors.push(message);
                self.registration
                    .fire(RegistrationTrigger::ReceivedErrorReport);
            }
        }
    }

    fn on_request_reservations(&mut self) {
        self.registration
            .fire(RegistrationTrigger::ReceivedRequestReservations);
        if self.registration.state() != RegistrationState::RegistrationWait {
            return;
        }

        match self
            .markets
            .make_reservation(self.registration.market_name(), &self.participant)
        {
            Ok(()) => {
                self.report.reservations += 1;
                self.registration.fire(match self.offer_mode {
                    OfferMode::Immediate => RegistrationTrigger::SuccessReserveWithOffer,
                    OfferMode::AfterAggregate => RegistrationTrigger::SuccessReserveWithAggregate,
                });
            }
            Err(err) => {
                warn!("[PARTICIPANT] {} reservation failed: {}", self.participant, err);
                self.report.errors.push(err.to_string());
                self.registration.fire(RegistrationTrigger::FailReserve);
            }
        }
    }

    fn on_request_offers(&mut self) {
        self.registration
            .fire(RegistrationTrigger::ReceivedRequestOffers);
        if self.registration.state() != RegistrationState::OfferWait
            || !self.registration.has_reservation()
        {
            return;
        }
        self.submit_offer();
    }

    fn on_report_aggregate(&mut self, aggregate: &PolyLine) {
        let waiting = self.registration.state() == RegistrationState::AggregateWait;
        self.registration
            .fire(RegistrationTrigger::ReceivedReportAggregate);
        if !waiting || !self.registration.has_reservation() {
            return;
        }

        debug!(
            "[PARTICIPANT] {} offering against {} aggregate of {} points",
            self.participant,
            self.participant.side.opposite(),
            aggregate.len()
        );
        self.report.aggregates += 1;
        self.submit_offer();
    }

    fn submit_offer(&mut self) {
        match self.markets.make_offer(
            self.registration.market_name(),
            &self.participant,
            self.curve.clone(),
        ) {
            Ok(()) => {
                self.report.offers += 1;
                self.registration.fire(RegistrationTrigger::SuccessOffers);
            }
            Err(err) => {
                warn!("[PARTICIPANT] {} offer failed: {}", self.participant, err);
                self.report.errors.push(err.to_string());
                self.registration.fire(RegistrationTrigger::FailOffers);
            }
        }
    }
}
