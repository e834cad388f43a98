//! Messages the director publishes on the market event bus

use gridmarket_core::{MarketName, PolyLine, Price, Quantity, Side, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketEvent {
    /// Reservations are open for this round
    RequestReservations { round: u64, timestamp: Timestamp },

    /// Reservations are closed, reserved participants may offer
    RequestOffers { round: u64, timestamp: Timestamp },

    /// Aggregate of the curves offered on `side` so far, for participants
    /// that wait for the other side before offering
    ReportAggregate {
        round: u64,
        timestamp: Timestamp,
        market_name: MarketName,
        side: Side,
        curve: PolyLine,
    },

    ClearedPrice {
        round: u64,
        timestamp: Timestamp,
        market_name: MarketName,
        price: Price,
        quantity: Quantity,
    },

    MarketError {
        round: u64,
        timestamp: Timestamp,
        market_name: MarketName,
        message: String,
    },
}

impl MarketEvent {
    pub fn round(&self) -> u64 {
        match self {
            MarketEvent::RequestReservations { round, .. }
            | MarketEvent::RequestOffers { round, .. }
            | MarketEvent::ReportAggregate { round, .. }
            | MarketEvent::ClearedPrice { round, .. }
            | MarketEvent::MarketError { round, .. } => *round,
        }
    }

    /// Market this event is about, if it targets a single market
    pub fn market_name(&self) -> Option<&str> {
        match self {
            MarketEvent::ReportAggregate { market_name, .. }
            | MarketEvent::ClearedPrice { market_name, .. }
            | MarketEvent::MarketError { market_name, .. } => Some(market_name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn test_event_wire_format() {
        let event = MarketEvent::ClearedPrice {
            round: 3,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            market_name: "electricity".to_string(),
            price: dec!(100),
            quantity: dec!(900),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "cleared_price");
        assert_eq!(json["market_name"], "electricity");

        let back: MarketEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
        assert_eq!(back.round(), 3);
        assert_eq!(back.market_name(), Some("electricity"));
    }

    #[test]
    fn test_aggregate_wire_format() {
        let event = MarketEvent::ReportAggregate {
            round: 1,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            market_name: "electricity".to_string(),
            side: Side::Buy,
            curve: PolyLine::from_points([gridmarket_core::Point::new(dec!(10), dec!(5))]),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "report_aggregate");
        assert_eq!(json["side"], "buyer");

        let back: MarketEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
        assert_eq!(back.market_name(), Some("electricity"));
    }
}
