use serde::{Deserialize, Serialize};
use std::fmt;

use super::Side;

/// Stable identity of a market participant (the agent's platform identity)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(identity: &str) -> Self {
        Self::new(identity)
    }
}

impl From<String> for ParticipantId {
    fn from(identity: String) -> Self {
        Self(identity)
    }
}

/// A participant in one market: who it is and which side it trades on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketParticipant {
    pub identity: ParticipantId,
    pub side: Side,
}

impl MarketParticipant {
    pub fn new(identity: impl Into<ParticipantId>, side: Side) -> Self {
        Self {
            identity: identity.into(),
            side,
        }
    }

    /// Create a buying participant
    pub fn buyer(identity: impl Into<ParticipantId>) -> Self {
        Self::new(identity, Side::Buy)
    }

    /// Create a selling participant
    pub fn seller(identity: impl Into<ParticipantId>) -> Self {
        Self::new(identity, Side::Sell)
    }

    pub fn is_buyer(&self) -> bool {
        self.side == Side::Buy
    }
}

impl fmt::Display for MarketParticipant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.identity, self.side)
    }
}
