use serde::{Deserialize, Serialize};
use std::fmt;

/// Market side a participant reserves (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "buyer")]
    Buy,
    #[serde(rename = "seller")]
    Sell,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buyer"),
            Side::Sell => write!(f, "seller"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Side::Buy).unwrap(), "\"buyer\"");
        let side: Side = serde_json::from_str("\"seller\"").unwrap();
        assert_eq!(side, Side::Sell);
        assert_eq!(Side::Sell.to_string(), "seller");
    }
}
