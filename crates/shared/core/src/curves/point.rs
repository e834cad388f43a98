use serde::{Deserialize, Serialize};

use crate::values::{Price, Quantity};

/// A vertex of a demand or supply curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub quantity: Quantity,
    pub price: Price,
}

impl Point {
    pub fn new(quantity: Quantity, price: Price) -> Self {
        Self { quantity, price }
    }
}
