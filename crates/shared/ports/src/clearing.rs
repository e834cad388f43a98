use gridmarket_core::{PolyLine, Price, Quantity};
use serde::{Deserialize, Serialize};

use crate::error::ClearingResult;

/// Price and quantity at which a market cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearedPoint {
    pub price: Price,
    pub quantity: Quantity,
}

/// Port for market clearing algorithms
///
/// Implementations take the aggregate demand and supply curves of one
/// market round and decide the clearing price and quantity.
pub trait ClearingAlgorithm: Send + Sync {
    /// Clear the market given aggregate demand and supply
    fn clear(&self, demand: &PolyLine, supply: &PolyLine) -> ClearingResult<ClearedPoint>;

    /// Get the name of the algorithm
    fn name(&self) -> &str;
}
