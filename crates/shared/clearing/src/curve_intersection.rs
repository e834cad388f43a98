use gridmarket_core::PolyLine;
use gridmarket_ports::{ClearedPoint, ClearingAlgorithm, ClearingError, ClearingResult};

/// Clears a market at the crossing of aggregate demand and supply
pub struct CurveIntersectionClearing;

impl CurveIntersectionClearing {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CurveIntersectionClearing {
    fn default() -> Self {
        Self::new()
    }
}

impl ClearingAlgorithm for CurveIntersectionClearing {
    fn name(&self) -> &str {
        "Curve-Intersection"
    }

    fn clear(&self, demand: &PolyLine, supply: &PolyLine) -> ClearingResult<ClearedPoint> {
        if demand.is_empty() {
            return Err(ClearingError::NoDemand);
        }
        if supply.is_empty() {
            return Err(ClearingError::NoSupply);
        }

        PolyLine::intersection(demand, supply)?
            .map(|point| ClearedPoint {
                price: point.price,
                quantity: point.quantity,
            })
            .ok_or(ClearingError::NoIntersection {
                demand_max_quantity: demand.max_quantity(),
                supply_min_quantity: supply.min_quantity(),
            })
    }
}
