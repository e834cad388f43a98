//! Gridmarket Clearing
//!
//! Aggregation of participant curves and clearing algorithms for the
//! gridmarket double auction.

mod aggregate;
mod curve_intersection;

pub use aggregate::aggregate;
pub use curve_intersection::CurveIntersectionClearing;

// Re-export the trait from ports for convenience
pub use gridmarket_ports::{ClearedPoint, ClearingAlgorithm, ClearingError, ClearingResult};

/// Factory function to create clearing algorithms by name
pub fn create_clearing_algorithm(algorithm_type: &str) -> Box<dyn ClearingAlgorithm> {
    match algorithm_type.to_lowercase().as_str() {
        "curve-intersection" | "intersection" => Box::new(CurveIntersectionClearing::new()),
        other => {
            log::warn!(
                "[CLEARING] Unknown algorithm '{}', using curve-intersection",
                other
            );
            Box::new(CurveIntersectionClearing::new()) // Default
        }
    }
}
