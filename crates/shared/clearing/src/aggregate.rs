use std::collections::BTreeSet;

use gridmarket_core::{CurveOverflow, Point, PolyLine, Price};
use gridmarket_ports::ClearingResult;
use rust_decimal::Decimal;

/// Sum curves horizontally
///
/// For every price that appears as a vertex in any input, the aggregate
/// quantity is the sum of each curve's quantity at that price. Outside a
/// curve's own price range its end quantity is used.
pub fn aggregate(curves: &[PolyLine]) -> ClearingResult<PolyLine> {
    let prices: BTreeSet<Price> = curves
        .iter()
        .flat_map(|curve| curve.points().iter().map(|p| p.price))
        .collect();

    let mut result = PolyLine::new();
    for price in prices {
        let quantity = curves
            .iter()
            .filter(|curve| !curve.is_empty())
            .try_fold(Decimal::ZERO, |total, curve| {
                curve
                    .quantity_at(price)
                    .and_then(|quantity| total.checked_add(quantity))
                    .ok_or(CurveOverflow)
            })?;
        result.add(Point::new(quantity, price));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridmarket_ports::ClearingError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_aggregate_single_curve_is_unchanged() {
        let curve = PolyLine::from_points([
            Point::new(dec!(0), dec!(100)),
            Point::new(dec!(1000), dec!(200)),
        ]);
        assert_eq!(aggregate(std::slice::from_ref(&curve)).unwrap(), curve);
    }

    #[test]
    fn test_aggregate_two_supply_curves() {
        let a = PolyLine::from_points([
            Point::new(dec!(0), dec!(10)),
            Point::new(dec!(100), dec!(20)),
        ]);
        let b = PolyLine::from_points([
            Point::new(dec!(0), dec!(10)),
            Point::new(dec!(50), dec!(20)),
        ]);

        let total = aggregate(&[a, b]).unwrap();

        assert_eq!(total.len(), 2);
        assert_eq!(total.quantity_at(dec!(10)), Some(dec!(0)));
        assert_eq!(total.quantity_at(dec!(20)), Some(dec!(150)));
        assert_eq!(total.quantity_at(dec!(15)), Some(dec!(75)));
    }

    #[test]
    fn test_aggregate_disjoint_price_ranges() {
        let cheap = PolyLine::from_points([
            Point::new(dec!(0), dec!(10)),
            Point::new(dec!(10), dec!(20)),
        ]);
        let dear = PolyLine::from_points([
            Point::new(dec!(0), dec!(30)),
            Point::new(dec!(10), dec!(40)),
        ]);

        let total = aggregate(&[cheap, dear]).unwrap();

        // At 40 the cheap seller is clamped at its full 10 units
        assert_eq!(total.quantity_at(dec!(40)), Some(dec!(20)));
        assert_eq!(total.quantity_at(dec!(20)), Some(dec!(10)));
    }

    #[test]
    fn test_aggregate_overflow_is_an_error() {
        let max = Decimal::MAX;
        let big = PolyLine::from_points([Point::new(max, dec!(10)), Point::new(max, dec!(20))]);

        assert_eq!(
            aggregate(&[big.clone(), big]),
            Err(ClearingError::Overflow(CurveOverflow))
        );
    }
}
