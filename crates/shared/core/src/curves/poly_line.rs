use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Point;
use crate::values::{Price, Quantity};

/// Piecewise-linear curve, vertices ordered by quantity then price
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolyLine {
    points: Vec<Point>,
}

impl PolyLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a curve from an unordered list of vertices
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        let mut line = Self::new();
        for point in points {
            line.add(point);
        }
        line
    }

    /// Add a vertex. An exact duplicate of an existing vertex is ignored.
    pub fn add(&mut self, point: Point) {
        if self.points.contains(&point) {
            return;
        }

        let needs_sort = self.points.last().is_some_and(|last| point < *last);
        self.points.push(point);
        if needs_sort {
            self.points.sort();
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn min_quantity(&self) -> Option<Quantity> {
        self.points.iter().map(|p| p.quantity).min()
    }

    pub fn max_quantity(&self) -> Option<Quantity> {
        self.points.iter().map(|p| p.quantity).max()
    }

    pub fn min_price(&self) -> Option<Price> {
        self.points.iter().map(|p| p.price).min()
    }

    pub fn max_price(&self) -> Option<Price> {
        self.points.iter().map(|p| p.price).max()
    }

    /// Price on the curve at `quantity`, clamped to the end vertices
    ///
    /// `None` when the curve is empty or the interpolation overflows.
    pub fn price_at(&self, quantity: Quantity) -> Option<Price> {
        let xy: Vec<(Decimal, Decimal)> =
            self.points.iter().map(|p| (p.quantity, p.price)).collect();
        interpolate(&xy, quantity)
    }

    /// Quantity on the curve at `price`, clamped to the end vertices
    ///
    /// Vertices are walked in ascending price order, so demand curves
    /// (falling price) are reversed before interpolation.
    pub fn quantity_at(&self, price: Price) -> Option<Quantity> {
        let mut xy: Vec<(Decimal, Decimal)> =
            self.points.iter().map(|p| (p.price, p.quantity)).collect();
        let descending = matches!((xy.first(), xy.last()), (Some(f), Some(l)) if f.0 > l.0);
        if descending {
            xy.reverse();
        }
        interpolate(&xy, price)
    }

    /// Find where a demand and a supply curve cross
    ///
    /// Handles three shapes: two single points (must coincide), a single point
    /// against a polyline (point must lie on a segment), and two polylines
    /// (first pair of segments that intersect). Fails with [`CurveOverflow`]
    /// when the curves are too large for exact `Decimal` arithmetic.
    pub fn intersection(
        demand: &PolyLine,
        supply: &PolyLine,
    ) -> Result<Option<Point>, CurveOverflow> {
        let d = demand.points();
        let s = supply.points();

        match (d.len(), s.len()) {
            (0, _) | (_, 0) => Ok(None),
            (1, 1) => Ok((d[0] == s[0]).then_some(d[0])),
            (1, _) => point_on_line(d[0], s),
            (_, 1) => point_on_line(s[0], d),
            _ => {
                for dseg in d.windows(2) {
                    for sseg in s.windows(2) {
                        let dseg = (dseg[0], dseg[1]);
                        let sseg = (sseg[0], sseg[1]);
                        if segments_intersect(dseg, sseg)?
                            && let Some(point) = segment_intersection(dseg, sseg)?
                        {
                            return Ok(Some(point));
                        }
                    }
                }
                Ok(None)
            }
        }
    }
}

/// Curve arithmetic left the `Decimal` range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveOverflow;

impl fmt::Display for CurveOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "curve arithmetic overflowed")
    }
}

impl std::error::Error for CurveOverflow {}

fn add(a: Decimal, b: Decimal) -> Result<Decimal, CurveOverflow> {
    a.checked_add(b).ok_or(CurveOverflow)
}

fn sub(a: Decimal, b: Decimal) -> Result<Decimal, CurveOverflow> {
    a.checked_sub(b).ok_or(CurveOverflow)
}

fn mul(a: Decimal, b: Decimal) -> Result<Decimal, CurveOverflow> {
    a.checked_mul(b).ok_or(CurveOverflow)
}

/// Linear interpolation over (x, y) pairs sorted by x, clamping outside the range
///
/// `None` for an empty curve or when the arithmetic overflows.
fn interpolate(xy: &[(Decimal, Decimal)], x: Decimal) -> Option<Decimal> {
    let first = xy.first()?;
    let last = xy.last()?;

    if x <= first.0 {
        return Some(first.1);
    }
    if x >= last.0 {
        return Some(last.1);
    }

    for pair in xy.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if x0 <= x && x <= x1 {
            if x1 == x0 {
                return Some(y0);
            }
            let ratio = x.checked_sub(x0)?.checked_div(x1.checked_sub(x0)?)?;
            return y1.checked_sub(y0)?.checked_mul(ratio)?.checked_add(y0);
        }
    }

    Some(last.1)
}

fn point_on_line(point: Point, line: &[Point]) -> Result<Option<Point>, CurveOverflow> {
    for seg in line.windows(2) {
        if between(seg[0], seg[1], point)? {
            return Ok(Some(point));
        }
    }
    Ok(None)
}

/// Cross product of the vectors `a -> b` and `a -> c`, in (quantity, price) space
fn cross(a: Point, b: Point, c: Point) -> Result<Decimal, CurveOverflow> {
    sub(
        mul(sub(b.quantity, a.quantity)?, sub(c.price, a.price)?)?,
        mul(sub(b.price, a.price)?, sub(c.quantity, a.quantity)?)?,
    )
}

fn ccw(a: Point, b: Point, c: Point) -> Result<bool, CurveOverflow> {
    Ok(cross(a, b, c)? > Decimal::ZERO)
}

fn segments_intersect(l1: (Point, Point), l2: (Point, Point)) -> Result<bool, CurveOverflow> {
    // Shared endpoints count as touching
    if l1.0 == l2.0 || l1.0 == l2.1 || l1.1 == l2.0 || l1.1 == l2.1 {
        return Ok(true);
    }
    Ok(ccw(l1.0, l2.0, l2.1)? != ccw(l1.1, l2.0, l2.1)?
        && ccw(l1.0, l1.1, l2.0)? != ccw(l1.0, l1.1, l2.1)?)
}

/// Crossing point of the lines through `l1` and `l2`
///
/// Solved parametrically along `l1`, so intermediate terms stay quadratic
/// in the coordinates.
fn segment_intersection(
    l1: (Point, Point),
    l2: (Point, Point),
) -> Result<Option<Point>, CurveOverflow> {
    let r = (sub(l1.1.quantity, l1.0.quantity)?, sub(l1.1.price, l1.0.price)?);
    let s = (sub(l2.1.quantity, l2.0.quantity)?, sub(l2.1.price, l2.0.price)?);

    let denominator = sub(mul(r.0, s.1)?, mul(r.1, s.0)?)?;
    if denominator.is_zero() {
        return Ok(None);
    }

    let offset = (sub(l2.0.quantity, l1.0.quantity)?, sub(l2.0.price, l1.0.price)?);
    let numerator = sub(mul(offset.0, s.1)?, mul(offset.1, s.0)?)?;
    let t = numerator.checked_div(denominator).ok_or(CurveOverflow)?;

    let quantity = add(l1.0.quantity, mul(t, r.0)?)?;
    let price = add(l1.0.price, mul(t, r.1)?)?;
    Ok(Some(Point::new(quantity, price)))
}

/// True if `c` lies on the segment from `a` to `b`
fn between(a: Point, b: Point, c: Point) -> Result<bool, CurveOverflow> {
    if !cross(a, b, c)?.is_zero() {
        return Ok(false);
    }

    let dot = add(
        mul(sub(c.quantity, a.quantity)?, sub(b.quantity, a.quantity)?)?,
        mul(sub(c.price, a.price)?, sub(b.price, a.price)?)?,
    )?;
    if dot < Decimal::ZERO {
        return Ok(false);
    }

    let dq = sub(b.quantity, a.quantity)?;
    let dp = sub(b.price, a.price)?;
    let squared_length = add(mul(dq, dq)?, mul(dp, dp)?)?;
    Ok(dot <= squared_length)
}
