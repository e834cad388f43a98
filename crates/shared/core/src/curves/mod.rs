//! Demand and supply curves
//!
//! Participants express their offers as piecewise-linear curves in
//! (quantity, price) space. Buyers submit demand curves (price falls as
//! quantity grows), sellers submit supply curves (price rises with quantity).

mod point;
mod poly_line;

pub use point::Point;
pub use poly_line::{CurveOverflow, PolyLine};
