pub mod angle;
pub mod distance_2d;
pub mod envelope;
pub mod orientation;
pub mod precision;
pub mod segment;
pub mod triangle;

pub use envelope::Envelope;
pub use orientation::{orientation_index, Orientation};
pub use precision::PrecisionModel;
pub use segment::LineSegment;

use std::cmp::Ordering;

/// 2D coordinate type.
pub type Coord = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Lexicographic ordering of coordinates (x first, then y).
///
/// NaN never reaches this function: inputs are checked for finiteness
/// before any graph is built.
#[must_use]
pub fn compare_coords(a: &Coord, b: &Coord) -> Ordering {
    a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y))
}

/// Euclidean distance between two coordinates.
#[must_use]
pub fn distance(a: &Coord, b: &Coord) -> f64 {
    (b - a).norm()
}

/// A total-order key for coordinates, usable in ordered and hashed maps.
///
/// Negative zero is folded into positive zero so that coordinates which
/// compare equal also produce equal keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordKey(OrderedF64, OrderedF64);

impl CoordKey {
    /// Builds the key for a coordinate.
    #[must_use]
    pub fn new(c: &Coord) -> Self {
        Self(OrderedF64::new(c.x), OrderedF64::new(c.y))
    }
}

impl From<&Coord> for CoordKey {
    fn from(c: &Coord) -> Self {
        Self::new(c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct OrderedF64(u64);

impl OrderedF64 {
    fn new(v: f64) -> Self {
        let v = if v == 0.0 { 0.0 } else { v };
        Self(v.to_bits())
    }

    fn value(self) -> f64 {
        f64::from_bits(self.0)
    }
}

impl PartialOrd for OrderedF64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedF64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value().total_cmp(&other.value())
    }
}
