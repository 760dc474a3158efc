//! Robust orientation predicate.
//!
//! A fast floating-point filter decides the sign whenever the determinant is
//! clearly away from zero. Otherwise the determinant is re-evaluated in
//! double-double arithmetic, which is exact for the coordinate differences and
//! carries ~106 bits through the products.

use super::Coord;

/// Orientation of a point relative to a directed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// The point lies to the right of the line (clockwise turn).
    Clockwise,
    /// The point lies on the line.
    Collinear,
    /// The point lies to the left of the line (counter-clockwise turn).
    CounterClockwise,
}

impl Orientation {
    /// Computes the orientation of `q` relative to the directed line `p1 -> p2`.
    #[must_use]
    pub fn of(p1: &Coord, p2: &Coord, q: &Coord) -> Self {
        match orientation_index(p1, p2, q) {
            1 => Self::CounterClockwise,
            -1 => Self::Clockwise,
            _ => Self::Collinear,
        }
    }

    /// Returns the signed index: `1` for left, `-1` for right, `0` for collinear.
    #[must_use]
    pub fn index(self) -> i32 {
        match self {
            Self::CounterClockwise => 1,
            Self::Clockwise => -1,
            Self::Collinear => 0,
        }
    }
}

/// Relative error bound for the floating-point filter.
const DP_SAFE_EPSILON: f64 = 1e-15;

/// Returns `1` if `q` is left of `p1 -> p2`, `-1` if right, `0` if collinear.
#[must_use]
pub fn orientation_index(p1: &Coord, p2: &Coord, q: &Coord) -> i32 {
    if let Some(index) = orientation_index_filter(p1, p2, q) {
        return index;
    }
    let dx1 = Dd::from_diff(p2.x, p1.x);
    let dy1 = Dd::from_diff(p2.y, p1.y);
    let dx2 = Dd::from_diff(q.x, p2.x);
    let dy2 = Dd::from_diff(q.y, p2.y);
    dx1.mul(dy2).sub(dy1.mul(dx2)).signum()
}

fn orientation_index_filter(pa: &Coord, pb: &Coord, pc: &Coord) -> Option<i32> {
    let detleft = (pa.x - pc.x) * (pb.y - pc.y);
    let detright = (pa.y - pc.y) * (pb.x - pc.x);
    let det = detleft - detright;

    let detsum = if detleft > 0.0 {
        if detright <= 0.0 {
            return Some(signum(det));
        }
        detleft + detright
    } else if detleft < 0.0 {
        if detright >= 0.0 {
            return Some(signum(det));
        }
        -detleft - detright
    } else {
        return Some(signum(det));
    };

    let errbound = DP_SAFE_EPSILON * detsum;
    if det >= errbound || -det >= errbound {
        return Some(signum(det));
    }
    None
}

fn signum(v: f64) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Unevaluated sum `hi + lo` of two doubles.
#[derive(Debug, Clone, Copy)]
struct Dd {
    hi: f64,
    lo: f64,
}

impl Dd {
    /// Exact difference `a - b`.
    fn from_diff(a: f64, b: f64) -> Self {
        let (hi, lo) = two_sum(a, -b);
        Self { hi, lo }
    }

    fn mul(self, other: Self) -> Self {
        let (p, e) = two_prod(self.hi, other.hi);
        let e = e + (self.hi * other.lo + self.lo * other.hi);
        let (hi, lo) = quick_two_sum(p, e);
        Self { hi, lo }
    }

    fn sub(self, other: Self) -> Self {
        let (s, e) = two_sum(self.hi, -other.hi);
        let e = e + (self.lo - other.lo);
        let (hi, lo) = quick_two_sum(s, e);
        Self { hi, lo }
    }

    fn signum(self) -> i32 {
        if self.hi != 0.0 {
            signum(self.hi)
        } else {
            signum(self.lo)
        }
    }
}

fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    let err = (a - (s - bb)) + (b - bb);
    (s, err)
}

fn quick_two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let err = b - (s - a);
    (s, err)
}

fn two_prod(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    let err = a.mul_add(b, -p);
    (p, err)
}
