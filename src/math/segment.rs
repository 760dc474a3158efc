use std::cmp::Ordering;

use super::{compare_coords, orientation_index, Coord};

/// A directed line segment `p0 -> p1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub p0: Coord,
    pub p1: Coord,
}

impl LineSegment {
    #[must_use]
    pub fn new(p0: Coord, p1: Coord) -> Self {
        Self { p0, p1 }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        (self.p1 - self.p0).norm()
    }

    #[must_use]
    pub fn min_x(&self) -> f64 {
        self.p0.x.min(self.p1.x)
    }

    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.p0.x.max(self.p1.x)
    }

    #[must_use]
    pub fn is_horizontal(&self) -> bool {
        self.p0.y == self.p1.y
    }

    /// Swaps the endpoints in place.
    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.p0, &mut self.p1);
    }

    /// Orientation of `p` relative to this segment.
    #[must_use]
    pub fn orientation_index(&self, p: &Coord) -> i32 {
        orientation_index(&self.p0, &self.p1, p)
    }

    /// Orientation of another segment relative to this one.
    ///
    /// Returns `1` if `seg` lies wholly to the left, `-1` if wholly to the
    /// right, `0` if it crosses or is collinear.
    #[must_use]
    pub fn orientation_index_of(&self, seg: &LineSegment) -> i32 {
        let orient0 = orientation_index(&self.p0, &self.p1, &seg.p0);
        let orient1 = orientation_index(&self.p0, &self.p1, &seg.p1);
        if orient0 >= 0 && orient1 >= 0 {
            return orient0.max(orient1);
        }
        if orient0 <= 0 && orient1 <= 0 {
            return orient0.min(orient1);
        }
        0
    }

    /// Point at `fraction` along the segment, displaced `offset` to the left.
    #[must_use]
    pub fn point_along_offset(&self, fraction: f64, offset: f64) -> Coord {
        let seg_x = self.p0.x + fraction * (self.p1.x - self.p0.x);
        let seg_y = self.p0.y + fraction * (self.p1.y - self.p0.y);
        let dx = self.p1.x - self.p0.x;
        let dy = self.p1.y - self.p0.y;
        let len = dx.hypot(dy);
        let (ux, uy) = if offset == 0.0 || len <= 0.0 {
            (0.0, 0.0)
        } else {
            (offset * dx / len, offset * dy / len)
        };
        Coord::new(seg_x - uy, seg_y + ux)
    }

    /// Lexicographic order on `p0`, then `p1`.
    #[must_use]
    pub fn compare_endpoints(&self, other: &LineSegment) -> Ordering {
        compare_coords(&self.p0, &other.p0).then_with(|| compare_coords(&self.p1, &other.p1))
    }
}
