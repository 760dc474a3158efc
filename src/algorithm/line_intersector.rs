//! Robust segment intersection.
//!
//! Intersection classification uses the robust orientation predicate only;
//! the intersection point itself is computed in homogeneous coordinates after
//! translating the inputs towards the origin, and falls back to the nearest
//! endpoint when the computed point is not representable or lands outside
//! both segment envelopes.

use crate::math::distance_2d::point_to_segment;
use crate::math::{orientation_index, Coord, Envelope, PrecisionModel};

/// Kind of intersection between two segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntersectionKind {
    None,
    Point,
    Collinear,
}

/// Segment intersector that is robust with respect to orientation and that
/// rounds computed points to a precision model.
#[derive(Debug, Clone)]
pub struct LineIntersector {
    precision: PrecisionModel,
    result: IntersectionKind,
    input: [Coord; 4],
    points: [Coord; 2],
    is_proper: bool,
}

impl Default for LineIntersector {
    fn default() -> Self {
        Self::new(PrecisionModel::Floating)
    }
}

impl LineIntersector {
    #[must_use]
    pub fn new(precision: PrecisionModel) -> Self {
        let origin = Coord::origin();
        Self {
            precision,
            result: IntersectionKind::None,
            input: [origin; 4],
            points: [origin; 2],
            is_proper: false,
        }
    }

    #[must_use]
    pub fn precision(&self) -> &PrecisionModel {
        &self.precision
    }

    /// Intersects segment `p1 -> p2` with segment `q1 -> q2`.
    pub fn compute_intersection(&mut self, p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) {
        self.input = [*p1, *p2, *q1, *q2];
        self.result = self.compute_intersect(p1, p2, q1, q2);
    }

    #[must_use]
    pub fn kind(&self) -> IntersectionKind {
        self.result
    }

    #[must_use]
    pub fn has_intersection(&self) -> bool {
        self.result != IntersectionKind::None
    }

    /// Number of intersection points: 0, 1 or 2.
    #[must_use]
    pub fn intersection_num(&self) -> usize {
        match self.result {
            IntersectionKind::None => 0,
            IntersectionKind::Point => 1,
            IntersectionKind::Collinear => 2,
        }
    }

    /// The `i`-th intersection point; only meaningful below
    /// [`Self::intersection_num`].
    #[must_use]
    pub fn intersection(&self, i: usize) -> Coord {
        self.points[i.min(1)]
    }

    /// Returns `true` if the segments cross at a single point interior to
    /// both of them.
    #[must_use]
    pub fn is_proper(&self) -> bool {
        self.has_intersection() && self.is_proper
    }

    /// Returns `true` if some intersection point is not an endpoint of
    /// either input segment.
    #[must_use]
    pub fn is_interior_intersection(&self) -> bool {
        self.is_interior_intersection_of(0) || self.is_interior_intersection_of(1)
    }

    /// Returns `true` if some intersection point is not an endpoint of input
    /// segment `line_index` (0 or 1).
    #[must_use]
    pub fn is_interior_intersection_of(&self, line_index: usize) -> bool {
        let a = self.input[2 * line_index];
        let b = self.input[2 * line_index + 1];
        (0..self.intersection_num()).any(|i| {
            let pt = self.points[i];
            pt != a && pt != b
        })
    }

    fn compute_intersect(&mut self, p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> IntersectionKind {
        self.is_proper = false;

        if !Envelope::segments_overlap(p1, p2, q1, q2) {
            return IntersectionKind::None;
        }

        let pq1 = orientation_index(p1, p2, q1);
        let pq2 = orientation_index(p1, p2, q2);
        if (pq1 > 0 && pq2 > 0) || (pq1 < 0 && pq2 < 0) {
            return IntersectionKind::None;
        }

        let qp1 = orientation_index(q1, q2, p1);
        let qp2 = orientation_index(q1, q2, p2);
        if (qp1 > 0 && qp2 > 0) || (qp1 < 0 && qp2 < 0) {
            return IntersectionKind::None;
        }

        if pq1 == 0 && pq2 == 0 && qp1 == 0 && qp2 == 0 {
            return self.compute_collinear_intersection(p1, p2, q1, q2);
        }

        // An endpoint touches the other segment. Use the input point itself
        // so that no round-off is introduced.
        if pq1 == 0 || pq2 == 0 || qp1 == 0 || qp2 == 0 {
            self.points[0] = if p1 == q1 || p1 == q2 {
                *p1
            } else if p2 == q1 || p2 == q2 {
                *p2
            } else if pq1 == 0 {
                *q1
            } else if pq2 == 0 {
                *q2
            } else if qp1 == 0 {
                *p1
            } else {
                *p2
            };
        } else {
            self.is_proper = true;
            self.points[0] = self.intersection_point(p1, p2, q1, q2);
        }
        IntersectionKind::Point
    }

    fn compute_collinear_intersection(
        &mut self,
        p1: &Coord,
        p2: &Coord,
        q1: &Coord,
        q2: &Coord,
    ) -> IntersectionKind {
        let p1q1p2 = Envelope::segment_contains(p1, p2, q1);
        let p1q2p2 = Envelope::segment_contains(p1, p2, q2);
        let q1p1q2 = Envelope::segment_contains(q1, q2, p1);
        let q1p2q2 = Envelope::segment_contains(q1, q2, p2);

        let (a, b, single) = if p1q1p2 && p1q2p2 {
            (*q1, *q2, false)
        } else if q1p1q2 && q1p2q2 {
            (*p1, *p2, false)
        } else if p1q1p2 && q1p1q2 {
            (*q1, *p1, q1 == p1 && !p1q2p2 && !q1p2q2)
        } else if p1q1p2 && q1p2q2 {
            (*q1, *p2, q1 == p2 && !p1q2p2 && !q1p1q2)
        } else if p1q2p2 && q1p1q2 {
            (*q2, *p1, q2 == p1 && !p1q1p2 && !q1p2q2)
        } else if p1q2p2 && q1p2q2 {
            (*q2, *p2, q2 == p2 && !p1q1p2 && !q1p1q2)
        } else {
            return IntersectionKind::None;
        };
        self.points = [a, b];
        if single {
            IntersectionKind::Point
        } else {
            IntersectionKind::Collinear
        }
    }

    fn intersection_point(&self, p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> Coord {
        let mut pt = intersection_with_normalization(p1, p2, q1, q2);
        if !self.is_in_segment_envelopes(&pt) {
            pt = nearest_endpoint(p1, p2, q1, q2);
        }
        self.precision.make_precise_coord(&pt)
    }

    fn is_in_segment_envelopes(&self, pt: &Coord) -> bool {
        let [p1, p2, q1, q2] = &self.input;
        Envelope::segment_contains(p1, p2, pt) && Envelope::segment_contains(q1, q2, pt)
    }
}

/// Intersection of the infinite lines through `p1 -> p2` and `q1 -> q2` in
/// homogeneous coordinates, or `None` when the lines are parallel.
#[must_use]
pub fn line_intersection(p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> Option<Coord> {
    let px = p1.y - p2.y;
    let py = p2.x - p1.x;
    let pw = p1.x * p2.y - p2.x * p1.y;

    let qx = q1.y - q2.y;
    let qy = q2.x - q1.x;
    let qw = q1.x * q2.y - q2.x * q1.y;

    let x = py * qw - qy * pw;
    let y = qx * pw - px * qw;
    let w = px * qy - qx * py;

    let x_int = x / w;
    let y_int = y / w;
    if x_int.is_finite() && y_int.is_finite() {
        Some(Coord::new(x_int, y_int))
    } else {
        None
    }
}

fn intersection_with_normalization(p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> Coord {
    // Translate to the centre of the envelope overlap to keep magnitudes small.
    let int_min_x = p1.x.min(p2.x).max(q1.x.min(q2.x));
    let int_max_x = p1.x.max(p2.x).min(q1.x.max(q2.x));
    let int_min_y = p1.y.min(p2.y).max(q1.y.min(q2.y));
    let int_max_y = p1.y.max(p2.y).min(q1.y.max(q2.y));
    let norm = crate::math::Vector2::new((int_min_x + int_max_x) / 2.0, (int_min_y + int_max_y) / 2.0);

    let n1 = p1 - norm;
    let n2 = p2 - norm;
    let n3 = q1 - norm;
    let n4 = q2 - norm;
    match line_intersection(&n1, &n2, &n3, &n4) {
        Some(pt) => pt + norm,
        None => nearest_endpoint(p1, p2, q1, q2),
    }
}

/// The endpoint of either segment nearest to the other segment.
fn nearest_endpoint(p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> Coord {
    let mut nearest = *p1;
    let mut min_dist = point_to_segment(p1, q1, q2);
    for (pt, a, b) in [(p2, q1, q2), (q1, p1, p2), (q2, p1, p2)] {
        let dist = point_to_segment(pt, a, b);
        if dist < min_dist {
            min_dist = dist;
            nearest = *pt;
        }
    }
    nearest
}
