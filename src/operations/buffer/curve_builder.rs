use tracing::trace;

use crate::math::{Coord, PrecisionModel};
use crate::topology::Position;

use super::parameters::{BufferParameters, EndCapStyle};
use super::segment_generator::OffsetSegmentGenerator;
use super::simplifier::BufferInputLineSimplifier;

/// Computes the raw offset curves of points, lines and rings.
///
/// A raw curve may self-intersect and contain spurious loops. It is only
/// useful as input to noding and topology building, which extract the true
/// buffer boundary from it.
#[derive(Debug, Clone, Copy)]
pub struct OffsetCurveBuilder {
    pm: PrecisionModel,
    params: BufferParameters,
}

impl OffsetCurveBuilder {
    #[must_use]
    pub fn new(pm: PrecisionModel, params: BufferParameters) -> Self {
        Self { pm, params }
    }

    #[must_use]
    pub fn params(&self) -> &BufferParameters {
        &self.params
    }

    fn generator(&self, distance: f64) -> OffsetSegmentGenerator {
        OffsetSegmentGenerator::new(self.pm, self.params, distance)
    }

    /// Closed curve around a line or point at `distance`.
    ///
    /// Returns `None` for a zero distance, or for a negative distance
    /// unless the curve is single-sided. Empty input yields `None`.
    #[must_use]
    pub fn line_curve(&self, pts: &[Coord], distance: f64) -> Option<Vec<Coord>> {
        if distance == 0.0 || (distance < 0.0 && !self.params.is_single_sided()) {
            return None;
        }
        let pos_distance = distance.abs();
        let mut seg_gen = self.generator(pos_distance);
        match pts {
            [] => return None,
            [pt] => self.compute_point_curve(*pt, &mut seg_gen),
            _ if self.params.is_single_sided() => {
                compute_single_sided_curve(pts, distance < 0.0, pos_distance, &mut seg_gen);
            }
            _ => compute_line_curve(pts, pos_distance, &mut seg_gen),
        }
        Some(finish(seg_gen))
    }

    /// Offset curve of a closed ring on `side`.
    ///
    /// Rings of two points or fewer are buffered as lines. A zero distance
    /// copies the ring unchanged.
    #[must_use]
    pub fn ring_curve(&self, pts: &[Coord], side: Position, distance: f64) -> Option<Vec<Coord>> {
        if pts.len() <= 2 {
            return self.line_curve(pts, distance);
        }
        if distance == 0.0 {
            return Some(pts.to_vec());
        }
        let mut seg_gen = self.generator(distance);
        compute_ring_curve(pts, side, distance, &mut seg_gen);
        Some(finish(seg_gen))
    }

    /// One-sided open offset line: to the left for positive distances, to
    /// the right (and reversed) for negative ones.
    #[must_use]
    pub fn offset_curve(&self, pts: &[Coord], distance: f64) -> Option<Vec<Coord>> {
        if distance == 0.0 {
            return None;
        }
        let is_right_side = distance < 0.0;
        let pos_distance = distance.abs();
        let mut seg_gen = self.generator(pos_distance);
        match pts {
            [] => return None,
            [pt] => self.compute_point_curve(*pt, &mut seg_gen),
            _ => {
                let tol = simplify_tolerance(pos_distance);
                if is_right_side {
                    add_reverse_side(&simplify(pts, -tol), &mut seg_gen, true);
                } else {
                    add_forward_side(&simplify(pts, tol), &mut seg_gen, true);
                }
                seg_gen.add_last_segment();
            }
        }
        let mut curve = finish(seg_gen);
        if is_right_side {
            curve.reverse();
        }
        Some(curve)
    }

    fn compute_point_curve(&self, pt: Coord, seg_gen: &mut OffsetSegmentGenerator) {
        match self.params.end_cap() {
            EndCapStyle::Round => seg_gen.create_circle(pt),
            EndCapStyle::Square => seg_gen.create_square(pt),
            EndCapStyle::Flat => {}
        }
    }
}

fn finish(seg_gen: OffsetSegmentGenerator) -> Vec<Coord> {
    if seg_gen.has_narrow_concave_angle() {
        trace!("offset curve has a narrow concave angle");
    }
    seg_gen.into_coords()
}

fn simplify_tolerance(distance: f64) -> f64 {
    distance / BufferParameters::SIMPLIFY_FACTOR
}

/// Points of `pts` simplified on the left side for a positive `tol`, or on
/// the right side for a negative one.
fn simplify(pts: &[Coord], tol: f64) -> Vec<Coord> {
    BufferInputLineSimplifier::new(pts).simplify(tol)
}

/// Feeds the left side of the simplified line `simp` in forward order.
fn add_forward_side(simp: &[Coord], seg_gen: &mut OffsetSegmentGenerator, add_first: bool) {
    seg_gen.init_side_segments(simp[0], simp[1], Position::Left);
    if add_first {
        seg_gen.add_first_segment();
    }
    for p in &simp[2..] {
        seg_gen.add_next_segment(*p, true);
    }
}

/// Feeds the right side of the simplified line `simp` as the left side of
/// the reversed line.
fn add_reverse_side(simp: &[Coord], seg_gen: &mut OffsetSegmentGenerator, add_first: bool) {
    let n = simp.len() - 1;
    seg_gen.init_side_segments(simp[n], simp[n - 1], Position::Left);
    if add_first {
        seg_gen.add_first_segment();
    }
    for p in simp[..n - 1].iter().rev() {
        seg_gen.add_next_segment(*p, true);
    }
}

fn compute_line_curve(pts: &[Coord], distance: f64, seg_gen: &mut OffsetSegmentGenerator) {
    let tol = simplify_tolerance(distance);

    // Step 1: left side, then the cap at the far end.
    let simp1 = simplify(pts, tol);
    let n1 = simp1.len() - 1;
    add_forward_side(&simp1, seg_gen, false);
    seg_gen.add_last_segment();
    seg_gen.add_line_end_cap(simp1[n1 - 1], simp1[n1]);

    // Step 2: right side walked backwards, then the cap at the start.
    let simp2 = simplify(pts, -tol);
    add_reverse_side(&simp2, seg_gen, false);
    seg_gen.add_last_segment();
    seg_gen.add_line_end_cap(simp2[1], simp2[0]);

    seg_gen.close_ring();
}

fn compute_single_sided_curve(
    pts: &[Coord],
    is_right_side: bool,
    distance: f64,
    seg_gen: &mut OffsetSegmentGenerator,
) {
    let tol = simplify_tolerance(distance);
    if is_right_side {
        seg_gen.add_segments(pts, true);
        add_reverse_side(&simplify(pts, -tol), seg_gen, true);
    } else {
        seg_gen.add_segments(pts, false);
        add_forward_side(&simplify(pts, tol), seg_gen, true);
    }
    seg_gen.add_last_segment();
    seg_gen.close_ring();
}

fn compute_ring_curve(pts: &[Coord], side: Position, distance: f64, seg_gen: &mut OffsetSegmentGenerator) {
    let mut tol = simplify_tolerance(distance);
    if side == Position::Right {
        tol = -tol;
    }
    let simp = simplify(pts, tol);
    let n = simp.len() - 1;
    seg_gen.init_side_segments(simp[n - 1], simp[0], side);
    for (i, p) in simp.iter().enumerate().skip(1) {
        seg_gen.add_next_segment(*p, i != 1);
    }
    seg_gen.close_ring();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::ring;
    use crate::math::distance;
    use crate::operations::buffer::parameters::JoinStyle;
    use approx::assert_abs_diff_eq;

    fn builder(params: BufferParameters) -> OffsetCurveBuilder {
        OffsetCurveBuilder::new(PrecisionModel::Floating, params)
    }

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn line_curve_is_closed_and_clockwise() {
        let curve = builder(BufferParameters::default())
            .line_curve(&[c(0.0, 0.0), c(10.0, 0.0)], 1.0)
            .unwrap_or_default();
        assert_eq!(curve.first(), curve.last());
        assert!(!ring::is_ccw(&curve));
        // Two straight sides and two round caps of 2 * 8 segments each.
        assert_eq!(curve.len(), 2 * (2 * 8 + 1) + 1);
    }

    #[test]
    fn flat_cap_line_curve_is_rectangle() {
        let params = BufferParameters::default().with_end_cap(EndCapStyle::Flat);
        let curve = builder(params)
            .line_curve(&[c(0.0, 0.0), c(10.0, 0.0)], 1.0)
            .unwrap_or_default();
        assert_eq!(curve.len(), 5);
        assert_abs_diff_eq!(ring::signed_area(&curve).abs(), 20.0, epsilon = 1e-12);
    }

    #[test]
    fn line_curve_sides_follow_their_own_simplification() {
        // The dent is concave on the left and convex on the right.
        let line = [c(0.0, 0.0), c(1.0, 0.0), c(2.0, -0.001), c(3.0, 0.0), c(4.0, 0.0)];
        let params = BufferParameters::default().with_end_cap(EndCapStyle::Flat);
        let curve = builder(params).line_curve(&line, 1.0).unwrap_or_default();
        assert_eq!(curve.first(), curve.last());
        for p in curve.iter().filter(|p| p.y > 0.5) {
            assert_abs_diff_eq!(p.y, 1.0, epsilon = 1e-12);
        }
        assert!(curve.iter().any(|p| p.y < -1.0 + 1e-12 && p.y > -1.002));
        assert_abs_diff_eq!(ring::signed_area(&curve).abs(), 8.0, epsilon = 0.01);
    }

    #[test]
    fn negative_line_distance_gives_nothing() {
        let b = builder(BufferParameters::default());
        assert!(b.line_curve(&[c(0.0, 0.0), c(10.0, 0.0)], -1.0).is_none());
        assert!(b.line_curve(&[c(0.0, 0.0), c(10.0, 0.0)], 0.0).is_none());
    }

    #[test]
    fn single_sided_curve_covers_one_side() {
        let params = BufferParameters::default().with_single_sided(true);
        let left = builder(params)
            .line_curve(&[c(0.0, 0.0), c(10.0, 0.0)], 2.0)
            .unwrap_or_default();
        assert!(left.iter().all(|p| p.y >= 0.0));
        assert_abs_diff_eq!(ring::signed_area(&left).abs(), 20.0, epsilon = 1e-12);

        let right = builder(params)
            .line_curve(&[c(0.0, 0.0), c(10.0, 0.0)], -2.0)
            .unwrap_or_default();
        assert!(right.iter().all(|p| p.y <= 0.0));
    }

    #[test]
    fn point_curves_follow_cap_style() {
        let round = builder(BufferParameters::default()).line_curve(&[c(1.0, 1.0)], 2.0).unwrap_or_default();
        assert!(round.iter().all(|p| (distance(p, &c(1.0, 1.0)) - 2.0).abs() < 1e-12));

        let flat = builder(BufferParameters::default().with_end_cap(EndCapStyle::Flat))
            .line_curve(&[c(1.0, 1.0)], 2.0)
            .unwrap_or_default();
        assert!(flat.is_empty());
    }

    #[test]
    fn ring_curve_offsets_square_outwards() {
        // Clockwise square: its left side is the exterior.
        let square = vec![c(0.0, 0.0), c(0.0, 10.0), c(10.0, 10.0), c(10.0, 0.0), c(0.0, 0.0)];
        let params = BufferParameters::default().with_join(JoinStyle::Mitre);
        let curve = builder(params).ring_curve(&square, Position::Left, 1.0).unwrap_or_default();
        assert_eq!(curve.first(), curve.last());
        assert_abs_diff_eq!(ring::signed_area(&curve).abs(), 144.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_distance_ring_is_copied() {
        let square = vec![c(0.0, 0.0), c(0.0, 1.0), c(1.0, 1.0), c(0.0, 0.0)];
        let curve = builder(BufferParameters::default()).ring_curve(&square, Position::Left, 0.0);
        assert_eq!(curve, Some(square));
    }

    #[test]
    fn offset_curve_sides() {
        let b = builder(BufferParameters::default());
        let line = [c(0.0, 0.0), c(10.0, 0.0)];
        assert_eq!(b.offset_curve(&line, 1.0), Some(vec![c(0.0, 1.0), c(10.0, 1.0)]));
        assert_eq!(b.offset_curve(&line, -1.0), Some(vec![c(0.0, -1.0), c(10.0, -1.0)]));
        assert!(b.offset_curve(&line, 0.0).is_none());
    }
}
