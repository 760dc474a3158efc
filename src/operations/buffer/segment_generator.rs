//! Generation of the raw offset segments of one side of a buffer curve,
//! including joins, end caps and point buffers.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::algorithm::line_intersector::line_intersection;
use crate::algorithm::LineIntersector;
use crate::math::angle::{angle, angle_between_oriented, normalize};
use crate::math::{distance, orientation_index, Coord, LineSegment, PrecisionModel, Vector2};
use crate::topology::Position;

use super::parameters::{BufferParameters, EndCapStyle, JoinStyle};

/// Offset corners closer than this fraction of the distance are merged.
const OFFSET_SEGMENT_SEPARATION_FACTOR: f64 = 1.0e-3;

/// Inside-turn offsets closer than this fraction of the distance are merged.
const INSIDE_TURN_VERTEX_SNAP_DISTANCE_FACTOR: f64 = 1.0e-3;

/// Consecutive curve vertices closer than this fraction of the distance are
/// dropped.
const CURVE_VERTEX_SNAP_DISTANCE_FACTOR: f64 = 1.0e-6;

/// Length factor of the closing segments added at narrow inside turns.
const MAX_CLOSING_SEG_LEN_FACTOR: f64 = 80.0;

const CLOCKWISE: i32 = -1;

/// Point list of an offset curve that rounds every point to a precision
/// model and skips points too close to the previous one.
#[derive(Debug, Clone)]
struct OffsetSegmentString {
    pts: Vec<Coord>,
    pm: PrecisionModel,
    min_vertex_distance: f64,
}

impl OffsetSegmentString {
    fn new(pm: PrecisionModel, min_vertex_distance: f64) -> Self {
        Self {
            pts: Vec::new(),
            pm,
            min_vertex_distance,
        }
    }

    fn add_pt(&mut self, pt: Coord) {
        let pt = self.pm.make_precise_coord(&pt);
        if let Some(last) = self.pts.last() {
            if distance(&pt, last) < self.min_vertex_distance {
                return;
            }
        }
        self.pts.push(pt);
    }

    fn add_pts(&mut self, pts: &[Coord], is_forward: bool) {
        if is_forward {
            pts.iter().for_each(|p| self.add_pt(*p));
        } else {
            pts.iter().rev().for_each(|p| self.add_pt(*p));
        }
    }

    fn close_ring(&mut self) {
        if let (Some(&first), Some(&last)) = (self.pts.first(), self.pts.last()) {
            if first != last {
                self.pts.push(first);
            }
        }
    }
}

/// Left (positive side sign) or right offset of `seg` by `distance`.
fn offset_segment(seg: &LineSegment, side: Position, distance: f64) -> LineSegment {
    let side_sign = if side == Position::Left { 1.0 } else { -1.0 };
    let dx = seg.p1.x - seg.p0.x;
    let dy = seg.p1.y - seg.p0.y;
    let len = dx.hypot(dy);
    let ux = side_sign * distance * dx / len;
    let uy = side_sign * distance * dy / len;
    LineSegment::new(
        Coord::new(seg.p0.x - uy, seg.p0.y + ux),
        Coord::new(seg.p1.x - uy, seg.p1.y + ux),
    )
}

/// Builds the offset points of a vertex sequence on one side, joining
/// consecutive offset segments according to the join style.
///
/// Segments are fed one vertex at a time with
/// [`add_next_segment`](Self::add_next_segment) after an
/// [`init_side_segments`](Self::init_side_segments) call.
#[derive(Debug, Clone)]
pub struct OffsetSegmentGenerator {
    params: BufferParameters,
    distance: f64,
    fillet_angle_quantum: f64,
    closing_seg_length_factor: f64,
    seg_list: OffsetSegmentString,
    li: LineIntersector,
    s0: Coord,
    s1: Coord,
    s2: Coord,
    seg0: LineSegment,
    seg1: LineSegment,
    offset0: LineSegment,
    offset1: LineSegment,
    side: Position,
    has_narrow_concave_angle: bool,
}

impl OffsetSegmentGenerator {
    #[must_use]
    pub fn new(pm: PrecisionModel, params: BufferParameters, distance: f64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let quad_segs = params.quadrant_segments().max(1) as f64;
        let closing_seg_length_factor = if params.quadrant_segments() >= 8 && params.join() == JoinStyle::Round {
            MAX_CLOSING_SEG_LEN_FACTOR
        } else {
            1.0
        };
        let origin = Coord::origin();
        let zero = LineSegment::new(origin, origin);
        Self {
            params,
            distance,
            fillet_angle_quantum: FRAC_PI_2 / quad_segs,
            closing_seg_length_factor,
            seg_list: OffsetSegmentString::new(pm, distance * CURVE_VERTEX_SNAP_DISTANCE_FACTOR),
            li: LineIntersector::default(),
            s0: origin,
            s1: origin,
            s2: origin,
            seg0: zero,
            seg1: zero,
            offset0: zero,
            offset1: zero,
            side: Position::Left,
            has_narrow_concave_angle: false,
        }
    }

    /// Returns `true` if an inside turn was too sharp for its offset
    /// segments to intersect.
    #[must_use]
    pub fn has_narrow_concave_angle(&self) -> bool {
        self.has_narrow_concave_angle
    }

    #[must_use]
    pub fn into_coords(self) -> Vec<Coord> {
        self.seg_list.pts
    }

    pub fn close_ring(&mut self) {
        self.seg_list.close_ring();
    }

    pub fn add_segments(&mut self, pts: &[Coord], is_forward: bool) {
        self.seg_list.add_pts(pts, is_forward);
    }

    pub fn init_side_segments(&mut self, s1: Coord, s2: Coord, side: Position) {
        self.s1 = s1;
        self.s2 = s2;
        self.side = side;
        self.seg1 = LineSegment::new(s1, s2);
        self.offset1 = offset_segment(&self.seg1, side, self.distance);
    }

    pub fn add_first_segment(&mut self) {
        self.seg_list.add_pt(self.offset1.p0);
    }

    pub fn add_last_segment(&mut self) {
        self.seg_list.add_pt(self.offset1.p1);
    }

    /// Advances to the segment ending at `p`, adding the join at the
    /// shared vertex.
    pub fn add_next_segment(&mut self, p: Coord, add_start_point: bool) {
        self.s0 = self.s1;
        self.s1 = self.s2;
        self.s2 = p;
        self.seg0 = LineSegment::new(self.s0, self.s1);
        self.offset0 = offset_segment(&self.seg0, self.side, self.distance);
        self.seg1 = LineSegment::new(self.s1, self.s2);
        self.offset1 = offset_segment(&self.seg1, self.side, self.distance);

        if self.s1 == self.s2 {
            return;
        }
        let orientation = orientation_index(&self.s0, &self.s1, &self.s2);
        let outside_turn =
            (orientation == CLOCKWISE && self.side == Position::Left) || (orientation == 1 && self.side == Position::Right);

        if orientation == 0 {
            self.add_collinear(add_start_point);
        } else if outside_turn {
            self.add_outside_turn(orientation, add_start_point);
        } else {
            self.add_inside_turn();
        }
    }

    fn add_collinear(&mut self, add_start_point: bool) {
        // Only a reversal (two intersections) needs a join.
        self.li.compute_intersection(&self.s0, &self.s1, &self.s1, &self.s2);
        if self.li.intersection_num() < 2 {
            return;
        }
        match self.params.join() {
            JoinStyle::Bevel | JoinStyle::Mitre => {
                if add_start_point {
                    self.seg_list.add_pt(self.offset0.p1);
                }
                self.seg_list.add_pt(self.offset1.p0);
            }
            JoinStyle::Round => {
                self.add_corner_fillet(self.s1, self.offset0.p1, self.offset1.p0, CLOCKWISE, self.distance);
            }
        }
    }

    fn add_outside_turn(&mut self, orientation: i32, add_start_point: bool) {
        if distance(&self.offset0.p1, &self.offset1.p0) < self.distance * OFFSET_SEGMENT_SEPARATION_FACTOR {
            self.seg_list.add_pt(self.offset0.p1);
            return;
        }
        match self.params.join() {
            JoinStyle::Mitre => self.add_mitre_join(self.s1),
            JoinStyle::Bevel => {
                self.seg_list.add_pt(self.offset0.p1);
                self.seg_list.add_pt(self.offset1.p0);
            }
            JoinStyle::Round => {
                if add_start_point {
                    self.seg_list.add_pt(self.offset0.p1);
                }
                self.add_corner_fillet(self.s1, self.offset0.p1, self.offset1.p0, orientation, self.distance);
                self.seg_list.add_pt(self.offset1.p0);
            }
        }
    }

    fn add_inside_turn(&mut self) {
        self.li
            .compute_intersection(&self.offset0.p0, &self.offset0.p1, &self.offset1.p0, &self.offset1.p1);
        if self.li.has_intersection() {
            self.seg_list.add_pt(self.li.intersection(0));
            return;
        }

        // The offsets do not meet: the angle is too narrow for the distance.
        self.has_narrow_concave_angle = true;
        if distance(&self.offset0.p1, &self.offset1.p0) < self.distance * INSIDE_TURN_VERTEX_SNAP_DISTANCE_FACTOR {
            self.seg_list.add_pt(self.offset0.p1);
            return;
        }
        self.seg_list.add_pt(self.offset0.p1);
        if self.closing_seg_length_factor > 0.0 {
            let f = self.closing_seg_length_factor;
            let mid = |off: &Coord, s: &Coord| Coord::new((f * off.x + s.x) / (f + 1.0), (f * off.y + s.y) / (f + 1.0));
            self.seg_list.add_pt(mid(&self.offset0.p1, &self.s1));
            self.seg_list.add_pt(mid(&self.offset1.p0, &self.s1));
        } else {
            self.seg_list.add_pt(self.s1);
        }
        self.seg_list.add_pt(self.offset1.p0);
    }

    fn add_mitre_join(&mut self, p: Coord) {
        let limit = self.params.mitre_limit();
        let int_pt = line_intersection(&self.offset0.p0, &self.offset0.p1, &self.offset1.p0, &self.offset1.p1);
        let within_limit = int_pt.filter(|pt| {
            let mitre_ratio = if self.distance <= 0.0 {
                1.0
            } else {
                distance(pt, &p) / self.distance.abs()
            };
            mitre_ratio <= limit
        });
        match within_limit {
            Some(pt) => self.seg_list.add_pt(pt),
            None => self.add_limited_mitre_join(limit),
        }
    }

    /// Bevels a mitre that would exceed `mitre_limit` at the limit distance,
    /// perpendicular to the corner bisector.
    fn add_limited_mitre_join(&mut self, mitre_limit: f64) {
        let base_pt = self.seg0.p1;
        let ang0 = angle(&base_pt, &self.seg0.p0);
        let ang_diff = angle_between_oriented(&self.seg0.p0, &base_pt, &self.seg1.p1);
        let ang_diff_half = ang_diff / 2.0;
        let mid_ang = normalize(ang0 + ang_diff_half);
        let mitre_mid_ang = normalize(mid_ang + PI);

        let mitre_dist = mitre_limit * self.distance;
        let bevel_delta = mitre_dist * ang_diff_half.sin().abs();
        let bevel_half_len = self.distance - bevel_delta;

        let bevel_mid_pt = base_pt + Vector2::new(mitre_mid_ang.cos(), mitre_mid_ang.sin()) * mitre_dist;
        let mitre_mid_line = LineSegment::new(base_pt, bevel_mid_pt);
        let bevel_end_left = mitre_mid_line.point_along_offset(1.0, bevel_half_len);
        let bevel_end_right = mitre_mid_line.point_along_offset(1.0, -bevel_half_len);
        if self.side == Position::Left {
            self.seg_list.add_pt(bevel_end_left);
            self.seg_list.add_pt(bevel_end_right);
        } else {
            self.seg_list.add_pt(bevel_end_right);
            self.seg_list.add_pt(bevel_end_left);
        }
    }

    /// Adds the end cap at `p1` for the segment `p0 -> p1`.
    pub fn add_line_end_cap(&mut self, p0: Coord, p1: Coord) {
        let seg = LineSegment::new(p0, p1);
        let offset_l = offset_segment(&seg, Position::Left, self.distance);
        let offset_r = offset_segment(&seg, Position::Right, self.distance);
        let cap_angle = angle(&p0, &p1);

        match self.params.end_cap() {
            EndCapStyle::Round => {
                self.seg_list.add_pt(offset_l.p1);
                self.add_fillet_arc(p1, cap_angle + FRAC_PI_2, cap_angle - FRAC_PI_2, CLOCKWISE, self.distance);
                self.seg_list.add_pt(offset_r.p1);
            }
            EndCapStyle::Flat => {
                self.seg_list.add_pt(offset_l.p1);
                self.seg_list.add_pt(offset_r.p1);
            }
            EndCapStyle::Square => {
                let side_offset = Vector2::new(cap_angle.cos(), cap_angle.sin()) * self.distance.abs();
                self.seg_list.add_pt(offset_l.p1 + side_offset);
                self.seg_list.add_pt(offset_r.p1 + side_offset);
            }
        }
    }

    /// Adds the arc of the fillet from `p0` to `p1` around `p`.
    fn add_corner_fillet(&mut self, p: Coord, p0: Coord, p1: Coord, direction: i32, radius: f64) {
        let mut start_angle = angle(&p, &p0);
        let end_angle = angle(&p, &p1);
        if direction == CLOCKWISE {
            if start_angle <= end_angle {
                start_angle += 2.0 * PI;
            }
        } else if start_angle >= end_angle {
            start_angle -= 2.0 * PI;
        }
        self.seg_list.add_pt(p0);
        self.add_fillet_arc(p, start_angle, end_angle, direction, radius);
        self.seg_list.add_pt(p1);
    }

    /// Adds the points of a circular arc, excluding its end point.
    fn add_fillet_arc(&mut self, p: Coord, start_angle: f64, end_angle: f64, direction: i32, radius: f64) {
        let direction_factor = if direction == CLOCKWISE { -1.0 } else { 1.0 };
        let total_angle = (start_angle - end_angle).abs();
        let n_segs = (total_angle / self.fillet_angle_quantum + 0.5).trunc();
        if n_segs < 1.0 {
            return;
        }
        let angle_inc = total_angle / n_segs;
        let mut curr_angle = 0.0;
        while curr_angle < total_angle {
            let a = start_angle + direction_factor * curr_angle;
            self.seg_list
                .add_pt(Coord::new(p.x + radius * a.cos(), p.y + radius * a.sin()));
            curr_angle += angle_inc;
        }
    }

    /// Adds a closed clockwise circle of radius `distance` around `p`.
    pub fn create_circle(&mut self, p: Coord) {
        self.seg_list.add_pt(Coord::new(p.x + self.distance, p.y));
        self.add_fillet_arc(p, 0.0, 2.0 * PI, CLOCKWISE, self.distance);
        self.seg_list.close_ring();
    }

    /// Adds a closed clockwise square of half-width `distance` around `p`.
    pub fn create_square(&mut self, p: Coord) {
        let d = self.distance;
        self.seg_list.add_pt(Coord::new(p.x + d, p.y + d));
        self.seg_list.add_pt(Coord::new(p.x + d, p.y - d));
        self.seg_list.add_pt(Coord::new(p.x - d, p.y - d));
        self.seg_list.add_pt(Coord::new(p.x - d, p.y + d));
        self.seg_list.close_ring();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::ring;
    use approx::assert_abs_diff_eq;

    fn generator(params: BufferParameters, distance: f64) -> OffsetSegmentGenerator {
        OffsetSegmentGenerator::new(PrecisionModel::Floating, params, distance)
    }

    #[test]
    fn offset_segment_sides() {
        let seg = LineSegment::new(Coord::new(0.0, 0.0), Coord::new(10.0, 0.0));
        let left = offset_segment(&seg, Position::Left, 2.0);
        let right = offset_segment(&seg, Position::Right, 2.0);
        assert_eq!(left.p0, Coord::new(0.0, 2.0));
        assert_eq!(right.p1, Coord::new(10.0, -2.0));
    }

    #[test]
    fn circle_is_closed_clockwise_on_radius() {
        let mut g = generator(BufferParameters::default(), 1.0);
        g.create_circle(Coord::new(5.0, 5.0));
        let pts = g.into_coords();
        // 4 * 8 arc points plus the closing point.
        assert_eq!(pts.len(), 33);
        assert_eq!(pts.first(), pts.last());
        assert!(!ring::is_ccw(&pts));
        for p in &pts {
            assert_abs_diff_eq!(distance(p, &Coord::new(5.0, 5.0)), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn square_point_buffer() {
        let mut g = generator(BufferParameters::default(), 2.0);
        g.create_square(Coord::new(0.0, 0.0));
        let pts = g.into_coords();
        assert_eq!(pts.len(), 5);
        assert!(!ring::is_ccw(&pts));
        assert_abs_diff_eq!(ring::signed_area(&pts).abs(), 16.0, epsilon = 1e-12);
    }

    #[test]
    fn round_cap_has_two_quadrants_of_segments() {
        let params = BufferParameters::default().with_quadrant_segments(4);
        let mut g = generator(params, 1.0);
        g.add_line_end_cap(Coord::new(0.0, 0.0), Coord::new(10.0, 0.0));
        let pts = g.into_coords();
        // 2 * 4 segments across the half circle: 9 points, ends included.
        assert_eq!(pts.len(), 9);
        assert_abs_diff_eq!(pts[0].y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pts[4].x, 11.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pts[8].y, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn flat_and_square_caps() {
        let flat = BufferParameters::default().with_end_cap(EndCapStyle::Flat);
        let mut g = generator(flat, 1.0);
        g.add_line_end_cap(Coord::new(0.0, 0.0), Coord::new(10.0, 0.0));
        assert_eq!(g.into_coords(), vec![Coord::new(10.0, 1.0), Coord::new(10.0, -1.0)]);

        let square = BufferParameters::default().with_end_cap(EndCapStyle::Square);
        let mut g = generator(square, 1.0);
        g.add_line_end_cap(Coord::new(0.0, 0.0), Coord::new(10.0, 0.0));
        assert_eq!(g.into_coords(), vec![Coord::new(11.0, 1.0), Coord::new(11.0, -1.0)]);
    }

    #[test]
    fn mitre_join_meets_at_corner() {
        let params = BufferParameters::default().with_join(JoinStyle::Mitre);
        let mut g = generator(params, 1.0);
        // Right-angle turn left; the right side is the outside.
        g.init_side_segments(Coord::new(0.0, 0.0), Coord::new(10.0, 0.0), Position::Right);
        g.add_first_segment();
        g.add_next_segment(Coord::new(10.0, 10.0), true);
        g.add_last_segment();
        let pts = g.into_coords();
        assert!(pts.contains(&Coord::new(11.0, -1.0)));
    }

    #[test]
    fn limited_mitre_bevels_sharp_corner() {
        let params = BufferParameters::default().with_join(JoinStyle::Mitre).with_mitre_limit(1.0);
        let mut g = generator(params, 1.0);
        g.init_side_segments(Coord::new(0.0, 0.0), Coord::new(10.0, 0.0), Position::Right);
        g.add_first_segment();
        g.add_next_segment(Coord::new(10.0, 10.0), true);
        g.add_last_segment();
        let pts = g.into_coords();
        assert_eq!(pts.len(), 4);
        for p in &pts[1..3] {
            // Both bevel ends lie on the limit line at distance 1 from the corner.
            let d = distance(p, &Coord::new(10.0, 0.0));
            assert!(d > 1.0 && d < 1.5, "bevel point {p} at distance {d}");
        }
    }

    #[test]
    fn inside_turn_uses_offset_intersection() {
        let mut g = generator(BufferParameters::default(), 1.0);
        g.init_side_segments(Coord::new(0.0, 0.0), Coord::new(10.0, 0.0), Position::Left);
        g.add_first_segment();
        g.add_next_segment(Coord::new(10.0, 10.0), true);
        g.add_last_segment();
        assert_eq!(
            g.into_coords(),
            vec![Coord::new(0.0, 1.0), Coord::new(9.0, 1.0), Coord::new(9.0, 10.0)]
        );
    }

    #[test]
    fn narrow_inside_turn_is_flagged() {
        let mut g = generator(BufferParameters::default(), 1.0);
        g.init_side_segments(Coord::new(0.0, 0.0), Coord::new(1.0, 0.0), Position::Left);
        g.add_next_segment(Coord::new(0.0, 0.1), true);
        assert!(g.has_narrow_concave_angle());
    }
}
