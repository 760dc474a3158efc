use crate::algorithm::ring;
use crate::error::{OperationError, Result};
use crate::geometry::{remove_repeated_points, Geometry, LinearRing, Polygon};
use crate::math::distance_2d::point_to_segment;
use crate::math::triangle::in_centre;
use crate::math::{Coord, Envelope};
use crate::noding::NodedSegmentString;
use crate::topology::{Label, Location, Position};

use super::curve_builder::OffsetCurveBuilder;

/// A raw buffer curve labelled with the locations on its left and right.
pub type BufferCurve = NodedSegmentString<Label>;

/// Collects the labelled raw offset curves of every component of a
/// geometry.
///
/// Each curve is labelled so that its right side faces the buffer
/// interior: `(on: Boundary, left: Exterior, right: Interior)`.
#[derive(Debug)]
pub struct OffsetCurveSetBuilder<'a> {
    geom: &'a Geometry,
    distance: f64,
    curve_builder: OffsetCurveBuilder,
    curves: Vec<BufferCurve>,
}

impl<'a> OffsetCurveSetBuilder<'a> {
    #[must_use]
    pub fn new(geom: &'a Geometry, distance: f64, curve_builder: OffsetCurveBuilder) -> Self {
        Self {
            geom,
            distance,
            curve_builder,
            curves: Vec::new(),
        }
    }

    /// Computes the curves.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the geometry has non-finite
    /// coordinates.
    pub fn curves(mut self) -> Result<Vec<BufferCurve>> {
        if !self.geom.is_finite() {
            return Err(OperationError::InvalidInput("geometry has non-finite coordinates".to_owned()).into());
        }
        self.add(self.geom);
        Ok(self.curves)
    }

    fn add(&mut self, geom: &Geometry) {
        if geom.is_empty() {
            return;
        }
        match geom {
            Geometry::Point(p) => self.add_point(*p),
            Geometry::MultiPoint(pts) => pts.iter().for_each(|p| self.add_point(*p)),
            Geometry::LineString(l) => self.add_line_string(l.coords()),
            Geometry::LinearRing(r) => self.add_line_string(r.coords()),
            Geometry::MultiLineString(lines) => lines.iter().for_each(|l| self.add_line_string(l.coords())),
            Geometry::Polygon(p) => self.add_polygon(p),
            Geometry::MultiPolygon(polys) => polys.iter().for_each(|p| self.add_polygon(p)),
            Geometry::GeometryCollection(geoms) => geoms.iter().for_each(|g| self.add(g)),
        }
    }

    fn add_curve(&mut self, curve: Option<Vec<Coord>>, left: Location, right: Location) {
        let Some(curve) = curve else {
            return;
        };
        if curve.len() < 2 {
            return;
        }
        let label = Label::area(0, Location::Boundary, left, right);
        self.curves.push(NodedSegmentString::new(curve, label));
    }

    fn add_point(&mut self, p: Coord) {
        if self.distance <= 0.0 {
            return;
        }
        let curve = self.curve_builder.line_curve(&[p], self.distance);
        self.add_curve(curve, Location::Exterior, Location::Interior);
    }

    fn add_line_string(&mut self, pts: &[Coord]) {
        if self.distance <= 0.0 && !self.curve_builder.params().is_single_sided() {
            return;
        }
        let coords = remove_repeated_points(pts);
        let curve = self.curve_builder.line_curve(&coords, self.distance);
        self.add_curve(curve, Location::Exterior, Location::Interior);
    }

    fn add_polygon(&mut self, poly: &Polygon) {
        let (offset_distance, offset_side) = if self.distance < 0.0 {
            (-self.distance, Position::Right)
        } else {
            (self.distance, Position::Left)
        };

        let shell = poly.exterior();
        let shell_coords = remove_repeated_points(shell.coords());
        // Skip shells that erode away entirely or have too few vertices.
        if self.distance < 0.0 && is_eroded_completely(shell.coords(), self.distance) {
            return;
        }
        if self.distance <= 0.0 && shell_coords.len() < 3 {
            return;
        }
        self.add_polygon_ring(&shell_coords, offset_distance, offset_side, Location::Exterior, Location::Interior);

        for hole in poly.interiors() {
            // Holes that are filled in entirely by a positive buffer.
            if self.distance > 0.0 && is_eroded_completely(hole.coords(), -self.distance) {
                continue;
            }
            let hole_coords = remove_repeated_points(hole.coords());
            self.add_polygon_ring(
                &hole_coords,
                offset_distance,
                offset_side.opposite(),
                Location::Interior,
                Location::Exterior,
            );
        }
    }

    /// Adds the curve of a ring whose left and right locations are given for
    /// clockwise orientation; counter-clockwise rings are flipped.
    fn add_polygon_ring(
        &mut self,
        coords: &[Coord],
        offset_distance: f64,
        side: Position,
        cw_left: Location,
        cw_right: Location,
    ) {
        if offset_distance == 0.0 && coords.len() < LinearRing::MINIMUM_VALID_SIZE {
            return;
        }
        let (mut left, mut right, mut side) = (cw_left, cw_right, side);
        if coords.len() >= LinearRing::MINIMUM_VALID_SIZE && ring::is_ccw(coords) {
            left = cw_right;
            right = cw_left;
            side = side.opposite();
        }
        let curve = self.curve_builder.ring_curve(coords, side, offset_distance);
        self.add_curve(curve, left, right);
    }
}

/// Returns `true` if a negative buffer of `distance` removes the whole ring.
///
/// The test is conservative: `false` does not mean the ring survives.
fn is_eroded_completely(ring: &[Coord], distance: f64) -> bool {
    if ring.len() < 4 {
        return distance < 0.0;
    }
    if ring.len() == 4 {
        return is_triangle_eroded_completely(ring, distance);
    }
    let env = Envelope::of_points(ring);
    let env_min_dimension = env.height().min(env.width());
    distance < 0.0 && 2.0 * distance.abs() > env_min_dimension
}

fn is_triangle_eroded_completely(tri: &[Coord], distance: f64) -> bool {
    let centre = in_centre(&tri[0], &tri[1], &tri[2]);
    let dist_to_centre = point_to_segment(&centre, &tri[0], &tri[1]);
    dist_to_centre < distance.abs()
}
