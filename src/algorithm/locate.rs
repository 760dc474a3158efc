use crate::geometry::{Geometry, Polygon};
use crate::math::Coord;
use crate::topology::Location;

use super::ring::is_point_in_ring;

/// Locates a point relative to the polygonal parts of a geometry.
///
/// Returns [`Location::Interior`] if the point lies in the closure of some
/// polygon, otherwise [`Location::Exterior`]. Boundary points count as
/// interior, which is all the labelling fallback needs.
#[must_use]
pub fn locate_point_in_area(p: &Coord, geom: &Geometry) -> Location {
    if geom.is_empty() {
        return Location::Exterior;
    }
    if geom.polygons().into_iter().any(|poly| contains_point(p, poly)) {
        Location::Interior
    } else {
        Location::Exterior
    }
}

fn contains_point(p: &Coord, poly: &Polygon) -> bool {
    if poly.is_empty() {
        return false;
    }
    let shell = poly.exterior();
    if !shell.envelope().intersects_point(p) || !is_point_in_ring(p, shell.coords()) {
        return false;
    }
    !poly
        .interiors()
        .iter()
        .any(|hole| is_point_in_ring(p, hole.coords()))
}
