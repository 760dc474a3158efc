use crate::algorithm::locate::locate_point_in_area;
use crate::algorithm::LineIntersector;
use crate::error::{OperationError, Result};
use crate::geometry::{Geometry, LinearRing};
use crate::math::PrecisionModel;
use crate::noding::{IntersectionAdder, McIndexNoder, NodedSegmentString, Noder};
use crate::topology::{Edge, EdgeList, Label, Location, PlanarGraph};

/// Checks the topological consistency of the polygonal parts of a
/// geometry.
///
/// The rings are noded against each other and built into a planar graph
/// labelled with the side locations each ring claims. The geometry is
/// consistent when the labels agree around every node, which fails for
/// self-crossing rings and for overlapping polygons.
#[derive(Debug)]
pub struct IsValid<'a> {
    geom: &'a Geometry,
}

impl<'a> IsValid<'a> {
    #[must_use]
    pub fn new(geom: &'a Geometry) -> Self {
        Self { geom }
    }

    /// Executes the check. Geometries without polygons are consistent.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the geometry has non-finite
    /// coordinates.
    pub fn execute(&self) -> Result<bool> {
        if !self.geom.is_finite() {
            return Err(OperationError::InvalidInput("geometry has non-finite coordinates".to_owned()).into());
        }
        let mut rings = Vec::new();
        for poly in self.geom.polygons() {
            if poly.is_empty() {
                continue;
            }
            rings.push(ring_string(poly.exterior(), Location::Exterior, Location::Interior));
            for hole in poly.interiors() {
                rings.push(ring_string(hole, Location::Interior, Location::Exterior));
            }
        }
        if rings.is_empty() {
            return Ok(true);
        }

        let mut noder = McIndexNoder::new(IntersectionAdder::new(LineIntersector::new(PrecisionModel::Floating)));
        let mut edges = EdgeList::new();
        for s in noder.compute_nodes(rings) {
            edges.insert_unique(Edge::new(s.coords().to_vec(), *s.data()));
        }

        let mut graph = PlanarGraph::new();
        let consistent = graph
            .add_edges(edges.into_edges())
            .and_then(|()| {
                graph.compute_labelling(&mut |geom_index, p| {
                    if geom_index == 0 {
                        locate_point_in_area(p, self.geom)
                    } else {
                        Location::Exterior
                    }
                })
            })
            .and_then(|()| graph.is_area_labels_consistent(0));
        Ok(consistent.unwrap_or(false))
    }
}

/// A ring labelled with its side locations, given for clockwise
/// orientation and swapped for counter-clockwise rings.
fn ring_string(ring: &LinearRing, cw_left: Location, cw_right: Location) -> NodedSegmentString<Label> {
    let (left, right) = if ring.is_ccw() {
        (cw_right, cw_left)
    } else {
        (cw_left, cw_right)
    };
    NodedSegmentString::new(ring.coords().to_vec(), Label::area(0, Location::Boundary, left, right))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;
    use crate::math::Coord;

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    fn square(x0: f64, y0: f64, size: f64) -> Polygon {
        Polygon::from_rings(vec![vec![
            c(x0, y0),
            c(x0, y0 + size),
            c(x0 + size, y0 + size),
            c(x0 + size, y0),
            c(x0, y0),
        ]])
        .unwrap()
    }

    #[test]
    fn square_with_hole_is_valid() {
        let poly = Polygon::from_rings(vec![
            vec![c(0.0, 0.0), c(10.0, 0.0), c(10.0, 10.0), c(0.0, 10.0), c(0.0, 0.0)],
            vec![c(4.0, 4.0), c(4.0, 6.0), c(6.0, 6.0), c(6.0, 4.0), c(4.0, 4.0)],
        ])
        .unwrap();
        assert!(IsValid::new(&Geometry::Polygon(poly)).execute().unwrap());
    }

    #[test]
    fn bow_tie_is_invalid() {
        let poly = Polygon::from_rings(vec![vec![c(0.0, 0.0), c(2.0, 2.0), c(2.0, 0.0), c(0.0, 2.0), c(0.0, 0.0)]]).unwrap();
        assert!(!IsValid::new(&Geometry::Polygon(poly)).execute().unwrap());
    }

    #[test]
    fn overlapping_multipolygon_is_invalid() {
        let geom = Geometry::MultiPolygon(vec![square(0.0, 0.0, 2.0), square(1.0, 1.0, 2.0)]);
        assert!(!IsValid::new(&geom).execute().unwrap());
    }

    #[test]
    fn disjoint_multipolygon_is_valid() {
        let geom = Geometry::MultiPolygon(vec![square(0.0, 0.0, 1.0), square(3.0, 0.0, 1.0)]);
        assert!(IsValid::new(&geom).execute().unwrap());
    }

    #[test]
    fn non_polygonal_input_is_trivially_valid() {
        assert!(IsValid::new(&Geometry::Point(c(1.0, 1.0))).execute().unwrap());
    }
}
