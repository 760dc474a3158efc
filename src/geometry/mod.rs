pub mod line_string;
pub mod polygon;

pub use line_string::{LineString, LinearRing};
pub use polygon::Polygon;

use crate::math::{Coord, Envelope};

/// The closed set of planar geometry kinds accepted and produced by the
/// buffer and union operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coord),
    MultiPoint(Vec<Coord>),
    LineString(LineString),
    LinearRing(LinearRing),
    MultiLineString(Vec<LineString>),
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    /// The empty polygon, used as the result of degenerate buffers.
    #[must_use]
    pub fn empty_polygon() -> Self {
        Self::Polygon(Polygon::empty())
    }

    /// Builds the most specific polygonal geometry for a list of polygons:
    /// an empty polygon, a single polygon or a multi-polygon.
    #[must_use]
    pub fn from_polygons(mut polys: Vec<Polygon>) -> Self {
        match polys.len() {
            0 => Self::empty_polygon(),
            1 => polys.pop().map_or_else(Self::empty_polygon, Self::Polygon),
            _ => Self::MultiPolygon(polys),
        }
    }

    /// Combines the non-empty elements of several geometries into one
    /// geometry without any noding.
    ///
    /// Polygonal inputs produce a polygonal result; anything else produces a
    /// geometry collection.
    #[must_use]
    pub fn combine<I>(geoms: I) -> Self
    where
        I: IntoIterator<Item = Geometry>,
    {
        let mut elems = Vec::new();
        for g in geoms {
            g.flatten_into(&mut elems);
        }
        if elems.iter().all(|g| matches!(g, Geometry::Polygon(_))) {
            let polys = elems
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::Polygon(p) => Some(p),
                    _ => None,
                })
                .collect();
            return Self::from_polygons(polys);
        }
        if elems.len() == 1 {
            if let Some(g) = elems.pop() {
                return g;
            }
        }
        Self::GeometryCollection(elems)
    }

    /// Pushes the non-empty atomic elements of this geometry onto `out`.
    fn flatten_into(self, out: &mut Vec<Geometry>) {
        match self {
            Self::MultiPoint(pts) => out.extend(pts.into_iter().map(Self::Point)),
            Self::MultiLineString(lines) => out.extend(
                lines
                    .into_iter()
                    .filter(|l| !l.is_empty())
                    .map(Self::LineString),
            ),
            Self::MultiPolygon(polys) => out.extend(
                polys
                    .into_iter()
                    .filter(|p| !p.is_empty())
                    .map(Self::Polygon),
            ),
            Self::GeometryCollection(geoms) => {
                for g in geoms {
                    g.flatten_into(out);
                }
            }
            other => {
                if !other.is_empty() {
                    out.push(other);
                }
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Point(_) => false,
            Self::MultiPoint(pts) => pts.is_empty(),
            Self::LineString(l) => l.is_empty(),
            Self::LinearRing(r) => r.is_empty(),
            Self::MultiLineString(lines) => lines.iter().all(LineString::is_empty),
            Self::Polygon(p) => p.is_empty(),
            Self::MultiPolygon(polys) => polys.iter().all(Polygon::is_empty),
            Self::GeometryCollection(geoms) => geoms.iter().all(Geometry::is_empty),
        }
    }

    /// Number of top-level elements (1 for atomic geometries).
    #[must_use]
    pub fn num_geometries(&self) -> usize {
        match self {
            Self::MultiPoint(pts) => pts.len(),
            Self::MultiLineString(lines) => lines.len(),
            Self::MultiPolygon(polys) => polys.len(),
            Self::GeometryCollection(geoms) => geoms.len(),
            _ => 1,
        }
    }

    /// Top-level elements as owned geometries.
    #[must_use]
    pub fn elements(&self) -> Vec<Geometry> {
        match self {
            Self::MultiPoint(pts) => pts.iter().copied().map(Self::Point).collect(),
            Self::MultiLineString(lines) => lines.iter().cloned().map(Self::LineString).collect(),
            Self::MultiPolygon(polys) => polys.iter().cloned().map(Self::Polygon).collect(),
            Self::GeometryCollection(geoms) => geoms.clone(),
            other => vec![other.clone()],
        }
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::null();
        self.for_each_coord(&mut |c| env.expand_to_include(c));
        env
    }

    /// Visits every coordinate of the geometry.
    pub fn for_each_coord(&self, f: &mut dyn FnMut(&Coord)) {
        match self {
            Self::Point(c) => f(c),
            Self::MultiPoint(pts) => pts.iter().for_each(f),
            Self::LineString(l) => l.coords().iter().for_each(f),
            Self::LinearRing(r) => r.coords().iter().for_each(f),
            Self::MultiLineString(lines) => {
                for l in lines {
                    l.coords().iter().for_each(&mut *f);
                }
            }
            Self::Polygon(p) => polygon_coords(p, f),
            Self::MultiPolygon(polys) => {
                for p in polys {
                    polygon_coords(p, f);
                }
            }
            Self::GeometryCollection(geoms) => {
                for g in geoms {
                    g.for_each_coord(f);
                }
            }
        }
    }

    /// Returns `true` if every coordinate is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        let mut finite = true;
        self.for_each_coord(&mut |c| finite &= c.x.is_finite() && c.y.is_finite());
        finite
    }

    /// Total polygonal area. Puntal and lineal parts contribute nothing.
    #[must_use]
    pub fn area(&self) -> f64 {
        match self {
            Self::Polygon(p) => p.area(),
            Self::MultiPolygon(polys) => polys.iter().map(Polygon::area).sum(),
            Self::GeometryCollection(geoms) => geoms.iter().map(Geometry::area).sum(),
            _ => 0.0,
        }
    }

    /// All polygons contained in this geometry, in order.
    #[must_use]
    pub fn polygons(&self) -> Vec<&Polygon> {
        match self {
            Self::Polygon(p) => vec![p],
            Self::MultiPolygon(polys) => polys.iter().collect(),
            Self::GeometryCollection(geoms) => geoms.iter().flat_map(Geometry::polygons).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<Polygon> for Geometry {
    fn from(p: Polygon) -> Self {
        Self::Polygon(p)
    }
}

impl From<LineString> for Geometry {
    fn from(l: LineString) -> Self {
        Self::LineString(l)
    }
}

fn polygon_coords(p: &Polygon, f: &mut dyn FnMut(&Coord)) {
    p.exterior().coords().iter().for_each(&mut *f);
    for hole in p.interiors() {
        hole.coords().iter().for_each(&mut *f);
    }
}

/// Copies `pts`, dropping consecutive duplicate coordinates.
#[must_use]
pub fn remove_repeated_points(pts: &[Coord]) -> Vec<Coord> {
    let mut out: Vec<Coord> = Vec::with_capacity(pts.len());
    for p in pts {
        if out.last() != Some(p) {
            out.push(*p);
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, size: f64) -> Polygon {
        Polygon::from_rings(vec![vec![
            Coord::new(x, y),
            Coord::new(x, y + size),
            Coord::new(x + size, y + size),
            Coord::new(x + size, y),
        ]])
        .unwrap()
    }

    #[test]
    fn from_polygons_picks_specific_kind() {
        assert!(Geometry::from_polygons(Vec::new()).is_empty());
        assert!(matches!(
            Geometry::from_polygons(vec![square(0.0, 0.0, 1.0)]),
            Geometry::Polygon(_)
        ));
        let multi = Geometry::from_polygons(vec![square(0.0, 0.0, 1.0), square(5.0, 0.0, 1.0)]);
        assert_eq!(multi.num_geometries(), 2);
    }

    #[test]
    fn combine_flattens_polygonal_inputs() {
        let a = Geometry::from_polygons(vec![square(0.0, 0.0, 1.0), square(5.0, 0.0, 1.0)]);
        let b = Geometry::Polygon(square(10.0, 0.0, 1.0));
        let combined = Geometry::combine([a, b, Geometry::empty_polygon()]);
        assert!(matches!(combined, Geometry::MultiPolygon(ref p) if p.len() == 3));
        assert!((combined.area() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn combine_mixed_gives_collection() {
        let line = LineString::new(vec![Coord::new(0.0, 0.0), Coord::new(1.0, 0.0)]).unwrap();
        let combined = Geometry::combine([Geometry::Polygon(square(0.0, 0.0, 1.0)), line.into()]);
        assert!(matches!(combined, Geometry::GeometryCollection(ref g) if g.len() == 2));
    }

    #[test]
    fn envelope_covers_all_parts() {
        let g = Geometry::GeometryCollection(vec![
            Geometry::Point(Coord::new(-3.0, 1.0)),
            Geometry::Polygon(square(0.0, 0.0, 2.0)),
        ]);
        let env = g.envelope();
        assert!((env.min_x() + 3.0).abs() < 1e-12);
        assert!((env.max_y() - 2.0).abs() < 1e-12);
        assert!(g.is_finite());
    }

    #[test]
    fn non_finite_detected() {
        let g = Geometry::Point(Coord::new(f64::NAN, 0.0));
        assert!(!g.is_finite());
    }

    #[test]
    fn repeated_points_removed() {
        let pts = [
            Coord::new(0.0, 0.0),
            Coord::new(0.0, 0.0),
            Coord::new(1.0, 0.0),
            Coord::new(1.0, 0.0),
            Coord::new(0.0, 0.0),
        ];
        assert_eq!(remove_repeated_points(&pts).len(), 3);
    }
}
