use crate::geometry::Geometry;
use crate::math::Envelope;

/// Computes the axis-aligned bounding box of a geometry.
#[derive(Debug)]
pub struct BoundingBox<'a> {
    geom: &'a Geometry,
}

impl<'a> BoundingBox<'a> {
    #[must_use]
    pub fn new(geom: &'a Geometry) -> Self {
        Self { geom }
    }

    /// Executes the query, returning `None` for an empty geometry.
    #[must_use]
    pub fn execute(&self) -> Option<Envelope> {
        let env = self.geom.envelope();
        (!env.is_null()).then_some(env)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Coord;

    #[test]
    fn multipoint_box() {
        let geom = Geometry::MultiPoint(vec![Coord::new(1.0, -2.0), Coord::new(-3.0, 4.0)]);
        let env = BoundingBox::new(&geom).execute().unwrap();
        assert_eq!((env.min_x(), env.min_y(), env.max_x(), env.max_y()), (-3.0, -2.0, 1.0, 4.0));
    }

    #[test]
    fn empty_geometry_has_no_box() {
        assert!(BoundingBox::new(&Geometry::empty_polygon()).execute().is_none());
    }
}
