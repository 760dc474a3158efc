use crate::geometry::Geometry;

/// Computes the total area of the polygonal parts of a geometry.
///
/// Hole areas are subtracted from their shells. Points and lines have no
/// area.
#[derive(Debug)]
pub struct Area<'a> {
    geom: &'a Geometry,
}

impl<'a> Area<'a> {
    #[must_use]
    pub fn new(geom: &'a Geometry) -> Self {
        Self { geom }
    }

    #[must_use]
    pub fn execute(&self) -> f64 {
        self.geom.area()
    }
}
