use crate::error::Result;
use crate::math::{Coord, Envelope};

use super::LinearRing;

/// A polygon: one exterior shell and zero or more holes.
///
/// A polygon with an empty shell is the empty polygon.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    shell: LinearRing,
    holes: Vec<LinearRing>,
}

impl Polygon {
    #[must_use]
    pub fn new(shell: LinearRing, holes: Vec<LinearRing>) -> Self {
        Self { shell, holes }
    }

    /// Builds a polygon from raw coordinate rings (the first is the shell).
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if any ring is invalid.
    pub fn from_rings(rings: Vec<Vec<Coord>>) -> Result<Self> {
        let mut iter = rings.into_iter();
        let shell = match iter.next() {
            Some(pts) => LinearRing::closed(pts)?,
            None => return Ok(Self::empty()),
        };
        let holes = iter.map(LinearRing::closed).collect::<Result<Vec<_>>>()?;
        Ok(Self { shell, holes })
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn exterior(&self) -> &LinearRing {
        &self.shell
    }

    #[must_use]
    pub fn interiors(&self) -> &[LinearRing] {
        &self.holes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shell.is_empty()
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        self.shell.envelope()
    }

    /// Shell area minus hole areas.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.shell.area() - self.holes.iter().map(LinearRing::area).sum::<f64>()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn area_subtracts_holes() {
        let poly = Polygon::from_rings(vec![
            vec![
                Coord::new(0.0, 0.0),
                Coord::new(0.0, 10.0),
                Coord::new(10.0, 10.0),
                Coord::new(10.0, 0.0),
            ],
            vec![
                Coord::new(2.0, 2.0),
                Coord::new(4.0, 2.0),
                Coord::new(4.0, 4.0),
                Coord::new(2.0, 4.0),
            ],
        ])
        .unwrap();
        assert!((poly.area() - 96.0).abs() < 1e-9, "area={}", poly.area());
        assert_eq!(poly.interiors().len(), 1);
    }

    #[test]
    fn empty_polygon() {
        let poly = Polygon::from_rings(Vec::new()).unwrap();
        assert!(poly.is_empty());
        assert!(poly.envelope().is_null());
        assert!(poly.area().abs() < 1e-12);
    }
}
