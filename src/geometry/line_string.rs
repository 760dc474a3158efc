use crate::error::{OperationError, Result};
use crate::math::{Coord, Envelope};

/// An open sequence of coordinates.
///
/// Either empty or carrying at least two points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineString {
    coords: Vec<Coord>,
}

impl LineString {
    /// Creates a line string.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if exactly one point is given.
    pub fn new(coords: Vec<Coord>) -> Result<Self> {
        if coords.len() == 1 {
            return Err(OperationError::InvalidInput(
                "line string needs 0 or at least 2 points".to_owned(),
            )
            .into());
        }
        Ok(Self { coords })
    }

    #[must_use]
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Returns `true` if the first and last points coincide.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.coords.first(), self.coords.last()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        Envelope::of_points(&self.coords)
    }
}

/// A closed ring of coordinates (first point equals last).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearRing {
    coords: Vec<Coord>,
}

impl LinearRing {
    /// Smallest number of points in a non-empty ring.
    pub const MINIMUM_VALID_SIZE: usize = 4;

    /// Creates a ring from a closed coordinate sequence.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the sequence is not closed or
    /// has between 1 and 3 points.
    pub fn new(coords: Vec<Coord>) -> Result<Self> {
        if coords.is_empty() {
            return Ok(Self { coords });
        }
        if coords.len() < Self::MINIMUM_VALID_SIZE {
            return Err(OperationError::InvalidInput(format!(
                "invalid number of points in linear ring (found {}, must be 0 or >= {})",
                coords.len(),
                Self::MINIMUM_VALID_SIZE
            ))
            .into());
        }
        if coords.first() != coords.last() {
            return Err(OperationError::InvalidInput(
                "points of linear ring do not form a closed line string".to_owned(),
            )
            .into());
        }
        Ok(Self { coords })
    }

    /// Creates a ring, appending the first point if the sequence is open.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if fewer than 3 distinct
    /// positions are given.
    pub fn closed(mut coords: Vec<Coord>) -> Result<Self> {
        if let (Some(first), Some(last)) = (coords.first().copied(), coords.last()) {
            if first != *last {
                coords.push(first);
            }
        }
        Self::new(coords)
    }

    #[must_use]
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        Envelope::of_points(&self.coords)
    }

    /// Unsigned enclosed area.
    #[must_use]
    pub fn area(&self) -> f64 {
        crate::algorithm::ring::signed_area(&self.coords).abs()
    }

    /// Returns `true` if the ring is oriented counter-clockwise.
    #[must_use]
    pub fn is_ccw(&self) -> bool {
        crate::algorithm::ring::is_ccw(&self.coords)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn square() -> Vec<Coord> {
        vec![
            Coord::new(0.0, 0.0),
            Coord::new(0.0, 2.0),
            Coord::new(2.0, 2.0),
            Coord::new(2.0, 0.0),
            Coord::new(0.0, 0.0),
        ]
    }

    #[test]
    fn ring_requires_closure() {
        let mut pts = square();
        pts.pop();
        assert!(LinearRing::new(pts.clone()).is_err());
        let ring = LinearRing::closed(pts).unwrap();
        assert_eq!(ring.coords().len(), 5);
    }

    #[test]
    fn ring_rejects_too_few_points() {
        let pts = vec![Coord::new(0.0, 0.0), Coord::new(1.0, 0.0), Coord::new(0.0, 0.0)];
        assert!(LinearRing::new(pts).is_err());
        assert!(LinearRing::new(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn ring_area_and_orientation() {
        let ring = LinearRing::new(square()).unwrap();
        assert!((ring.area() - 4.0).abs() < 1e-12);
        assert!(!ring.is_ccw());
    }

    #[test]
    fn line_string_rejects_single_point() {
        assert!(LineString::new(vec![Coord::new(1.0, 1.0)]).is_err());
        let line = LineString::new(vec![Coord::new(0.0, 0.0), Coord::new(1.0, 1.0)]).unwrap();
        assert!(!line.is_closed());
        assert!((line.envelope().width() - 1.0).abs() < 1e-12);
    }
}
