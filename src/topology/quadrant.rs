/// Quadrant of a direction vector, numbered counter-clockwise from the
/// positive x-axis.
///
/// ```text
///  1 | 0
///  --+--
///  2 | 3
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quadrant {
    NE = 0,
    NW = 1,
    SW = 2,
    SE = 3,
}

impl Quadrant {
    /// Quadrant of the direction `(dx, dy)`, or `None` for the zero vector.
    ///
    /// East and north fall in `NE`, west in `NW`, south in `SE`.
    #[must_use]
    pub fn of(dx: f64, dy: f64) -> Option<Self> {
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        Some(if dx >= 0.0 {
            if dy >= 0.0 {
                Self::NE
            } else {
                Self::SE
            }
        } else if dy >= 0.0 {
            Self::NW
        } else {
            Self::SW
        })
    }

    #[must_use]
    pub fn is_northern(self) -> bool {
        matches!(self, Self::NE | Self::NW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_directions() {
        assert_eq!(Quadrant::of(1.0, 0.0), Some(Quadrant::NE));
        assert_eq!(Quadrant::of(0.0, 1.0), Some(Quadrant::NE));
        assert_eq!(Quadrant::of(-1.0, 0.0), Some(Quadrant::NW));
        assert_eq!(Quadrant::of(0.0, -1.0), Some(Quadrant::SE));
        assert_eq!(Quadrant::of(-1.0, -1.0), Some(Quadrant::SW));
        assert_eq!(Quadrant::of(0.0, 0.0), None);
    }

    #[test]
    fn ordering_is_counter_clockwise() {
        assert!(Quadrant::NE < Quadrant::NW);
        assert!(Quadrant::SW < Quadrant::SE);
        assert!(Quadrant::NW.is_northern());
        assert!(!Quadrant::SE.is_northern());
    }
}
