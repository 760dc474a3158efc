use super::Coord;

/// Numeric grid that coordinates are snapped to before noding.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PrecisionModel {
    /// Full double precision, no rounding.
    #[default]
    Floating,
    /// Coordinates are rounded to multiples of `1 / scale`.
    Fixed { scale: f64 },
}

impl PrecisionModel {
    /// Creates a fixed model with the given scale factor.
    #[must_use]
    pub fn fixed(scale: f64) -> Self {
        Self::Fixed { scale }
    }

    #[must_use]
    pub fn is_floating(&self) -> bool {
        matches!(self, Self::Floating)
    }

    /// Scale factor, `None` for floating models.
    #[must_use]
    pub fn scale(&self) -> Option<f64> {
        match self {
            Self::Floating => None,
            Self::Fixed { scale } => Some(*scale),
        }
    }

    /// Rounds a single ordinate (round-half-up).
    #[must_use]
    pub fn make_precise(&self, v: f64) -> f64 {
        match self {
            Self::Floating => v,
            Self::Fixed { scale } => (v * scale + 0.5).floor() / scale,
        }
    }

    /// Rounds both ordinates of a coordinate.
    #[must_use]
    pub fn make_precise_coord(&self, c: &Coord) -> Coord {
        match self {
            Self::Floating => *c,
            Self::Fixed { .. } => Coord::new(self.make_precise(c.x), self.make_precise(c.y)),
        }
    }
}
