use crate::error::{OperationError, Result};

/// How the ends of buffered lines are shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndCapStyle {
    /// Semicircle around the end point.
    #[default]
    Round,
    /// Cut off square at the end point (butt).
    Flat,
    /// Square extended by the buffer distance past the end point.
    Square,
}

/// How offset segments are joined at convex corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinStyle {
    #[default]
    Round,
    Mitre,
    Bevel,
}

/// Parameters controlling buffer construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferParameters {
    quadrant_segments: usize,
    end_cap: EndCapStyle,
    join: JoinStyle,
    mitre_limit: f64,
    single_sided: bool,
}

impl BufferParameters {
    pub const DEFAULT_QUADRANT_SEGMENTS: usize = 8;
    pub const DEFAULT_MITRE_LIMIT: f64 = 5.0;
    /// Simplification tolerance is the buffer distance divided by this.
    pub const SIMPLIFY_FACTOR: f64 = 100.0;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of segments used to approximate a quarter circle.
    ///
    /// Zero selects bevel joins and a negative value selects mitre joins
    /// with the mitre limit `|quad_segs|`. Non-round joins use the default
    /// segment count for caps.
    #[must_use]
    pub fn with_quadrant_segments(mut self, quad_segs: i32) -> Self {
        if quad_segs == 0 {
            self.join = JoinStyle::Bevel;
        }
        if quad_segs < 0 {
            self.join = JoinStyle::Mitre;
            self.mitre_limit = f64::from(quad_segs.unsigned_abs());
        }
        self.quadrant_segments = usize::try_from(quad_segs).unwrap_or(1).max(1);
        if self.join != JoinStyle::Round {
            self.quadrant_segments = Self::DEFAULT_QUADRANT_SEGMENTS;
        }
        self
    }

    #[must_use]
    pub fn with_end_cap(mut self, end_cap: EndCapStyle) -> Self {
        self.end_cap = end_cap;
        self
    }

    #[must_use]
    pub fn with_join(mut self, join: JoinStyle) -> Self {
        self.join = join;
        self
    }

    #[must_use]
    pub fn with_mitre_limit(mut self, mitre_limit: f64) -> Self {
        self.mitre_limit = mitre_limit;
        self
    }

    /// Buffers lines on one side only: the left for positive distances,
    /// the right for negative ones. Polygons are unaffected.
    #[must_use]
    pub fn with_single_sided(mut self, single_sided: bool) -> Self {
        self.single_sided = single_sided;
        self
    }

    #[must_use]
    pub fn quadrant_segments(&self) -> usize {
        self.quadrant_segments
    }

    #[must_use]
    pub fn end_cap(&self) -> EndCapStyle {
        self.end_cap
    }

    #[must_use]
    pub fn join(&self) -> JoinStyle {
        self.join
    }

    #[must_use]
    pub fn mitre_limit(&self) -> f64 {
        self.mitre_limit
    }

    #[must_use]
    pub fn is_single_sided(&self) -> bool {
        self.single_sided
    }

    /// Checks that the parameters can drive a buffer computation.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the mitre limit is not a
    /// finite positive number.
    pub fn validate(&self) -> Result<()> {
        if !self.mitre_limit.is_finite() || self.mitre_limit <= 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "mitre limit must be finite and positive, got {}",
                self.mitre_limit
            ))
            .into());
        }
        Ok(())
    }
}

impl Default for BufferParameters {
    fn default() -> Self {
        Self {
            quadrant_segments: Self::DEFAULT_QUADRANT_SEGMENTS,
            end_cap: EndCapStyle::Round,
            join: JoinStyle::Round,
            mitre_limit: Self::DEFAULT_MITRE_LIMIT,
            single_sided: false,
        }
    }
}
