//! Buffering of planar geometries.
//!
//! Raw offset curves are built for every component of the input, noded,
//! turned into a planar graph and labelled with depths; the edges bounding
//! depth-one regions form the result polygons.

mod builder;
mod curve_builder;
mod curve_set_builder;
mod depth_locater;
mod op;
mod parameters;
mod polygon_builder;
mod segment_generator;
mod simplifier;
mod subgraph;

pub use builder::BufferBuilder;
pub use curve_builder::OffsetCurveBuilder;
pub use curve_set_builder::{BufferCurve, OffsetCurveSetBuilder};
pub use op::{precision_scale_factor, BufferOp, MAX_PRECISION_DIGITS};
pub use parameters::{BufferParameters, EndCapStyle, JoinStyle};

use crate::error::Result;
use crate::geometry::Geometry;

/// Buffers `geom` by `distance` with the given parameters.
///
/// Positive distances grow the geometry, negative distances shrink
/// polygons. Lines and points have no interior, so their negative buffers
/// are empty unless the parameters are single-sided.
///
/// # Errors
///
/// Returns `OperationError::InvalidInput` for non-finite input or invalid
/// parameters, and a `TopologyError` if the buffer fails at every
/// precision.
pub fn buffer(geom: &Geometry, distance: f64, params: &BufferParameters) -> Result<Geometry> {
    BufferOp::new(geom).with_params(*params).execute(distance)
}

/// Buffers every geometry independently, in parallel.
///
/// # Errors
///
/// Returns the first error encountered, in input order.
#[cfg(feature = "parallel")]
pub fn buffer_all(geoms: &[Geometry], distance: f64, params: &BufferParameters) -> Result<Vec<Geometry>> {
    use rayon::prelude::*;

    geoms.par_iter().map(|g| buffer(g, distance, params)).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::LineString;
    use crate::math::Coord;

    #[test]
    fn negative_line_buffer_is_empty() {
        let line = Geometry::LineString(LineString::new(vec![Coord::new(0.0, 0.0), Coord::new(5.0, 0.0)]).unwrap());
        let out = buffer(&line, -1.0, &BufferParameters::default()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn invalid_mitre_limit_fails_fast() {
        let params = BufferParameters::default().with_mitre_limit(f64::NAN);
        let out = buffer(&Geometry::Point(Coord::new(0.0, 0.0)), 1.0, &params);
        assert!(matches!(out, Err(e) if !e.is_topology()));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn buffer_all_matches_sequential() {
        let geoms: Vec<Geometry> = (0..8).map(|i| Geometry::Point(Coord::new(f64::from(i) * 3.0, 0.0))).collect();
        let params = BufferParameters::default();
        let parallel = buffer_all(&geoms, 1.0, &params).unwrap();
        for (g, p) in geoms.iter().zip(&parallel) {
            assert_eq!(&buffer(g, 1.0, &params).unwrap(), p);
        }
    }
}
