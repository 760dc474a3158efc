//! Polygon union.

mod cascaded;

pub use cascaded::{CascadedPolygonUnion, STRTREE_NODE_CAPACITY};

use crate::error::Result;
use crate::geometry::{Geometry, Polygon};
use crate::operations::buffer::BufferOp;

/// Union of the polygonal parts of two geometries, computed as the
/// zero-distance buffer of both together.
///
/// Lineal and puntal parts have no area and vanish.
///
/// # Errors
///
/// Returns `OperationError::InvalidInput` for non-finite coordinates and a
/// `TopologyError` if the overlay fails at every precision.
pub fn union(a: &Geometry, b: &Geometry) -> Result<Geometry> {
    let both = Geometry::GeometryCollection(vec![a.clone(), b.clone()]);
    BufferOp::new(&both).execute(0.0)
}

/// Union of many polygons, or `None` if there are none.
///
/// # Errors
///
/// Propagates the failure of a pairwise union.
pub fn cascaded_union(polys: &[Polygon]) -> Result<Option<Geometry>> {
    CascadedPolygonUnion::new(polys).execute()
}
