use tracing::debug;

use crate::error::Result;
use crate::geometry::{Geometry, Polygon};
use crate::index::{ItemTree, StrTree};
use crate::math::Envelope;

use super::union;

/// Node capacity of the STR-tree that groups the input polygons.
pub const STRTREE_NODE_CAPACITY: usize = 4;

/// Unions many polygons by merging spatially close groups first.
///
/// # Algorithm
///
/// 1. Index the polygons in an STR-tree, which clusters them by location.
/// 2. Union the tree bottom up; the children of each node are unioned as a
///    balanced binary tree over their list.
/// 3. Each pairwise union skips the overlay when the envelopes are
///    disjoint, and otherwise only overlays the elements that reach into
///    the common envelope.
///
/// The merge order depends only on the input, so results are reproducible.
#[derive(Debug)]
pub struct CascadedPolygonUnion<'a> {
    polys: &'a [Polygon],
}

impl<'a> CascadedPolygonUnion<'a> {
    #[must_use]
    pub fn new(polys: &'a [Polygon]) -> Self {
        Self { polys }
    }

    /// Computes the union, or `None` for an empty input.
    ///
    /// # Errors
    ///
    /// Propagates the failure of a pairwise union.
    pub fn execute(&self) -> Result<Option<Geometry>> {
        if self.polys.is_empty() {
            return Ok(None);
        }
        debug!(polygons = self.polys.len(), "cascaded union");
        let items = self.polys.iter().enumerate().map(|(i, p)| (p.envelope(), i)).collect();
        let tree = StrTree::load(STRTREE_NODE_CAPACITY, items);
        self.union_tree(&tree.items_tree())
    }

    fn union_tree(&self, tree: &[ItemTree<'_, usize>]) -> Result<Option<Geometry>> {
        let mut geoms = Vec::with_capacity(tree.len());
        for node in tree {
            let geom = match node {
                ItemTree::Item(i) => self.polys.get(**i).cloned().map(Geometry::Polygon),
                ItemTree::Node(children) => self.union_tree(children)?,
            };
            geoms.extend(geom);
        }
        binary_union(&geoms, 0, geoms.len())
    }
}

/// Unions `geoms[start..end]` by recursive halving.
fn binary_union(geoms: &[Geometry], start: usize, end: usize) -> Result<Option<Geometry>> {
    match end.saturating_sub(start) {
        0 | 1 => union_safe(geoms.get(start).cloned(), None),
        2 => union_safe(geoms.get(start).cloned(), geoms.get(start + 1).cloned()),
        _ => {
            let mid = (start + end) / 2;
            let g0 = binary_union(geoms, start, mid)?;
            let g1 = binary_union(geoms, mid, end)?;
            union_safe(g0, g1)
        }
    }
}

fn union_safe(g0: Option<Geometry>, g1: Option<Geometry>) -> Result<Option<Geometry>> {
    match (g0, g1) {
        (None, None) => Ok(None),
        (Some(g), None) | (None, Some(g)) => Ok(Some(g)),
        (Some(g0), Some(g1)) => union_optimized(g0, g1).map(Some),
    }
}

fn union_optimized(g0: Geometry, g1: Geometry) -> Result<Geometry> {
    let env0 = g0.envelope();
    let env1 = g1.envelope();
    if !env0.intersects(&env1) {
        return Ok(Geometry::combine([g0, g1]));
    }
    if g0.num_geometries() <= 1 && g1.num_geometries() <= 1 {
        return union(&g0, &g1);
    }
    let common = env0.intersection(&env1);
    union_using_envelope_intersection(&g0, &g1, &common)
}

/// Overlays only the elements touching `common`; the rest are carried over
/// unchanged.
fn union_using_envelope_intersection(g0: &Geometry, g1: &Geometry, common: &Envelope) -> Result<Geometry> {
    let mut disjoint = Vec::new();
    let g0_int = extract_by_envelope(common, g0, &mut disjoint);
    let g1_int = extract_by_envelope(common, g1, &mut disjoint);
    disjoint.push(union(&g0_int, &g1_int)?);
    Ok(Geometry::combine(disjoint))
}

fn extract_by_envelope(env: &Envelope, geom: &Geometry, disjoint: &mut Vec<Geometry>) -> Geometry {
    let (intersecting, apart): (Vec<Geometry>, Vec<Geometry>) =
        geom.elements().into_iter().partition(|elem| elem.envelope().intersects(env));
    disjoint.extend(apart);
    Geometry::combine(intersecting)
}
