use std::collections::HashMap;

use crate::math::{compare_coords, Coord, CoordKey, Envelope};

use super::label::{Label, Location, Position};

slotmap::new_key_type! {
    /// Unique identifier for an edge in a planar graph.
    pub struct EdgeId;
}

/// A noded polyline in the planar graph, carrying a label and the depth
/// change from its right side to its left side.
#[derive(Debug, Clone)]
pub struct Edge {
    pts: Vec<Coord>,
    label: Label,
    depth_delta: i32,
    env: Envelope,
}

impl Edge {
    /// Creates an edge. The coordinates must hold at least two points.
    #[must_use]
    pub fn new(pts: Vec<Coord>, label: Label) -> Self {
        let env = Envelope::of_points(&pts);
        Self {
            pts,
            label,
            depth_delta: 0,
            env,
        }
    }

    #[must_use]
    pub fn coords(&self) -> &[Coord] {
        &self.pts
    }

    #[must_use]
    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn label_mut(&mut self) -> &mut Label {
        &mut self.label
    }

    #[must_use]
    pub fn depth_delta(&self) -> i32 {
        self.depth_delta
    }

    pub fn set_depth_delta(&mut self, delta: i32) {
        self.depth_delta = delta;
    }

    #[must_use]
    pub fn envelope(&self) -> &Envelope {
        &self.env
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.pts.first() == self.pts.last()
    }

    /// Returns `true` if both edges have the same coordinates in the same
    /// order.
    #[must_use]
    pub fn is_pointwise_equal(&self, other: &Edge) -> bool {
        self.pts == other.pts
    }

    /// Key identifying the edge's point set independent of direction.
    #[must_use]
    pub fn oriented_key(&self) -> OrientedKey {
        OrientedKey::new(&self.pts)
    }
}

/// Depth change across an area edge labelled for geometry 0.
///
/// `+1` when the left side is interior and the right exterior, `-1` for the
/// reverse, `0` otherwise.
#[must_use]
pub fn depth_delta(label: &Label) -> i32 {
    let l_loc = label.location(0, Position::Left);
    let r_loc = label.location(0, Position::Right);
    match (l_loc, r_loc) {
        (Location::Interior, Location::Exterior) => 1,
        (Location::Exterior, Location::Interior) => -1,
        _ => 0,
    }
}

/// Direction-independent key of a coordinate sequence: the sequence read in
/// whichever direction is lexicographically smaller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrientedKey(Vec<CoordKey>);

impl OrientedKey {
    #[must_use]
    pub fn new(pts: &[Coord]) -> Self {
        let n = pts.len();
        let forward = (0..n / 2)
            .map(|i| compare_coords(&pts[i], &pts[n - 1 - i]))
            .find(|o| o.is_ne())
            .map_or(true, std::cmp::Ordering::is_lt);
        if forward {
            Self(pts.iter().map(CoordKey::new).collect())
        } else {
            Self(pts.iter().rev().map(CoordKey::new).collect())
        }
    }
}

/// Ordered edge collection that merges edges with identical point sets.
#[derive(Debug, Default)]
pub struct EdgeList {
    edges: Vec<Edge>,
    index: HashMap<OrientedKey, usize>,
}

impl EdgeList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an edge, or merges it into an existing equal edge.
    ///
    /// On merge the label of the new edge (flipped if it runs the other way)
    /// fills the unknown locations of the existing one, and the depth deltas
    /// add up.
    pub fn insert_unique(&mut self, mut edge: Edge) {
        let key = edge.oriented_key();
        if let Some(&i) = self.index.get(&key) {
            let existing = &mut self.edges[i];
            let mut label_to_merge = *edge.label();
            if !existing.is_pointwise_equal(&edge) {
                label_to_merge.flip();
            }
            existing.label_mut().merge(&label_to_merge);
            let merged = existing.depth_delta() + depth_delta(&label_to_merge);
            existing.set_depth_delta(merged);
        } else {
            edge.set_depth_delta(depth_delta(edge.label()));
            self.index.insert(key, self.edges.len());
            self.edges.push(edge);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(left: Location, right: Location) -> Label {
        Label::area(0, Location::Boundary, left, right)
    }

    fn pts() -> Vec<Coord> {
        vec![Coord::new(0.0, 0.0), Coord::new(1.0, 0.0), Coord::new(2.0, 1.0)]
    }

    #[test]
    fn oriented_key_ignores_direction() {
        let fwd = pts();
        let rev: Vec<Coord> = fwd.iter().rev().copied().collect();
        assert_eq!(OrientedKey::new(&fwd), OrientedKey::new(&rev));
        let other = vec![Coord::new(0.0, 0.0), Coord::new(2.0, 1.0)];
        assert_ne!(OrientedKey::new(&fwd), OrientedKey::new(&other));
    }

    #[test]
    fn depth_delta_by_label() {
        assert_eq!(depth_delta(&label(Location::Interior, Location::Exterior)), 1);
        assert_eq!(depth_delta(&label(Location::Exterior, Location::Interior)), -1);
        assert_eq!(depth_delta(&label(Location::Interior, Location::Interior)), 0);
    }

    #[test]
    fn reversed_duplicate_merges_with_flipped_label() {
        let mut list = EdgeList::new();
        list.insert_unique(Edge::new(pts(), label(Location::Exterior, Location::Interior)));
        let rev: Vec<Coord> = pts().iter().rev().copied().collect();
        // Same side assignment seen from the other direction: delta doubles.
        list.insert_unique(Edge::new(rev, label(Location::Interior, Location::Exterior)));
        assert_eq!(list.len(), 1);
        assert_eq!(list.edges()[0].depth_delta(), -2);
    }

    #[test]
    fn opposite_duplicate_cancels() {
        let mut list = EdgeList::new();
        list.insert_unique(Edge::new(pts(), label(Location::Exterior, Location::Interior)));
        list.insert_unique(Edge::new(pts(), label(Location::Interior, Location::Exterior)));
        assert_eq!(list.len(), 1);
        assert_eq!(list.edges()[0].depth_delta(), 0);
    }
}
