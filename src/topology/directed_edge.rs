use crate::error::TopologyError;
use crate::math::Coord;

use super::edge::{Edge, EdgeId};
use super::edge_end_star::EdgeEndKey;
use super::edge_ring::RingId;
use super::label::{Label, Location, Position};
use super::node::NodeId;
use super::quadrant::Quadrant;

slotmap::new_key_type! {
    /// Unique identifier for a directed edge in a planar graph.
    pub struct DirEdgeId;
}

/// Depth value of a side that has not been assigned yet.
pub const UNSET_DEPTH: i32 = -999;

/// One direction of an [`Edge`], anchored at its origin node.
///
/// Every edge yields two directed edges that are each other's `sym`.
#[derive(Debug, Clone)]
pub struct DirectedEdge {
    edge: EdgeId,
    forward: bool,
    node: NodeId,
    sym: DirEdgeId,
    key: EdgeEndKey,
    label: Label,
    /// Signed depth change of the parent edge, seen from this direction.
    edge_depth_delta: i32,
    depth: [i32; 3],
    visited: bool,
    in_result: bool,
    next: Option<DirEdgeId>,
    next_min: Option<DirEdgeId>,
    edge_ring: Option<RingId>,
    min_edge_ring: Option<RingId>,
}

impl DirectedEdge {
    /// Creates the forward or backward directed edge of `edge`.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::InvalidTopology` if the edge's end segment has
    /// zero length.
    pub fn new(edge_id: EdgeId, edge: &Edge, forward: bool, node: NodeId) -> Result<Self, TopologyError> {
        let pts = edge.coords();
        let n = pts.len();
        if n < 2 {
            return Err(TopologyError::InvalidTopology(
                "edge has fewer than two points".to_owned(),
            ));
        }
        let (p0, p1) = if forward {
            (pts[0], pts[1])
        } else {
            (pts[n - 1], pts[n - 2])
        };
        let key = EdgeEndKey::new(p0, p1)
            .ok_or_else(|| TopologyError::InvalidTopology(format!("zero-length edge end at {p0}")))?;
        let mut label = *edge.label();
        let mut edge_depth_delta = edge.depth_delta();
        if !forward {
            label.flip();
            edge_depth_delta = -edge_depth_delta;
        }
        Ok(Self {
            edge: edge_id,
            forward,
            node,
            sym: DirEdgeId::default(),
            key,
            label,
            edge_depth_delta,
            depth: [0, UNSET_DEPTH, UNSET_DEPTH],
            visited: false,
            in_result: false,
            next: None,
            next_min: None,
            edge_ring: None,
            min_edge_ring: None,
        })
    }

    #[must_use]
    pub fn edge(&self) -> EdgeId {
        self.edge
    }

    #[must_use]
    pub fn is_forward(&self) -> bool {
        self.forward
    }

    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    #[must_use]
    pub fn sym(&self) -> DirEdgeId {
        self.sym
    }

    pub(crate) fn set_sym(&mut self, sym: DirEdgeId) {
        self.sym = sym;
    }

    #[must_use]
    pub fn key(&self) -> &EdgeEndKey {
        &self.key
    }

    /// Origin coordinate.
    #[must_use]
    pub fn coordinate(&self) -> Coord {
        self.key.p0
    }

    /// Second coordinate, fixing the direction.
    #[must_use]
    pub fn directed_coordinate(&self) -> Coord {
        self.key.p1
    }

    #[must_use]
    pub fn quadrant(&self) -> Quadrant {
        self.key.quadrant
    }

    #[must_use]
    pub fn dy(&self) -> f64 {
        self.key.dy
    }

    #[must_use]
    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn label_mut(&mut self) -> &mut Label {
        &mut self.label
    }

    pub(crate) fn set_label(&mut self, label: Label) {
        self.label = label;
    }

    #[must_use]
    pub fn depth(&self, pos: Position) -> i32 {
        self.depth[pos as usize]
    }

    /// Assigns the depth of one side.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::AssignedDepthsDoNotMatch` if the side already
    /// has a different depth.
    pub fn set_depth(&mut self, pos: Position, depth: i32) -> Result<(), TopologyError> {
        let slot = &mut self.depth[pos as usize];
        if *slot != UNSET_DEPTH && *slot != depth {
            return Err(TopologyError::AssignedDepthsDoNotMatch(self.key.p0));
        }
        *slot = depth;
        Ok(())
    }

    /// Sets the depth of side `pos` and derives the opposite side from the
    /// edge's depth delta.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::AssignedDepthsDoNotMatch` on conflict.
    pub fn set_edge_depths(&mut self, pos: Position, depth: i32) -> Result<(), TopologyError> {
        let direction_factor = if pos == Position::Left { -1 } else { 1 };
        let opposite_depth = depth + self.edge_depth_delta * direction_factor;
        self.set_depth(pos, depth)?;
        self.set_depth(pos.opposite(), opposite_depth)
    }

    /// Signed depth change from the right side to the left side.
    #[must_use]
    pub fn depth_delta(&self) -> i32 {
        self.edge_depth_delta
    }

    #[must_use]
    pub fn is_visited(&self) -> bool {
        self.visited
    }

    pub fn set_visited(&mut self, visited: bool) {
        self.visited = visited;
    }

    #[must_use]
    pub fn is_in_result(&self) -> bool {
        self.in_result
    }

    pub fn set_in_result(&mut self, in_result: bool) {
        self.in_result = in_result;
    }

    #[must_use]
    pub fn next(&self) -> Option<DirEdgeId> {
        self.next
    }

    pub fn set_next(&mut self, next: DirEdgeId) {
        self.next = Some(next);
    }

    #[must_use]
    pub fn next_min(&self) -> Option<DirEdgeId> {
        self.next_min
    }

    pub fn set_next_min(&mut self, next: DirEdgeId) {
        self.next_min = Some(next);
    }

    #[must_use]
    pub fn edge_ring(&self) -> Option<RingId> {
        self.edge_ring
    }

    pub fn set_edge_ring(&mut self, ring: RingId) {
        self.edge_ring = Some(ring);
    }

    #[must_use]
    pub fn min_edge_ring(&self) -> Option<RingId> {
        self.min_edge_ring
    }

    pub fn set_min_edge_ring(&mut self, ring: RingId) {
        self.min_edge_ring = Some(ring);
    }

    /// Returns `true` if both sides are interior for every area geometry,
    /// i.e. the edge lies inside the result and bounds nothing.
    #[must_use]
    pub fn is_interior_area_edge(&self) -> bool {
        (0..2).all(|i| {
            self.label.is_area_at(i)
                && self.label.location(i, Position::Left) == Location::Interior
                && self.label.location(i, Position::Right) == Location::Interior
        })
    }
}
