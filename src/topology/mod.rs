pub mod directed_edge;
pub mod directed_edge_star;
pub mod edge;
pub mod edge_end_star;
pub mod edge_ring;
pub mod label;
pub mod node;
pub mod quadrant;

pub use directed_edge::{DirEdgeId, DirectedEdge, UNSET_DEPTH};
pub use directed_edge_star::DirectedEdgeStar;
pub use edge::{Edge, EdgeId, EdgeList};
pub use edge_end_star::{EdgeEndKey, EdgeEndStar, LabelStore};
pub use edge_ring::{EdgeRing, RingId, RingKind};
pub use label::{Label, Location, Position, TopologyLocation};
pub use node::{Node, NodeId};
pub use quadrant::Quadrant;

use std::collections::BTreeMap;

use crate::error::TopologyError;
use crate::math::{Coord, CoordKey};
use slotmap::SlotMap;

/// Central arena that owns the nodes, edges and directed edges of a planar
/// graph.
///
/// Entities reference each other via typed IDs (generational indices), so
/// the cyclic node/edge/sym/next relations need no shared ownership. Nodes
/// are also indexed by exact coordinate, in coordinate order.
#[derive(Debug, Default)]
pub struct PlanarGraph {
    nodes: SlotMap<NodeId, Node>,
    edges: SlotMap<EdgeId, Edge>,
    dir_edges: SlotMap<DirEdgeId, DirectedEdge>,
    node_index: BTreeMap<CoordKey, NodeId>,
}

impl PlanarGraph {
    /// Creates a new, empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Construction ---

    /// Returns the node at `coord`, creating it if needed.
    pub fn add_node(&mut self, coord: Coord) -> NodeId {
        *self
            .node_index
            .entry(CoordKey::new(&coord))
            .or_insert_with(|| self.nodes.insert(Node::new(coord)))
    }

    /// Adds edges, creating a forward and a backward directed edge for each
    /// and inserting them into the stars of their origin nodes.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::InvalidTopology` for an edge with fewer than
    /// two points or a zero-length end segment.
    pub fn add_edges(&mut self, edges: Vec<Edge>) -> Result<(), TopologyError> {
        for edge in edges {
            let (Some(&first), Some(&last)) = (edge.coords().first(), edge.coords().last()) else {
                return Err(TopologyError::InvalidTopology("empty edge".to_owned()));
            };
            let n0 = self.add_node(first);
            let n1 = self.add_node(last);
            let edge_id = self.edges.insert(edge);
            let edge = &self.edges[edge_id];
            let de_fwd = DirectedEdge::new(edge_id, edge, true, n0)?;
            let de_bwd = DirectedEdge::new(edge_id, edge, false, n1)?;
            let key_fwd = *de_fwd.key();
            let key_bwd = *de_bwd.key();
            let id_fwd = self.dir_edges.insert(de_fwd);
            let id_bwd = self.dir_edges.insert(de_bwd);
            self.dir_edges[id_fwd].set_sym(id_bwd);
            self.dir_edges[id_bwd].set_sym(id_fwd);
            self.nodes[n0].star_mut().insert(id_fwd, key_fwd);
            self.nodes[n1].star_mut().insert(id_bwd, key_bwd);
        }
        Ok(())
    }

    // --- Node operations ---

    /// Returns a reference to the node, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the graph.
    pub fn node(&self, id: NodeId) -> Result<&Node, TopologyError> {
        self.nodes
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("node".into()))
    }

    /// Returns the node at exactly `coord`, if any.
    #[must_use]
    pub fn find_node(&self, coord: &Coord) -> Option<NodeId> {
        self.node_index.get(&CoordKey::new(coord)).copied()
    }

    /// Node ids in coordinate order (x, then y).
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_index.values().copied()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // --- Edge operations ---

    /// Returns a reference to the edge, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the graph.
    pub fn edge(&self, id: EdgeId) -> Result<&Edge, TopologyError> {
        self.edges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // --- Directed edge operations ---

    /// Returns a reference to the directed edge, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the graph.
    pub fn dir_edge(&self, id: DirEdgeId) -> Result<&DirectedEdge, TopologyError> {
        self.dir_edges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("directed edge".into()))
    }

    /// Returns a mutable reference to the directed edge, or an error if not
    /// found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the graph.
    pub fn dir_edge_mut(&mut self, id: DirEdgeId) -> Result<&mut DirectedEdge, TopologyError> {
        self.dir_edges
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("directed edge".into()))
    }

    /// All directed edge ids, in insertion order.
    pub fn dir_edge_ids(&self) -> impl Iterator<Item = DirEdgeId> + '_ {
        self.dir_edges.keys()
    }

    /// The directed-edge arena, for star operations that walk several
    /// directed edges at once.
    #[must_use]
    pub fn dir_edges(&self) -> &SlotMap<DirEdgeId, DirectedEdge> {
        &self.dir_edges
    }

    /// Splits the graph into its node arena and a mutable directed-edge
    /// arena, so a node's star can update the edges it refers to.
    pub fn stars_and_dir_edges_mut(&mut self) -> (&SlotMap<NodeId, Node>, &mut SlotMap<DirEdgeId, DirectedEdge>) {
        (&self.nodes, &mut self.dir_edges)
    }

    // --- Graph-wide passes ---

    /// Links result directed edges into maximal rings at the given nodes.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::NoOutgoingDirEdge` if a node cannot be linked.
    pub fn link_result_directed_edges(&mut self, nodes: &[NodeId]) -> Result<(), TopologyError> {
        for &id in nodes {
            let node = self
                .nodes
                .get(id)
                .ok_or_else(|| TopologyError::EntityNotFound("node".into()))?;
            node.star().link_result_directed_edges(&mut self.dir_edges)?;
        }
        Ok(())
    }

    /// Completes the labels of every directed edge, node by node in
    /// coordinate order.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::SideLocationConflict` if labels around a node
    /// are inconsistent.
    pub fn compute_labelling(
        &mut self,
        locate: &mut dyn FnMut(usize, &Coord) -> Location,
    ) -> Result<(), TopologyError> {
        let ids: Vec<NodeId> = self.node_ids().collect();
        for id in ids {
            let node = self
                .nodes
                .get_mut(id)
                .ok_or_else(|| TopologyError::EntityNotFound("node".into()))?;
            let mut store = LabelStore::new(&mut self.dir_edges, &self.edges);
            node.star_mut().compute_labelling(&mut store, locate)?;
        }
        Ok(())
    }

    /// Returns `true` if the area labels of geometry `geom_index` are
    /// consistent around every node.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::InvalidTopology` for unlabelled or non-area
    /// edges.
    pub fn is_area_labels_consistent(&mut self, geom_index: usize) -> Result<bool, TopologyError> {
        for node in self.nodes.values() {
            let mut store = LabelStore::new(&mut self.dir_edges, &self.edges);
            if !node.star().is_area_labels_consistent(&mut store, geom_index)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
