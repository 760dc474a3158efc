use crate::algorithm::ring;
use crate::error::TopologyError;
use crate::geometry::{LinearRing, Polygon};
use crate::math::{Coord, Envelope};

use super::directed_edge::DirEdgeId;
use super::label::{Label, Location, Position};
use super::PlanarGraph;

/// Index of an edge ring in the ring list owned by a polygon builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RingId(pub usize);

/// Which `next` link a ring follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingKind {
    /// Follows `next`: may pass through a node more than once.
    Maximal,
    /// Follows `next_min`: a simple ring.
    Minimal,
}

/// A ring of result directed edges.
#[derive(Debug, Clone)]
pub struct EdgeRing {
    id: RingId,
    kind: RingKind,
    edges: Vec<DirEdgeId>,
    pts: Vec<Coord>,
    label: Label,
    is_hole: bool,
    env: Envelope,
    shell: Option<RingId>,
    holes: Vec<RingId>,
}

impl EdgeRing {
    /// Traces the ring starting at `start`, claiming each directed edge for
    /// ring `id`.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::RingNotClosed` if a link is missing,
    /// `TopologyError::DirEdgeVisitedTwice` if an edge already belongs to
    /// this ring, and `TopologyError::InvalidTopology` if the ring has fewer
    /// than four points.
    pub fn build(id: RingId, kind: RingKind, start: DirEdgeId, graph: &mut PlanarGraph) -> Result<Self, TopologyError> {
        let mut edges = Vec::new();
        let mut pts: Vec<Coord> = Vec::new();
        let mut label = Label::on(Location::None);
        let mut de_id = start;
        let mut is_first_edge = true;

        loop {
            let de = graph.dir_edge(de_id)?;
            let owner = match kind {
                RingKind::Maximal => de.edge_ring(),
                RingKind::Minimal => de.min_edge_ring(),
            };
            if owner == Some(id) {
                return Err(TopologyError::DirEdgeVisitedTwice(de.coordinate()));
            }
            edges.push(de_id);
            merge_label(&mut label, de.label());

            let edge_pts = graph.edge(de.edge())?.coords();
            let n = edge_pts.len();
            if de.is_forward() {
                let start_index = usize::from(!is_first_edge);
                pts.extend_from_slice(&edge_pts[start_index..]);
            } else {
                let start_index = if is_first_edge { n } else { n - 1 };
                pts.extend(edge_pts[..start_index].iter().rev());
            }
            is_first_edge = false;

            let next = match kind {
                RingKind::Maximal => de.next(),
                RingKind::Minimal => de.next_min(),
            };
            let p = de.coordinate();
            let de_mut = graph.dir_edge_mut(de_id)?;
            match kind {
                RingKind::Maximal => de_mut.set_edge_ring(id),
                RingKind::Minimal => de_mut.set_min_edge_ring(id),
            }

            de_id = next.ok_or(TopologyError::RingNotClosed(p))?;
            if de_id == start {
                break;
            }
        }

        if pts.len() < LinearRing::MINIMUM_VALID_SIZE || pts.first() != pts.last() {
            return Err(TopologyError::InvalidTopology(format!(
                "invalid edge ring with {} points",
                pts.len()
            )));
        }
        let is_hole = ring::is_ccw(&pts);
        let env = Envelope::of_points(&pts);
        Ok(Self {
            id,
            kind,
            edges,
            pts,
            label,
            is_hole,
            env,
            shell: None,
            holes: Vec::new(),
        })
    }

    #[must_use]
    pub fn id(&self) -> RingId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> RingKind {
        self.kind
    }

    #[must_use]
    pub fn coords(&self) -> &[Coord] {
        &self.pts
    }

    /// Directed edges of the ring, in traversal order.
    #[must_use]
    pub fn edges(&self) -> &[DirEdgeId] {
        &self.edges
    }

    /// Label merged from the right sides of the ring's edges.
    #[must_use]
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Counter-clockwise rings are holes.
    #[must_use]
    pub fn is_hole(&self) -> bool {
        self.is_hole
    }

    #[must_use]
    pub fn envelope(&self) -> &Envelope {
        &self.env
    }

    #[must_use]
    pub fn shell(&self) -> Option<RingId> {
        self.shell
    }

    pub fn set_shell(&mut self, shell: RingId) {
        self.shell = Some(shell);
    }

    pub fn add_hole(&mut self, hole: RingId) {
        self.holes.push(hole);
    }

    #[must_use]
    pub fn holes(&self) -> &[RingId] {
        &self.holes
    }

    /// Twice the largest number of this ring's outgoing edges at any node
    /// it passes through.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dangling id.
    pub fn max_node_degree(&self, graph: &PlanarGraph) -> Result<usize, TopologyError> {
        let mut max = 0;
        for &de_id in &self.edges {
            let node = graph.node(graph.dir_edge(de_id)?.node())?;
            max = max.max(node.star().outgoing_degree(graph.dir_edges(), self.id));
        }
        Ok(max * 2)
    }

    /// Links the `next_min` pointers at every node of this maximal ring.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::NoOutgoingDirEdge` if a node cannot be linked.
    pub fn link_minimal_directed_edges(&self, graph: &mut PlanarGraph) -> Result<(), TopologyError> {
        for &de_id in &self.edges {
            let node_id = graph.dir_edge(de_id)?.node();
            let (nodes, dir_edges) = graph.stars_and_dir_edges_mut();
            let node = nodes
                .get(node_id)
                .ok_or_else(|| TopologyError::EntityNotFound("node".into()))?;
            node.star().link_minimal_directed_edges(dir_edges, self.id)?;
        }
        Ok(())
    }

    /// Splits this maximal ring into minimal rings, numbered from
    /// `first_id` upwards.
    ///
    /// # Errors
    ///
    /// Propagates ring-tracing errors.
    pub fn build_minimal_rings(&self, graph: &mut PlanarGraph, first_id: usize) -> Result<Vec<EdgeRing>, TopologyError> {
        let mut rings = Vec::new();
        for &de_id in &self.edges {
            if graph.dir_edge(de_id)?.min_edge_ring().is_none() {
                let id = RingId(first_id + rings.len());
                rings.push(EdgeRing::build(id, RingKind::Minimal, de_id, graph)?);
            }
        }
        Ok(rings)
    }

    /// Builds the polygon of this shell from the given hole rings.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::InvalidTopology` if a ring is malformed.
    pub fn to_polygon(&self, holes: &[&EdgeRing]) -> Result<Polygon, TopologyError> {
        let shell = ring_of(&self.pts)?;
        let holes = holes
            .iter()
            .map(|h| ring_of(&h.pts))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Polygon::new(shell, holes))
    }
}

fn ring_of(pts: &[Coord]) -> Result<LinearRing, TopologyError> {
    LinearRing::new(pts.to_vec()).map_err(|e| TopologyError::InvalidTopology(e.to_string()))
}

/// Records the right-side location of each geometry if not yet known.
fn merge_label(label: &mut Label, de_label: &Label) {
    for geom_index in 0..2 {
        let loc = de_label.location(geom_index, Position::Right);
        if loc == Location::None {
            continue;
        }
        if label.location(geom_index, Position::On) == Location::None {
            label.set_location(geom_index, Position::On, loc);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::topology::{edge, Edge, EdgeEndStar};

    /// Counter-clockwise triangle as a single closed edge, with the forward
    /// directed edge linked to itself.
    fn triangle_graph() -> (PlanarGraph, DirEdgeId) {
        let mut graph = PlanarGraph::new();
        let label = Label::area(0, Location::Boundary, Location::Interior, Location::Exterior);
        let mut e = Edge::new(
            vec![
                Coord::new(0.0, 0.0),
                Coord::new(4.0, 0.0),
                Coord::new(0.0, 4.0),
                Coord::new(0.0, 0.0),
            ],
            label,
        );
        e.set_depth_delta(edge::depth_delta(&label));
        graph.add_edges(vec![e]).unwrap();
        let node = graph.find_node(&Coord::new(0.0, 0.0)).unwrap();
        let fwd = graph
            .node(node)
            .unwrap()
            .star()
            .edge_ends()
            .iter()
            .copied()
            .find(|id| graph.dir_edge(*id).unwrap().is_forward())
            .unwrap();
        graph.dir_edge_mut(fwd).unwrap().set_in_result(true);
        graph.dir_edge_mut(fwd).unwrap().set_next(fwd);
        (graph, fwd)
    }

    #[test]
    fn traces_closed_ring() {
        let (mut graph, fwd) = triangle_graph();
        let ring = EdgeRing::build(RingId(0), RingKind::Maximal, fwd, &mut graph).unwrap();
        assert_eq!(ring.coords().len(), 4);
        assert_eq!(ring.edges(), &[fwd]);
        assert!(ring.is_hole());
        assert_eq!(ring.label().location(0, Position::On), Location::Exterior);
        assert_eq!(graph.dir_edge(fwd).unwrap().edge_ring(), Some(RingId(0)));
        assert_eq!(ring.max_node_degree(&graph).unwrap(), 2);
    }

    #[test]
    fn missing_link_is_an_error() {
        let mut graph = PlanarGraph::new();
        let label = Label::area(0, Location::Boundary, Location::Interior, Location::Exterior);
        graph
            .add_edges(vec![Edge::new(vec![Coord::new(0.0, 0.0), Coord::new(1.0, 0.0)], label)])
            .unwrap();
        let start = graph.dir_edge_ids().next().unwrap();
        let err = EdgeRing::build(RingId(0), RingKind::Maximal, start, &mut graph);
        assert!(matches!(err, Err(TopologyError::RingNotClosed(_))));
    }

    #[test]
    fn revisiting_an_edge_is_an_error() {
        let (mut graph, fwd) = triangle_graph();
        graph.dir_edge_mut(fwd).unwrap().set_edge_ring(RingId(3));
        let err = EdgeRing::build(RingId(3), RingKind::Maximal, fwd, &mut graph);
        assert!(matches!(err, Err(TopologyError::DirEdgeVisitedTwice(_))));
    }
}
