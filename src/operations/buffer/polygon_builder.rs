use crate::algorithm::ring;
use crate::error::TopologyError;
use crate::geometry::Polygon;
use crate::topology::{DirEdgeId, EdgeRing, NodeId, PlanarGraph, RingId, RingKind};

/// Assembles result polygons from the in-result directed edges of one or
/// more subgraphs.
///
/// # Algorithm
///
/// 1. Link the result edges at each node into maximal rings.
/// 2. Split every maximal ring that touches a node more than once into
///    minimal rings; each group contains at most one shell.
/// 3. Sort the remaining rings into shells (clockwise) and holes.
/// 4. Assign each free hole to the smallest shell containing it.
#[derive(Debug, Default)]
pub struct PolygonBuilder {
    rings: Vec<EdgeRing>,
    shells: Vec<RingId>,
}

impl PolygonBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the result edges of a subgraph.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::FoundTwoShells` or
    /// `TopologyError::UnassignedHole` when the result edges do not form a
    /// valid polygonal area, and ring-tracing errors.
    pub fn add(&mut self, graph: &mut PlanarGraph, dir_edges: &[DirEdgeId], nodes: &[NodeId]) -> Result<(), TopologyError> {
        graph.link_result_directed_edges(nodes)?;
        let max_rings = self.build_maximal_rings(graph, dir_edges)?;
        let mut free_holes = Vec::new();
        let simple_rings = self.build_minimal_rings(graph, max_rings, &mut free_holes)?;
        for id in simple_rings {
            if self.ring(id)?.is_hole() {
                free_holes.push(id);
            } else {
                self.shells.push(id);
            }
        }
        self.place_free_holes(&free_holes)
    }

    /// Builds one polygon per shell.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::InvalidTopology` if a ring is malformed.
    pub fn polygons(&self) -> Result<Vec<Polygon>, TopologyError> {
        self.shells
            .iter()
            .map(|&id| {
                let shell = self.ring(id)?;
                let holes = shell
                    .holes()
                    .iter()
                    .map(|&h| self.ring(h))
                    .collect::<Result<Vec<_>, _>>()?;
                shell.to_polygon(&holes)
            })
            .collect()
    }

    fn ring(&self, id: RingId) -> Result<&EdgeRing, TopologyError> {
        self.rings
            .get(id.0)
            .ok_or_else(|| TopologyError::EntityNotFound("edge ring".into()))
    }

    fn ring_mut(&mut self, id: RingId) -> Result<&mut EdgeRing, TopologyError> {
        self.rings
            .get_mut(id.0)
            .ok_or_else(|| TopologyError::EntityNotFound("edge ring".into()))
    }

    fn next_id(&self) -> RingId {
        RingId(self.rings.len())
    }

    fn build_maximal_rings(&mut self, graph: &mut PlanarGraph, dir_edges: &[DirEdgeId]) -> Result<Vec<RingId>, TopologyError> {
        let mut max_rings = Vec::new();
        for &de_id in dir_edges {
            let de = graph.dir_edge(de_id)?;
            if de.is_in_result() && de.label().is_area() && de.edge_ring().is_none() {
                let id = self.next_id();
                self.rings.push(EdgeRing::build(id, RingKind::Maximal, de_id, graph)?);
                max_rings.push(id);
            }
        }
        Ok(max_rings)
    }

    /// Splits rings through nodes of degree above two. Returns the rings
    /// that needed no splitting.
    fn build_minimal_rings(
        &mut self,
        graph: &mut PlanarGraph,
        max_rings: Vec<RingId>,
        free_holes: &mut Vec<RingId>,
    ) -> Result<Vec<RingId>, TopologyError> {
        let mut simple = Vec::new();
        for id in max_rings {
            let max_ring = self.ring(id)?;
            if max_ring.max_node_degree(graph)? <= 2 {
                simple.push(id);
                continue;
            }
            max_ring.link_minimal_directed_edges(graph)?;
            let min_rings = max_ring.build_minimal_rings(graph, self.rings.len())?;
            let min_ids: Vec<RingId> = min_rings.iter().map(EdgeRing::id).collect();
            self.rings.extend(min_rings);

            match self.find_shell(&min_ids)? {
                Some(shell) => {
                    for &hole in &min_ids {
                        if hole != shell && self.ring(hole)?.is_hole() {
                            self.assign_hole(hole, shell)?;
                        }
                    }
                    self.shells.push(shell);
                }
                None => free_holes.extend(min_ids),
            }
        }
        Ok(simple)
    }

    fn find_shell(&self, min_ids: &[RingId]) -> Result<Option<RingId>, TopologyError> {
        let mut shell = None;
        for &id in min_ids {
            let ring = self.ring(id)?;
            if ring.is_hole() {
                continue;
            }
            if shell.is_some() {
                return Err(TopologyError::FoundTwoShells(ring.coords()[0]));
            }
            shell = Some(id);
        }
        Ok(shell)
    }

    fn assign_hole(&mut self, hole: RingId, shell: RingId) -> Result<(), TopologyError> {
        self.ring_mut(hole)?.set_shell(shell);
        self.ring_mut(shell)?.add_hole(hole);
        Ok(())
    }

    fn place_free_holes(&mut self, free_holes: &[RingId]) -> Result<(), TopologyError> {
        for &hole in free_holes {
            if self.ring(hole)?.shell().is_some() {
                continue;
            }
            let shell = self
                .find_containing_shell(hole)?
                .ok_or_else(|| TopologyError::UnassignedHole(self.rings[hole.0].coords()[0]))?;
            self.assign_hole(hole, shell)?;
        }
        Ok(())
    }

    /// The smallest shell whose envelope contains the hole's envelope and
    /// whose ring contains the hole's first point.
    fn find_containing_shell(&self, hole: RingId) -> Result<Option<RingId>, TopologyError> {
        let test = self.ring(hole)?;
        let test_env = test.envelope();
        let test_pt = test.coords()[0];
        let mut min_shell: Option<&EdgeRing> = None;
        for &id in &self.shells {
            let try_shell = self.ring(id)?;
            let try_env = try_shell.envelope();
            if !try_env.contains(test_env) || !ring::is_point_in_ring(&test_pt, try_shell.coords()) {
                continue;
            }
            if min_shell.is_none_or(|m| m.envelope().contains(try_env)) {
                min_shell = Some(try_shell);
            }
        }
        Ok(min_shell.map(EdgeRing::id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Coord;
    use crate::topology::{edge, Edge, Label, Location, Position};

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    /// Closed edges labelled interior on the right; depths set so that the
    /// right side of each forward edge is in the result.
    fn result_graph(rings: Vec<Vec<Coord>>) -> (PlanarGraph, Vec<DirEdgeId>, Vec<NodeId>) {
        let label = Label::area(0, Location::Boundary, Location::Exterior, Location::Interior);
        let edges = rings
            .into_iter()
            .map(|pts| {
                let mut e = Edge::new(pts, label);
                e.set_depth_delta(edge::depth_delta(&label));
                e
            })
            .collect();
        let mut graph = PlanarGraph::new();
        graph.add_edges(edges).unwrap();
        let ids: Vec<DirEdgeId> = graph.dir_edge_ids().collect();
        for &id in &ids {
            let de = graph.dir_edge_mut(id).unwrap();
            if de.is_forward() {
                de.set_edge_depths(Position::Left, 0).unwrap();
                de.set_in_result(true);
            }
        }
        let nodes = graph.node_ids().collect();
        (graph, ids, nodes)
    }

    #[test]
    fn clockwise_ring_becomes_shell() {
        let (mut graph, des, nodes) = result_graph(vec![vec![
            c(0.0, 0.0),
            c(0.0, 4.0),
            c(4.0, 4.0),
            c(4.0, 0.0),
            c(0.0, 0.0),
        ]]);
        let mut builder = PolygonBuilder::new();
        builder.add(&mut graph, &des, &nodes).unwrap();
        let polys = builder.polygons().unwrap();
        assert_eq!(polys.len(), 1);
        assert!((polys[0].area() - 16.0).abs() < 1e-12);
    }

    #[test]
    fn hole_is_placed_in_containing_shell() {
        let (mut graph, des, nodes) = result_graph(vec![
            vec![c(0.0, 0.0), c(0.0, 10.0), c(10.0, 10.0), c(10.0, 0.0), c(0.0, 0.0)],
            // Counter-clockwise: interior on the right is outside the hole.
            vec![c(4.0, 4.0), c(6.0, 4.0), c(6.0, 6.0), c(4.0, 6.0), c(4.0, 4.0)],
        ]);
        let mut builder = PolygonBuilder::new();
        builder.add(&mut graph, &des, &nodes).unwrap();
        let polys = builder.polygons().unwrap();
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0].interiors().len(), 1);
        assert!((polys[0].area() - 96.0).abs() < 1e-12);
    }

    #[test]
    fn orphan_hole_is_an_error() {
        let (mut graph, des, nodes) = result_graph(vec![vec![
            c(4.0, 4.0),
            c(6.0, 4.0),
            c(6.0, 6.0),
            c(4.0, 6.0),
            c(4.0, 4.0),
        ]]);
        let err = PolygonBuilder::new().add(&mut graph, &des, &nodes);
        assert!(matches!(err, Err(TopologyError::UnassignedHole(_))));
    }
}
