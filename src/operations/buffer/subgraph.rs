use std::collections::{HashSet, VecDeque};

use crate::error::TopologyError;
use crate::math::{Coord, Envelope, Orientation};
use crate::topology::{DirEdgeId, EdgeEndStar, NodeId, PlanarGraph, Position};

/// A connected component of the buffer graph.
///
/// Depths are assigned per subgraph, starting from the outer side of its
/// rightmost edge, whose depth is known from the subgraphs already
/// processed to its right.
#[derive(Debug, Clone)]
pub struct BufferSubgraph {
    nodes: Vec<NodeId>,
    dir_edges: Vec<DirEdgeId>,
    rightmost_edge: DirEdgeId,
    rightmost_coord: Coord,
    env: Envelope,
}

impl BufferSubgraph {
    /// Collects the component reachable from `start`, marking its nodes in
    /// `visited`.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::InvalidTopology` if no rightmost edge can be
    /// determined.
    pub fn create(graph: &PlanarGraph, start: NodeId, visited: &mut HashSet<NodeId>) -> Result<Self, TopologyError> {
        let mut nodes = Vec::new();
        let mut dir_edges = Vec::new();
        let mut stack = vec![start];
        while let Some(node_id) = stack.pop() {
            if !visited.insert(node_id) {
                continue;
            }
            nodes.push(node_id);
            for &de_id in graph.node(node_id)?.star().edge_ends() {
                dir_edges.push(de_id);
                let sym_node = graph.dir_edge(graph.dir_edge(de_id)?.sym())?.node();
                if !visited.contains(&sym_node) {
                    stack.push(sym_node);
                }
            }
        }

        let (rightmost_edge, rightmost_coord) = RightmostEdgeFinder::default().find_edge(graph, &dir_edges)?;
        let mut env = Envelope::null();
        for &de_id in &dir_edges {
            let edge = graph.edge(graph.dir_edge(de_id)?.edge())?;
            env.expand_to_include_env(edge.envelope());
        }
        Ok(Self {
            nodes,
            dir_edges,
            rightmost_edge,
            rightmost_coord,
            env,
        })
    }

    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    #[must_use]
    pub fn dir_edges(&self) -> &[DirEdgeId] {
        &self.dir_edges
    }

    /// A coordinate with the largest x of any edge in the subgraph.
    #[must_use]
    pub fn rightmost_coordinate(&self) -> Coord {
        self.rightmost_coord
    }

    #[must_use]
    pub fn envelope(&self) -> &Envelope {
        &self.env
    }

    /// Assigns depths to every directed edge, starting with `outside_depth`
    /// on the outer side of the rightmost edge and spreading breadth first
    /// through the nodes.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::UnableToComputeDepth` if a node is reached
    /// with no edge of known depth, and depth mismatch errors if the
    /// propagated depths disagree.
    pub fn compute_depth(&self, graph: &mut PlanarGraph, outside_depth: i32) -> Result<(), TopologyError> {
        for &de_id in &self.dir_edges {
            graph.dir_edge_mut(de_id)?.set_visited(false);
        }
        let start = self.rightmost_edge;
        graph.dir_edge_mut(start)?.set_edge_depths(Position::Right, outside_depth)?;
        copy_sym_depths(graph, start)?;
        compute_depths(graph, start)
    }

    /// Marks the edges that bound the buffer area: interior on the right,
    /// exterior on the left.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dangling id.
    pub fn find_result_edges(&self, graph: &mut PlanarGraph) -> Result<(), TopologyError> {
        for &de_id in &self.dir_edges {
            let de = graph.dir_edge_mut(de_id)?;
            if de.depth(Position::Right) >= 1 && de.depth(Position::Left) <= 0 && !de.is_interior_area_edge() {
                de.set_in_result(true);
            }
        }
        Ok(())
    }
}

fn copy_sym_depths(graph: &mut PlanarGraph, de_id: DirEdgeId) -> Result<(), TopologyError> {
    let de = graph.dir_edge(de_id)?;
    let (left, right, sym_id) = (de.depth(Position::Left), de.depth(Position::Right), de.sym());
    let sym = graph.dir_edge_mut(sym_id)?;
    sym.set_depth(Position::Left, right)?;
    sym.set_depth(Position::Right, left)
}

fn compute_depths(graph: &mut PlanarGraph, start: DirEdgeId) -> Result<(), TopologyError> {
    let start_node = graph.dir_edge(start)?.node();
    graph.dir_edge_mut(start)?.set_visited(true);
    let mut nodes_visited = HashSet::from([start_node]);
    let mut queue = VecDeque::from([start_node]);

    while let Some(node_id) = queue.pop_front() {
        compute_node_depth(graph, node_id)?;
        for &de_id in graph.node(node_id)?.star().edge_ends() {
            let sym = graph.dir_edge(graph.dir_edge(de_id)?.sym())?;
            if sym.is_visited() {
                continue;
            }
            if nodes_visited.insert(sym.node()) {
                queue.push_back(sym.node());
            }
        }
    }
    Ok(())
}

fn compute_node_depth(graph: &mut PlanarGraph, node_id: NodeId) -> Result<(), TopologyError> {
    let node = graph.node(node_id)?;
    let ends = node.star().edge_ends().to_vec();

    let mut start = None;
    for &de_id in &ends {
        let de = graph.dir_edge(de_id)?;
        if de.is_visited() || graph.dir_edge(de.sym())?.is_visited() {
            start = Some(de_id);
            break;
        }
    }
    let start = start.ok_or_else(|| TopologyError::UnableToComputeDepth(node.coordinate()))?;

    let (nodes, dir_edges) = graph.stars_and_dir_edges_mut();
    let node = nodes
        .get(node_id)
        .ok_or_else(|| TopologyError::EntityNotFound("node".into()))?;
    node.star().compute_depths(dir_edges, start)?;

    for de_id in ends {
        graph.dir_edge_mut(de_id)?.set_visited(true);
        copy_sym_depths(graph, de_id)?;
    }
    Ok(())
}

// --- Rightmost edge ---

/// Finds the directed edge whose right side faces the outside of a
/// subgraph, at the subgraph's rightmost coordinate.
#[derive(Debug, Default)]
struct RightmostEdgeFinder {
    min_index: usize,
    min_coord: Option<Coord>,
    min_de: Option<DirEdgeId>,
}

impl RightmostEdgeFinder {
    /// Returns the oriented rightmost edge and the rightmost coordinate.
    fn find_edge(mut self, graph: &PlanarGraph, dir_edges: &[DirEdgeId]) -> Result<(DirEdgeId, Coord), TopologyError> {
        // Step 1: rightmost coordinate over the forward edges.
        for &de_id in dir_edges {
            if graph.dir_edge(de_id)?.is_forward() {
                self.check_for_rightmost_coordinate(graph, de_id)?;
            }
        }
        let (Some(mut min_de), Some(min_coord)) = (self.min_de, self.min_coord) else {
            return Err(TopologyError::InvalidTopology("subgraph has no forward edges".to_owned()));
        };

        // Step 2: the edge to use at that coordinate.
        if self.min_index == 0 {
            let de = graph.dir_edge(min_de)?;
            if de.coordinate() != min_coord {
                return Err(TopologyError::InvalidTopology(format!(
                    "inconsistency in rightmost processing at {min_coord}"
                )));
            }
            min_de = self.rightmost_edge_at_node(graph, de.node())?;
        } else {
            self.rightmost_edge_at_vertex(graph, min_de, min_coord)?;
        }

        // Step 3: orient so the outside lies on the right.
        let side = self.rightmost_side(graph, min_de)?;
        let oriented = if side == Some(Position::Left) {
            graph.dir_edge(min_de)?.sym()
        } else {
            min_de
        };
        let coord = self
            .min_coord
            .ok_or_else(|| TopologyError::InvalidTopology("rightmost coordinate lost".to_owned()))?;
        Ok((oriented, coord))
    }

    fn check_for_rightmost_coordinate(&mut self, graph: &PlanarGraph, de_id: DirEdgeId) -> Result<(), TopologyError> {
        let pts = graph.edge(graph.dir_edge(de_id)?.edge())?.coords();
        for (i, p) in pts.iter().enumerate().take(pts.len().saturating_sub(1)) {
            if self.min_coord.is_none_or(|m| p.x > m.x) {
                self.min_de = Some(de_id);
                self.min_index = i;
                self.min_coord = Some(*p);
            }
        }
        Ok(())
    }

    fn rightmost_edge_at_node(&mut self, graph: &PlanarGraph, node_id: NodeId) -> Result<DirEdgeId, TopologyError> {
        let node = graph.node(node_id)?;
        let de_id = node
            .star()
            .rightmost_edge(graph.dir_edges())?
            .ok_or_else(|| TopologyError::InvalidTopology(format!("empty star at {}", node.coordinate())))?;
        let de = graph.dir_edge(de_id)?;
        if de.is_forward() {
            return Ok(de_id);
        }
        // Use the forward sym, whose rightmost point is its last vertex.
        self.min_index = graph.edge(de.edge())?.coords().len() - 1;
        Ok(de.sym())
    }

    fn rightmost_edge_at_vertex(
        &mut self,
        graph: &PlanarGraph,
        de_id: DirEdgeId,
        min_coord: Coord,
    ) -> Result<(), TopologyError> {
        let pts = graph.edge(graph.dir_edge(de_id)?.edge())?.coords();
        let i = self.min_index;
        if i == 0 || i + 1 >= pts.len() {
            return Err(TopologyError::InvalidTopology(format!(
                "rightmost point expected to be interior vertex of edge at {min_coord}"
            )));
        }
        let (prev, next) = (pts[i - 1], pts[i + 1]);
        let orientation = Orientation::of(&min_coord, &next, &prev);
        let both_below = prev.y < min_coord.y && next.y < min_coord.y;
        let both_above = prev.y > min_coord.y && next.y > min_coord.y;
        if (both_below && orientation == Orientation::CounterClockwise)
            || (both_above && orientation == Orientation::Clockwise)
        {
            self.min_index = i - 1;
        }
        Ok(())
    }

    /// Side of the edge facing right at the current index, trying the
    /// segment before it if the first is horizontal.
    fn rightmost_side(&mut self, graph: &PlanarGraph, de_id: DirEdgeId) -> Result<Option<Position>, TopologyError> {
        let pts = graph.edge(graph.dir_edge(de_id)?.edge())?.coords();
        let mut side = segment_side(pts, Some(self.min_index));
        if side.is_none() {
            side = segment_side(pts, self.min_index.checked_sub(1));
        }
        if side.is_none() {
            self.min_coord = None;
            self.check_for_rightmost_coordinate(graph, de_id)?;
        }
        Ok(side)
    }
}

/// Right for an upward segment, left for a downward one, `None` for a
/// horizontal or missing segment.
fn segment_side(pts: &[Coord], index: Option<usize>) -> Option<Position> {
    let i = index?;
    if i + 1 >= pts.len() || pts[i].y == pts[i + 1].y {
        return None;
    }
    if pts[i].y < pts[i + 1].y {
        Some(Position::Right)
    } else {
        Some(Position::Left)
    }
}
