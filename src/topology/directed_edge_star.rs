use std::cell::OnceCell;
use std::collections::BTreeMap;

use slotmap::SlotMap;

use crate::error::TopologyError;
use crate::math::Coord;

use super::directed_edge::{DirEdgeId, DirectedEdge};
use super::edge_end_star::{EdgeEndKey, EdgeEndStar};
use super::edge_ring::RingId;
use super::label::{Location, Position};

/// The directed edges leaving one node, in counter-clockwise order.
#[derive(Debug, Default, Clone)]
pub struct DirectedEdgeStar {
    map: BTreeMap<EdgeEndKey, DirEdgeId>,
    ends: OnceCell<Vec<DirEdgeId>>,
    coord: Option<Coord>,
    area_locations: [Location; 2],
}

fn get(dir_edges: &SlotMap<DirEdgeId, DirectedEdge>, id: DirEdgeId) -> Result<&DirectedEdge, TopologyError> {
    dir_edges
        .get(id)
        .ok_or_else(|| TopologyError::EntityNotFound("directed edge".into()))
}

fn get_mut(
    dir_edges: &mut SlotMap<DirEdgeId, DirectedEdge>,
    id: DirEdgeId,
) -> Result<&mut DirectedEdge, TopologyError> {
    dir_edges
        .get_mut(id)
        .ok_or_else(|| TopologyError::EntityNotFound("directed edge".into()))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LinkState {
    ScanningForIncoming,
    LinkingToOutgoing,
}

impl EdgeEndStar for DirectedEdgeStar {
    fn insert(&mut self, id: DirEdgeId, key: EdgeEndKey) {
        self.coord.get_or_insert(key.p0);
        self.map.insert(key, id);
        self.ends.take();
    }

    fn edge_ends(&self) -> &[DirEdgeId] {
        self.ends.get_or_init(|| self.map.values().copied().collect())
    }

    fn coordinate(&self) -> Option<Coord> {
        self.coord
    }

    fn area_location_cache(&mut self) -> &mut [Location; 2] {
        &mut self.area_locations
    }
}

impl DirectedEdgeStar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The edge end with the rightmost direction, used to start depth
    /// assignment from a rightmost coordinate.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::InvalidTopology` if the choice is ambiguous
    /// (two horizontal ends).
    pub fn rightmost_edge(&self, dir_edges: &SlotMap<DirEdgeId, DirectedEdge>) -> Result<Option<DirEdgeId>, TopologyError> {
        let ends = self.edge_ends();
        let (Some(&first), Some(&last)) = (ends.first(), ends.last()) else {
            return Ok(None);
        };
        if ends.len() == 1 {
            return Ok(Some(first));
        }
        let de0 = get(dir_edges, first)?;
        let de_last = get(dir_edges, last)?;
        let north0 = de0.quadrant().is_northern();
        let north1 = de_last.quadrant().is_northern();
        if north0 && north1 {
            return Ok(Some(first));
        }
        if !north0 && !north1 {
            return Ok(Some(last));
        }
        if de0.dy() != 0.0 {
            return Ok(Some(first));
        }
        if de_last.dy() != 0.0 {
            return Ok(Some(last));
        }
        Err(TopologyError::InvalidTopology(format!(
            "found two horizontal edges incident on node at {}",
            de0.coordinate()
        )))
    }

    /// Propagates depths counter-clockwise around the star starting from
    /// `start`, whose depths must already be set.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::DepthMismatch` if the walk does not return to
    /// the right depth of `start`.
    pub fn compute_depths(
        &self,
        dir_edges: &mut SlotMap<DirEdgeId, DirectedEdge>,
        start: DirEdgeId,
    ) -> Result<(), TopologyError> {
        let ends = self.edge_ends();
        let index = self
            .find_index(start)
            .ok_or_else(|| TopologyError::EntityNotFound("directed edge in star".into()))?;
        let de = get(dir_edges, start)?;
        let start_depth = de.depth(Position::Left);
        let target_last_depth = de.depth(Position::Right);
        let p = de.coordinate();

        let mut curr_depth = start_depth;
        for &id in ends[index + 1..].iter().chain(&ends[..index]) {
            let next = get_mut(dir_edges, id)?;
            next.set_edge_depths(Position::Right, curr_depth)?;
            curr_depth = next.depth(Position::Left);
        }
        if curr_depth != target_last_depth {
            return Err(TopologyError::DepthMismatch(p));
        }
        Ok(())
    }

    /// Ends that are in the result or whose sym is.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dangling id.
    pub fn result_area_edges(&self, dir_edges: &SlotMap<DirEdgeId, DirectedEdge>) -> Result<Vec<DirEdgeId>, TopologyError> {
        let mut result = Vec::new();
        for &id in self.edge_ends() {
            let de = get(dir_edges, id)?;
            if de.is_in_result() || get(dir_edges, de.sym())?.is_in_result() {
                result.push(id);
            }
        }
        Ok(result)
    }

    /// Links each incoming result edge to the next outgoing result edge
    /// counter-clockwise, forming maximal result rings through this node.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::NoOutgoingDirEdge` if an incoming edge is
    /// left without an outgoing partner.
    pub fn link_result_directed_edges(&self, dir_edges: &mut SlotMap<DirEdgeId, DirectedEdge>) -> Result<(), TopologyError> {
        let result_edges = self.result_area_edges(dir_edges)?;
        let mut first_out = None;
        let mut incoming = None;
        let mut state = LinkState::ScanningForIncoming;

        for next_out in result_edges {
            let out_de = get(dir_edges, next_out)?;
            if !out_de.label().is_area() {
                continue;
            }
            let out_in_result = out_de.is_in_result();
            let next_in = out_de.sym();
            if first_out.is_none() && out_in_result {
                first_out = Some(next_out);
            }
            match state {
                LinkState::ScanningForIncoming => {
                    if !get(dir_edges, next_in)?.is_in_result() {
                        continue;
                    }
                    incoming = Some(next_in);
                    state = LinkState::LinkingToOutgoing;
                }
                LinkState::LinkingToOutgoing => {
                    if !out_in_result {
                        continue;
                    }
                    if let Some(inc) = incoming {
                        get_mut(dir_edges, inc)?.set_next(next_out);
                    }
                    state = LinkState::ScanningForIncoming;
                }
            }
        }

        if state == LinkState::LinkingToOutgoing {
            let p = self.coord.unwrap_or_else(Coord::origin);
            let first_out = first_out.ok_or(TopologyError::NoOutgoingDirEdge(p))?;
            if let Some(inc) = incoming {
                get_mut(dir_edges, inc)?.set_next(first_out);
            }
        }
        Ok(())
    }

    /// Links the edges of maximal ring `ring` at this node into minimal
    /// rings, walking the star clockwise.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::NoOutgoingDirEdge` if an incoming edge of the
    /// ring has no outgoing partner.
    pub fn link_minimal_directed_edges(
        &self,
        dir_edges: &mut SlotMap<DirEdgeId, DirectedEdge>,
        ring: RingId,
    ) -> Result<(), TopologyError> {
        let result_edges = self.result_area_edges(dir_edges)?;
        let mut first_out = None;
        let mut incoming = None;
        let mut state = LinkState::ScanningForIncoming;

        for next_out in result_edges.into_iter().rev() {
            let out_de = get(dir_edges, next_out)?;
            let out_in_ring = out_de.edge_ring() == Some(ring);
            let next_in = out_de.sym();
            if first_out.is_none() && out_in_ring {
                first_out = Some(next_out);
            }
            match state {
                LinkState::ScanningForIncoming => {
                    if get(dir_edges, next_in)?.edge_ring() != Some(ring) {
                        continue;
                    }
                    incoming = Some(next_in);
                    state = LinkState::LinkingToOutgoing;
                }
                LinkState::LinkingToOutgoing => {
                    if !out_in_ring {
                        continue;
                    }
                    if let Some(inc) = incoming {
                        get_mut(dir_edges, inc)?.set_next_min(next_out);
                    }
                    state = LinkState::ScanningForIncoming;
                }
            }
        }

        if state == LinkState::LinkingToOutgoing {
            let p = self.coord.unwrap_or_else(Coord::origin);
            let first_out = first_out.ok_or(TopologyError::NoOutgoingDirEdge(p))?;
            if let Some(inc) = incoming {
                get_mut(dir_edges, inc)?.set_next_min(first_out);
            }
        }
        Ok(())
    }

    /// Number of outgoing ends belonging to maximal ring `ring`.
    #[must_use]
    pub fn outgoing_degree(&self, dir_edges: &SlotMap<DirEdgeId, DirectedEdge>, ring: RingId) -> usize {
        self.edge_ends()
            .iter()
            .filter(|id| dir_edges.get(**id).is_some_and(|de| de.edge_ring() == Some(ring)))
            .count()
    }
}
