//! Edge ends around a node, kept in counter-clockwise angular order.

use std::cmp::Ordering;

use slotmap::SlotMap;

use crate::error::TopologyError;
use crate::math::{orientation_index, Coord};

use super::directed_edge::{DirEdgeId, DirectedEdge};
use super::edge::{Edge, EdgeId};
use super::label::{Label, Location, Position};
use super::quadrant::Quadrant;

/// Direction of an edge end: the origin `p0`, the next point `p1` and the
/// derived direction quadrant.
#[derive(Debug, Clone, Copy)]
pub struct EdgeEndKey {
    pub p0: Coord,
    pub p1: Coord,
    pub dx: f64,
    pub dy: f64,
    pub quadrant: Quadrant,
}

impl EdgeEndKey {
    /// Returns `None` if `p0 == p1`.
    #[must_use]
    pub fn new(p0: Coord, p1: Coord) -> Option<Self> {
        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;
        let quadrant = Quadrant::of(dx, dy)?;
        Some(Self {
            p0,
            p1,
            dx,
            dy,
            quadrant,
        })
    }

    /// Angular comparison of two edge ends sharing an origin.
    ///
    /// Ends are ordered by quadrant first; within a quadrant the end lying
    /// counter-clockwise of the other is greater.
    #[must_use]
    pub fn compare_direction(&self, other: &EdgeEndKey) -> Ordering {
        if self.dx == other.dx && self.dy == other.dy {
            return Ordering::Equal;
        }
        match self.quadrant.cmp(&other.quadrant) {
            Ordering::Equal => {}
            ord => return ord,
        }
        match orientation_index(&other.p0, &other.p1, &self.p1) {
            1 => Ordering::Greater,
            -1 => Ordering::Less,
            _ => Ordering::Equal,
        }
    }
}

impl PartialEq for EdgeEndKey {
    fn eq(&self, other: &Self) -> bool {
        self.compare_direction(other) == Ordering::Equal
    }
}

impl Eq for EdgeEndKey {}

impl PartialOrd for EdgeEndKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EdgeEndKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_direction(other)
    }
}

/// Mutable access to directed-edge labels during labelling, borrowing the
/// graph's directed-edge arena and its edges separately.
pub struct LabelStore<'a> {
    dir_edges: &'a mut SlotMap<DirEdgeId, DirectedEdge>,
    edges: &'a SlotMap<EdgeId, Edge>,
}

impl<'a> LabelStore<'a> {
    #[must_use]
    pub fn new(dir_edges: &'a mut SlotMap<DirEdgeId, DirectedEdge>, edges: &'a SlotMap<EdgeId, Edge>) -> Self {
        Self { dir_edges, edges }
    }

    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for an unknown id.
    pub fn label(&self, id: DirEdgeId) -> Result<&Label, TopologyError> {
        self.dir_edges
            .get(id)
            .map(DirectedEdge::label)
            .ok_or_else(|| TopologyError::EntityNotFound("directed edge".into()))
    }

    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for an unknown id.
    pub fn label_mut(&mut self, id: DirEdgeId) -> Result<&mut Label, TopologyError> {
        self.dir_edges
            .get_mut(id)
            .map(DirectedEdge::label_mut)
            .ok_or_else(|| TopologyError::EntityNotFound("directed edge".into()))
    }

    /// Re-derives a directed edge's label from its parent edge.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for an unknown id.
    pub fn refresh_from_edge(&mut self, id: DirEdgeId) -> Result<(), TopologyError> {
        let de = self
            .dir_edges
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("directed edge".into()))?;
        let edge = self
            .edges
            .get(de.edge())
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))?;
        let label = if de.is_forward() {
            *edge.label()
        } else {
            edge.label().flipped()
        };
        de.set_label(label);
        Ok(())
    }

    /// Origin coordinate of a directed edge.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for an unknown id.
    pub fn coordinate(&self, id: DirEdgeId) -> Result<Coord, TopologyError> {
        self.dir_edges
            .get(id)
            .map(DirectedEdge::coordinate)
            .ok_or_else(|| TopologyError::EntityNotFound("directed edge".into()))
    }
}

/// Sorted collection of the edge ends incident on one node.
///
/// Implementors store the ends ordered by [`EdgeEndKey::compare_direction`];
/// the provided methods implement the side-label propagation shared by all
/// star kinds.
pub trait EdgeEndStar {
    /// Inserts an edge end. An end with the same direction as an existing
    /// one replaces it.
    fn insert(&mut self, id: DirEdgeId, key: EdgeEndKey);

    /// Edge ends in counter-clockwise order.
    fn edge_ends(&self) -> &[DirEdgeId];

    /// Coordinate of the node, or `None` for an empty star.
    fn coordinate(&self) -> Option<Coord>;

    /// Per-geometry cache of the node's location in each area geometry.
    fn area_location_cache(&mut self) -> &mut [Location; 2];

    fn degree(&self) -> usize {
        self.edge_ends().len()
    }

    fn find_index(&self, id: DirEdgeId) -> Option<usize> {
        self.edge_ends().iter().position(|e| *e == id)
    }

    /// The edge end next clockwise from `id`.
    fn next_cw(&self, id: DirEdgeId) -> Option<DirEdgeId> {
        let ends = self.edge_ends();
        let i = self.find_index(id)?;
        let prev = if i == 0 { ends.len() - 1 } else { i - 1 };
        ends.get(prev).copied()
    }

    /// Refreshes every end's label from its parent edge.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` if an end is not in `store`.
    fn compute_edge_end_labels(&self, store: &mut LabelStore<'_>) -> Result<(), TopologyError> {
        for &id in self.edge_ends() {
            store.refresh_from_edge(id)?;
        }
        Ok(())
    }

    /// Completes the labels of all edge ends at this node.
    ///
    /// Known side locations are propagated around the star; any location
    /// still unknown afterwards is EXTERIOR if the geometry has a collapsed
    /// (line-type boundary) edge here, else the node's location in the
    /// geometry as reported by `locate`.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::SideLocationConflict` if the side labels are
    /// inconsistent around the node.
    fn compute_labelling(
        &mut self,
        store: &mut LabelStore<'_>,
        locate: &mut dyn FnMut(usize, &Coord) -> Location,
    ) -> Result<(), TopologyError> {
        self.compute_edge_end_labels(store)?;
        self.propagate_side_labels(store, 0)?;
        self.propagate_side_labels(store, 1)?;

        let mut has_collapsed_edge = [false, false];
        for &id in self.edge_ends() {
            let label = store.label(id)?;
            for (geom_index, collapsed) in has_collapsed_edge.iter_mut().enumerate() {
                if label.is_line(geom_index) && label.location(geom_index, Position::On) == Location::Boundary {
                    *collapsed = true;
                }
            }
        }

        let ends = self.edge_ends().to_vec();
        for id in ends {
            for (geom_index, collapsed) in has_collapsed_edge.iter().enumerate() {
                if !store.label(id)?.is_any_null(geom_index) {
                    continue;
                }
                let loc = if *collapsed {
                    Location::Exterior
                } else {
                    let p = store.coordinate(id)?;
                    let cache = self.area_location_cache();
                    if cache[geom_index] == Location::None {
                        cache[geom_index] = locate(geom_index, &p);
                    }
                    cache[geom_index]
                };
                store.label_mut(id)?.set_all_locations_if_null(geom_index, loc);
            }
        }
        Ok(())
    }

    /// Walks the star counter-clockwise carrying the current side location
    /// for `geom_index`, filling unknown sides and checking known ones.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::SideLocationConflict` when a right side
    /// disagrees with the location carried from the previous end.
    fn propagate_side_labels(&self, store: &mut LabelStore<'_>, geom_index: usize) -> Result<(), TopologyError> {
        let mut start_loc = Location::None;
        for &id in self.edge_ends() {
            let label = store.label(id)?;
            if label.is_area_at(geom_index) && label.location(geom_index, Position::Left) != Location::None {
                start_loc = label.location(geom_index, Position::Left);
            }
        }
        if start_loc == Location::None {
            return Ok(());
        }

        let mut curr_loc = start_loc;
        for &id in self.edge_ends() {
            let p = store.coordinate(id)?;
            let label = store.label_mut(id)?;
            if label.location(geom_index, Position::On) == Location::None {
                label.set_location(geom_index, Position::On, curr_loc);
            }
            if !label.is_area_at(geom_index) {
                continue;
            }
            let left_loc = label.location(geom_index, Position::Left);
            let right_loc = label.location(geom_index, Position::Right);
            if right_loc != Location::None {
                if right_loc != curr_loc {
                    return Err(TopologyError::SideLocationConflict(p));
                }
                if left_loc == Location::None {
                    return Err(TopologyError::InvalidTopology(format!("found single null side at {p}")));
                }
                curr_loc = left_loc;
            } else {
                if left_loc != Location::None {
                    return Err(TopologyError::InvalidTopology(format!("found single null side at {p}")));
                }
                label.set_location(geom_index, Position::Right, curr_loc);
                label.set_location(geom_index, Position::Left, curr_loc);
            }
        }
        Ok(())
    }

    /// Returns `true` if the area labels for `geom_index` alternate
    /// consistently around the node.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::InvalidTopology` if an end is unlabelled or
    /// not an area edge.
    fn is_area_labels_consistent(&self, store: &mut LabelStore<'_>, geom_index: usize) -> Result<bool, TopologyError> {
        self.compute_edge_end_labels(store)?;
        let ends = self.edge_ends();
        let Some(&last) = ends.last() else {
            return Ok(true);
        };
        let start_loc = store.label(last)?.location(geom_index, Position::Left);
        if start_loc == Location::None {
            let p = store.coordinate(last)?;
            return Err(TopologyError::InvalidTopology(format!("found unlabelled area edge at {p}")));
        }

        let mut curr_loc = start_loc;
        for &id in ends {
            let label = store.label(id)?;
            if !label.is_area_at(geom_index) {
                let p = store.coordinate(id)?;
                return Err(TopologyError::InvalidTopology(format!("found non-area edge at {p}")));
            }
            let left_loc = label.location(geom_index, Position::Left);
            let right_loc = label.location(geom_index, Position::Right);
            if left_loc == right_loc || right_loc != curr_loc {
                return Ok(false);
            }
            curr_loc = left_loc;
        }
        Ok(true)
    }
}
