use crate::math::Coord;

use super::directed_edge_star::DirectedEdgeStar;

slotmap::new_key_type! {
    /// Unique identifier for a node in a planar graph.
    pub struct NodeId;
}

/// A graph node: a coordinate and the star of directed edges leaving it.
#[derive(Debug, Clone)]
pub struct Node {
    coord: Coord,
    star: DirectedEdgeStar,
}

impl Node {
    #[must_use]
    pub fn new(coord: Coord) -> Self {
        Self {
            coord,
            star: DirectedEdgeStar::new(),
        }
    }

    #[must_use]
    pub fn coordinate(&self) -> Coord {
        self.coord
    }

    #[must_use]
    pub fn star(&self) -> &DirectedEdgeStar {
        &self.star
    }

    pub fn star_mut(&mut self) -> &mut DirectedEdgeStar {
        &mut self.star
    }
}
