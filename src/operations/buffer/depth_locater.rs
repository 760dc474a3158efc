use std::cmp::Ordering;

use crate::error::TopologyError;
use crate::math::{Coord, LineSegment, Orientation};
use crate::topology::{DirEdgeId, PlanarGraph, Position};

use super::subgraph::BufferSubgraph;

/// An upward segment stabbed by the depth ray, with the depth on its left.
#[derive(Debug, Clone, Copy)]
struct DepthSegment {
    upward: LineSegment,
    left_depth: i32,
}

impl DepthSegment {
    /// Orders segments left to right along the stabbing ray. Segments that
    /// do not overlap in orientation fall back to endpoint order.
    fn compare(&self, other: &Self) -> Ordering {
        let mut orient = self.upward.orientation_index_of(&other.upward);
        if orient == 0 {
            orient = -other.upward.orientation_index_of(&self.upward);
        }
        match orient {
            0 => self.upward.compare_endpoints(&other.upward),
            o if o > 0 => Ordering::Greater,
            _ => Ordering::Less,
        }
    }
}

/// Finds the depth of a point with respect to already-processed
/// subgraphs, by casting a ray to the right and taking the depth of the
/// nearest stabbed segment.
#[derive(Debug)]
pub struct SubgraphDepthLocater<'a> {
    graph: &'a PlanarGraph,
    subgraphs: &'a [BufferSubgraph],
}

impl<'a> SubgraphDepthLocater<'a> {
    #[must_use]
    pub fn new(graph: &'a PlanarGraph, subgraphs: &'a [BufferSubgraph]) -> Self {
        Self { graph, subgraphs }
    }

    /// Depth of `p`: the left depth of the first segment the ray from `p`
    /// crosses, or 0 if it crosses none.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` for a dangling id.
    pub fn depth(&self, p: &Coord) -> Result<i32, TopologyError> {
        let stabbed = self.find_stabbed_segments(p)?;
        let nearest = stabbed.into_iter().reduce(|min, ds| {
            if ds.compare(&min) == Ordering::Less {
                ds
            } else {
                min
            }
        });
        Ok(nearest.map_or(0, |ds| ds.left_depth))
    }

    fn find_stabbed_segments(&self, p: &Coord) -> Result<Vec<DepthSegment>, TopologyError> {
        let mut stabbed = Vec::new();
        for subgraph in self.subgraphs {
            let env = subgraph.envelope();
            if p.y < env.min_y() || p.y > env.max_y() {
                continue;
            }
            for &de_id in subgraph.dir_edges() {
                self.stab_edge(p, de_id, &mut stabbed)?;
            }
        }
        Ok(stabbed)
    }

    fn stab_edge(&self, p: &Coord, de_id: DirEdgeId, stabbed: &mut Vec<DepthSegment>) -> Result<(), TopologyError> {
        let de = self.graph.dir_edge(de_id)?;
        if !de.is_forward() {
            return Ok(());
        }
        let pts = self.graph.edge(de.edge())?.coords();
        for (i, w) in pts.windows(2).enumerate() {
            let mut seg = LineSegment::new(w[0], w[1]);
            if seg.p0.y > seg.p1.y {
                seg.reverse();
            }
            if seg.max_x() < p.x || seg.is_horizontal() {
                continue;
            }
            if p.y < seg.p0.y || p.y > seg.p1.y {
                continue;
            }
            // Segment lies to the left of the ray origin.
            if Orientation::of(&seg.p0, &seg.p1, p) == Orientation::Clockwise {
                continue;
            }
            // The left of the upward segment is the right of a downward edge.
            let left_depth = if seg.p0 == pts[i] {
                de.depth(Position::Left)
            } else {
                de.depth(Position::Right)
            };
            stabbed.push(DepthSegment {
                upward: seg,
                left_depth,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64, depth: i32) -> DepthSegment {
        DepthSegment {
            upward: LineSegment::new(Coord::new(x0, y0), Coord::new(x1, y1)),
            left_depth: depth,
        }
    }

    #[test]
    fn nearer_segment_orders_first() {
        let near = seg(1.0, 0.0, 1.0, 10.0, 1);
        let far = seg(5.0, 0.0, 5.0, 10.0, 2);
        assert_eq!(near.compare(&far), Ordering::Less);
        assert_eq!(far.compare(&near), Ordering::Greater);
    }

    #[test]
    fn collinear_segments_use_endpoint_order() {
        let a = seg(1.0, 0.0, 1.0, 5.0, 1);
        let b = seg(1.0, 5.0, 1.0, 10.0, 1);
        assert_eq!(a.compare(&b), Ordering::Less);
    }

    #[test]
    fn no_subgraphs_means_depth_zero() {
        let graph = PlanarGraph::new();
        let locater = SubgraphDepthLocater::new(&graph, &[]);
        assert_eq!(locater.depth(&Coord::new(0.0, 0.0)).ok(), Some(0));
    }
}
