//! Segment strings that collect intersection nodes and split into noded
//! substrings.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::algorithm::LineIntersector;
use crate::math::Coord;

/// Octant of the direction `(dx, dy)`, numbered counter-clockwise from the
/// positive x-axis, or `None` for the zero vector.
///
/// ```text
///   \ 2 | 1 /
///  3 \  |  / 0
///  ---------
///  4 /  |  \ 7
///   / 5 | 6 \
/// ```
#[must_use]
pub fn octant(dx: f64, dy: f64) -> Option<u8> {
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    let adx = dx.abs();
    let ady = dy.abs();
    Some(if dx >= 0.0 {
        if dy >= 0.0 {
            if adx >= ady {
                0
            } else {
                1
            }
        } else if adx >= ady {
            7
        } else {
            6
        }
    } else if dy >= 0.0 {
        if adx >= ady {
            3
        } else {
            2
        }
    } else if adx >= ady {
        4
    } else {
        5
    })
}

fn relative_sign(a: f64, b: f64) -> i32 {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => -1,
        Some(Ordering::Greater) => 1,
        _ => 0,
    }
}

fn compare_value(sign0: i32, sign1: i32) -> Ordering {
    match (sign0.cmp(&0), sign1.cmp(&0)) {
        (Ordering::Less, _) => Ordering::Less,
        (Ordering::Greater, _) => Ordering::Greater,
        (_, s) => s,
    }
}

/// Orders two points lying on a segment with the given octant by their
/// distance from the segment start.
///
/// The points are assumed to be on the segment; only the signs of their
/// coordinate differences are used, which keeps the result exact.
#[must_use]
pub fn compare_along_segment(octant: u8, p0: &Coord, p1: &Coord) -> Ordering {
    if p0 == p1 {
        return Ordering::Equal;
    }
    let xs = relative_sign(p0.x, p1.x);
    let ys = relative_sign(p0.y, p1.y);
    match octant {
        0 => compare_value(xs, ys),
        1 => compare_value(ys, xs),
        2 => compare_value(ys, -xs),
        3 => compare_value(-xs, ys),
        4 => compare_value(-xs, -ys),
        5 => compare_value(-ys, -xs),
        6 => compare_value(-ys, xs),
        _ => compare_value(xs, -ys),
    }
}

/// A node on a segment string: an intersection point and the index of the
/// segment containing it.
#[derive(Debug, Clone, Copy)]
pub struct SegmentNode {
    pub coord: Coord,
    pub segment_index: usize,
    octant: Option<u8>,
    is_interior: bool,
}

impl SegmentNode {
    /// Returns `true` if the node is not at the start vertex of its segment.
    #[must_use]
    pub fn is_interior(&self) -> bool {
        self.is_interior
    }
}

impl PartialEq for SegmentNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SegmentNode {}

impl PartialOrd for SegmentNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SegmentNode {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.segment_index.cmp(&other.segment_index) {
            Ordering::Equal => {}
            ord => return ord,
        }
        if self.coord == other.coord {
            return Ordering::Equal;
        }
        match self.octant {
            Some(oct) => compare_along_segment(oct, &self.coord, &other.coord),
            None => Ordering::Equal,
        }
    }
}

/// A polyline carrying caller data `D` that records the nodes found on it.
#[derive(Debug, Clone)]
pub struct NodedSegmentString<D> {
    pts: Vec<Coord>,
    data: D,
    nodes: BTreeSet<SegmentNode>,
}

impl<D: Clone> NodedSegmentString<D> {
    #[must_use]
    pub fn new(pts: Vec<Coord>, data: D) -> Self {
        Self {
            pts,
            data,
            nodes: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn coords(&self) -> &[Coord] {
        &self.pts
    }

    #[must_use]
    pub fn data(&self) -> &D {
        &self.data
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pts.is_empty()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        !self.pts.is_empty() && self.pts.first() == self.pts.last()
    }

    /// Octant of segment `index`; `None` past the last segment or for a
    /// zero-length segment.
    #[must_use]
    pub fn segment_octant(&self, index: usize) -> Option<u8> {
        let p0 = self.pts.get(index)?;
        let p1 = self.pts.get(index + 1)?;
        Some(octant(p1.x - p0.x, p1.y - p0.y).unwrap_or(0))
    }

    /// Nodes in order along the string.
    pub fn nodes(&self) -> impl Iterator<Item = &SegmentNode> {
        self.nodes.iter()
    }

    /// Records every intersection point found by `li` on segment
    /// `segment_index`.
    pub fn add_intersections(&mut self, li: &LineIntersector, segment_index: usize) {
        for i in 0..li.intersection_num() {
            self.add_intersection(li.intersection(i), segment_index);
        }
    }

    /// Records a node at `pt` on segment `segment_index`. A point equal to
    /// the segment's end vertex is recorded on the next segment instead.
    pub fn add_intersection(&mut self, pt: Coord, segment_index: usize) {
        let mut normalized = segment_index;
        if self.pts.get(segment_index + 1) == Some(&pt) {
            normalized = segment_index + 1;
        }
        self.add_node(pt, normalized);
    }

    fn add_node(&mut self, coord: Coord, segment_index: usize) {
        let is_interior = self.pts.get(segment_index) != Some(&coord);
        let node = SegmentNode {
            coord,
            segment_index,
            octant: self.segment_octant(segment_index),
            is_interior,
        };
        self.nodes.insert(node);
    }

    /// Splits every string at its nodes.
    #[must_use]
    pub fn noded_substrings(strings: Vec<Self>) -> Vec<Self> {
        let mut out = Vec::new();
        for s in strings {
            s.split_into(&mut out);
        }
        out
    }

    /// Splits this string at its nodes and at its endpoints, appending the
    /// pieces to `out`.
    pub fn split_into(mut self, out: &mut Vec<Self>) {
        if self.pts.is_empty() {
            return;
        }
        self.add_endpoints();
        self.add_collapsed_nodes();
        let nodes: Vec<SegmentNode> = self.nodes.iter().copied().collect();
        for pair in nodes.windows(2) {
            out.push(self.split_edge(&pair[0], &pair[1]));
        }
    }

    fn add_endpoints(&mut self) {
        let max_seg_index = self.pts.len() - 1;
        self.add_node(self.pts[0], 0);
        self.add_node(self.pts[max_seg_index], max_seg_index);
    }

    /// Adds nodes at the tips of collapsed segment pairs (`a-b-a`), which
    /// would otherwise produce zero-area spikes in the split edges.
    fn add_collapsed_nodes(&mut self) {
        let mut collapsed = Vec::new();

        // Equal nodes with exactly one vertex between them.
        let nodes: Vec<SegmentNode> = self.nodes.iter().copied().collect();
        for pair in nodes.windows(2) {
            let (ei0, ei1) = (&pair[0], &pair[1]);
            if ei0.coord != ei1.coord {
                continue;
            }
            let mut between = ei1.segment_index - ei0.segment_index;
            if !ei1.is_interior {
                between = between.saturating_sub(1);
            }
            if between == 1 {
                collapsed.push(ei0.segment_index + 1);
            }
        }

        // Existing vertex collapses.
        for i in 0..self.pts.len().saturating_sub(2) {
            if self.pts[i] == self.pts[i + 2] {
                collapsed.push(i + 1);
            }
        }

        for i in collapsed {
            self.add_node(self.pts[i], i);
        }
    }

    fn split_edge(&self, ei0: &SegmentNode, ei1: &SegmentNode) -> Self {
        let last_seg_start = self.pts[ei1.segment_index];
        let use_int_pt1 = ei1.is_interior || ei1.coord != last_seg_start;
        let mut pts = Vec::with_capacity(ei1.segment_index - ei0.segment_index + 2);
        pts.push(ei0.coord);
        pts.extend_from_slice(&self.pts[ei0.segment_index + 1..=ei1.segment_index]);
        if use_int_pt1 {
            pts.push(ei1.coord);
        }
        Self::new(pts, self.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn octants_of_directions() {
        assert_eq!(octant(2.0, 1.0), Some(0));
        assert_eq!(octant(1.0, 2.0), Some(1));
        assert_eq!(octant(-1.0, 2.0), Some(2));
        assert_eq!(octant(-2.0, 1.0), Some(3));
        assert_eq!(octant(-2.0, -1.0), Some(4));
        assert_eq!(octant(-1.0, -2.0), Some(5));
        assert_eq!(octant(1.0, -2.0), Some(6));
        assert_eq!(octant(2.0, -1.0), Some(7));
        assert_eq!(octant(0.0, 0.0), None);
    }

    #[test]
    fn points_ordered_along_segment_direction() {
        // Westward segment: the point with larger x comes first.
        assert_eq!(compare_along_segment(4, &c(3.0, 0.0), &c(1.0, 0.0)), Ordering::Less);
        assert_eq!(compare_along_segment(0, &c(3.0, 0.0), &c(1.0, 0.0)), Ordering::Greater);
    }

    #[test]
    fn splits_at_interior_nodes() {
        let mut s = NodedSegmentString::new(vec![c(0.0, 0.0), c(10.0, 0.0), c(10.0, 10.0)], 'a');
        s.add_intersection(c(7.0, 0.0), 0);
        s.add_intersection(c(3.0, 0.0), 0);
        s.add_intersection(c(10.0, 5.0), 1);
        let parts = NodedSegmentString::noded_substrings(vec![s]);
        let pts: Vec<Vec<Coord>> = parts.iter().map(|p| p.coords().to_vec()).collect();
        assert_eq!(
            pts,
            vec![
                vec![c(0.0, 0.0), c(3.0, 0.0)],
                vec![c(3.0, 0.0), c(7.0, 0.0)],
                vec![c(7.0, 0.0), c(10.0, 0.0), c(10.0, 5.0)],
                vec![c(10.0, 5.0), c(10.0, 10.0)],
            ]
        );
        assert!(parts.iter().all(|p| *p.data() == 'a'));
    }

    #[test]
    fn node_at_vertex_moves_to_next_segment() {
        let mut s = NodedSegmentString::new(vec![c(0.0, 0.0), c(5.0, 0.0), c(5.0, 5.0)], ());
        s.add_intersection(c(5.0, 0.0), 0);
        let node = s.nodes().next().copied();
        assert_eq!(node.map(|n| (n.segment_index, n.is_interior())), Some((1, false)));
        let parts = NodedSegmentString::noded_substrings(vec![s]);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].coords(), &[c(0.0, 0.0), c(5.0, 0.0)]);
    }

    #[test]
    fn collapsed_spike_is_noded() {
        let s = NodedSegmentString::new(vec![c(0.0, 0.0), c(5.0, 0.0), c(0.0, 0.0), c(0.0, 5.0)], ());
        let parts = NodedSegmentString::noded_substrings(vec![s]);
        // Split at the spike tip (5,0).
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].coords(), &[c(0.0, 0.0), c(5.0, 0.0)]);
        assert_eq!(parts[1].coords(), &[c(5.0, 0.0), c(0.0, 0.0), c(0.0, 5.0)]);
    }
}
