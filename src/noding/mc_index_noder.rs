use tracing::trace;

use crate::index::strtree::DEFAULT_NODE_CAPACITY;
use crate::index::{MonotoneChain, StrTree};
use crate::math::Envelope;

use super::{NodedSegmentString, Noder, SegmentIntersector};

/// Monotone chains of a set of segment strings, indexed by envelope.
#[derive(Debug)]
pub struct McIndex {
    chains: Vec<MonotoneChain>,
    tree: StrTree<usize>,
}

impl McIndex {
    /// Builds the chains of every string, numbering chain ids in string
    /// order.
    #[must_use]
    pub fn build<D: Clone>(strings: &[NodedSegmentString<D>]) -> Self {
        let mut chains = Vec::new();
        for (i, s) in strings.iter().enumerate() {
            let next_id = chains.len();
            chains.extend(MonotoneChain::build(s.coords(), i, next_id));
        }
        let items = chains.iter().enumerate().map(|(i, c)| (*c.envelope(), i)).collect();
        let tree = StrTree::load(DEFAULT_NODE_CAPACITY, items);
        Self { chains, tree }
    }

    #[must_use]
    pub fn chains(&self) -> &[MonotoneChain] {
        &self.chains
    }

    /// Every candidate pair of overlapping segments, as
    /// `(string, segment, string, segment)`. Each unordered pair of chains is
    /// tested once.
    #[must_use]
    pub fn overlapping_segments<D: Clone>(&self, strings: &[NodedSegmentString<D>]) -> Vec<(usize, usize, usize, usize)> {
        let mut pairs = Vec::new();
        for query in &self.chains {
            let q_pts = strings[query.context()].coords();
            for &test_index in self.tree.query(query.envelope()) {
                let test = &self.chains[test_index];
                if test.id() <= query.id() {
                    continue;
                }
                let t_pts = strings[test.context()].coords();
                query.compute_overlaps(q_pts, test, t_pts, &mut |i, j| {
                    pairs.push((query.context(), i, test.context(), j));
                });
            }
        }
        pairs
    }

    /// Reports `(string, segment)` for every segment whose monotone
    /// sub-chain envelope meets `search`.
    pub fn select_segments<D: Clone>(
        &self,
        strings: &[NodedSegmentString<D>],
        search: &Envelope,
        action: &mut dyn FnMut(usize, usize),
    ) {
        for &chain_index in self.tree.query(search) {
            let chain = &self.chains[chain_index];
            let ctx = chain.context();
            chain.select(strings[ctx].coords(), search, &mut |seg| action(ctx, seg));
        }
    }
}

/// Nodes segment strings using a monotone-chain index to find candidate
/// segment pairs, handing each pair to a [`SegmentIntersector`].
#[derive(Debug, Clone)]
pub struct McIndexNoder<I> {
    intersector: I,
}

impl<I: SegmentIntersector> McIndexNoder<I> {
    #[must_use]
    pub fn new(intersector: I) -> Self {
        Self { intersector }
    }

    #[must_use]
    pub fn intersector(&self) -> &I {
        &self.intersector
    }
}

impl<D: Clone, I: SegmentIntersector> Noder<D> for McIndexNoder<I> {
    fn compute_nodes(&mut self, mut strings: Vec<NodedSegmentString<D>>) -> Vec<NodedSegmentString<D>> {
        let index = McIndex::build(&strings);
        let pairs = index.overlapping_segments(&strings);
        trace!(
            strings = strings.len(),
            chains = index.chains().len(),
            candidates = pairs.len(),
            "noding segment strings"
        );
        for (s0, i0, s1, i1) in pairs {
            self.intersector.process_intersections(&mut strings, s0, i0, s1, i1);
        }
        NodedSegmentString::noded_substrings(strings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::LineIntersector;
    use crate::math::Coord;
    use crate::noding::IntersectionAdder;

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn crossing_lines_are_split() {
        let strings = vec![
            NodedSegmentString::new(vec![c(0.0, 0.0), c(10.0, 10.0)], 'a'),
            NodedSegmentString::new(vec![c(0.0, 10.0), c(10.0, 0.0)], 'b'),
        ];
        let mut noder = McIndexNoder::new(IntersectionAdder::new(LineIntersector::default()));
        let parts = noder.compute_nodes(strings);
        assert_eq!(parts.len(), 4);
        assert_eq!(parts.iter().filter(|p| *p.data() == 'a').count(), 2);
        assert!(parts.iter().all(|p| p.coords().contains(&c(5.0, 5.0))));
        assert_eq!(noder.intersector().num_proper_intersections(), 1);
    }

    #[test]
    fn self_crossing_ring_is_split() {
        // Bow-tie: segments 0 and 2 cross at (1, 1).
        let ring = vec![c(0.0, 0.0), c(2.0, 2.0), c(2.0, 0.0), c(0.0, 2.0), c(0.0, 0.0)];
        let mut noder = McIndexNoder::new(IntersectionAdder::new(LineIntersector::default()));
        let parts = noder.compute_nodes(vec![NodedSegmentString::new(ring, ())]);
        let pts: Vec<&[Coord]> = parts.iter().map(NodedSegmentString::coords).collect();
        assert_eq!(
            pts,
            vec![
                &[c(0.0, 0.0), c(1.0, 1.0)][..],
                &[c(1.0, 1.0), c(2.0, 2.0), c(2.0, 0.0), c(1.0, 1.0)][..],
                &[c(1.0, 1.0), c(0.0, 2.0), c(0.0, 0.0)][..],
            ]
        );
    }

    #[test]
    fn disjoint_strings_are_unchanged() {
        let strings = vec![
            NodedSegmentString::new(vec![c(0.0, 0.0), c(1.0, 0.0), c(2.0, 0.0)], ()),
            NodedSegmentString::new(vec![c(0.0, 5.0), c(2.0, 5.0)], ()),
        ];
        let mut noder = McIndexNoder::new(IntersectionAdder::new(LineIntersector::default()));
        let parts = noder.compute_nodes(strings);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].len(), 3);
        assert_eq!(noder.intersector().num_intersections(), 0);
    }

    #[test]
    fn select_segments_reports_context() {
        let strings = vec![
            NodedSegmentString::new(vec![c(0.0, 0.0), c(1.0, 0.0), c(2.0, 0.0)], ()),
            NodedSegmentString::new(vec![c(0.0, 5.0), c(2.0, 5.0)], ()),
        ];
        let index = McIndex::build(&strings);
        let mut hits = Vec::new();
        let search = Envelope::from_coords(&c(1.2, -0.1), &c(1.4, 0.1));
        index.select_segments(&strings, &search, &mut |s, i| hits.push((s, i)));
        assert_eq!(hits, vec![(0, 1)]);
    }
}
