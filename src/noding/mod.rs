//! Noding: computing all intersections between a set of segment strings and
//! splitting the strings at them.

pub mod intersection_adder;
pub mod mc_index_noder;
pub mod segment_string;
pub mod snap_rounding;

pub use intersection_adder::{IntersectionAdder, InteriorIntersectionFinderAdder};
pub use mc_index_noder::McIndexNoder;
pub use segment_string::NodedSegmentString;
pub use snap_rounding::SnapRoundingNoder;

/// Computes the nodes of a set of segment strings and returns the split
/// substrings, each carrying the data of its parent.
///
/// Noding does not check the topology of its result.
pub trait Noder<D> {
    fn compute_nodes(&mut self, strings: Vec<NodedSegmentString<D>>) -> Vec<NodedSegmentString<D>>;
}

/// Processes a candidate pair of segments: segment `seg0` of string `s0`
/// and segment `seg1` of string `s1`.
pub trait SegmentIntersector {
    fn process_intersections<D: Clone>(
        &mut self,
        strings: &mut [NodedSegmentString<D>],
        s0: usize,
        seg0: usize,
        s1: usize,
        seg1: usize,
    );
}
