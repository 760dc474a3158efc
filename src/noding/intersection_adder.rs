use crate::algorithm::LineIntersector;
use crate::math::Coord;

use super::{NodedSegmentString, SegmentIntersector};

/// Adds every non-trivial intersection between two segments as a node on
/// both segment strings.
///
/// An intersection is trivial when it is the single shared vertex of two
/// adjacent segments of the same string, or of the first and last segments
/// of a closed string.
#[derive(Debug, Clone)]
pub struct IntersectionAdder {
    li: LineIntersector,
    num_intersections: usize,
    num_interior_intersections: usize,
    num_proper_intersections: usize,
}

impl IntersectionAdder {
    #[must_use]
    pub fn new(li: LineIntersector) -> Self {
        Self {
            li,
            num_intersections: 0,
            num_interior_intersections: 0,
            num_proper_intersections: 0,
        }
    }

    #[must_use]
    pub fn num_intersections(&self) -> usize {
        self.num_intersections
    }

    #[must_use]
    pub fn num_interior_intersections(&self) -> usize {
        self.num_interior_intersections
    }

    #[must_use]
    pub fn num_proper_intersections(&self) -> usize {
        self.num_proper_intersections
    }

    fn is_trivial_intersection<D: Clone>(
        &self,
        string: &NodedSegmentString<D>,
        same_string: bool,
        seg0: usize,
        seg1: usize,
    ) -> bool {
        if !same_string || self.li.intersection_num() != 1 {
            return false;
        }
        if seg0.abs_diff(seg1) == 1 {
            return true;
        }
        if string.is_closed() {
            let max_seg_index = string.len() - 2;
            if (seg0 == 0 && seg1 == max_seg_index) || (seg1 == 0 && seg0 == max_seg_index) {
                return true;
            }
        }
        false
    }
}

fn segment<D: Clone>(s: &NodedSegmentString<D>, i: usize) -> (Coord, Coord) {
    (s.coords()[i], s.coords()[i + 1])
}

impl SegmentIntersector for IntersectionAdder {
    fn process_intersections<D: Clone>(
        &mut self,
        strings: &mut [NodedSegmentString<D>],
        s0: usize,
        seg0: usize,
        s1: usize,
        seg1: usize,
    ) {
        if s0 == s1 && seg0 == seg1 {
            return;
        }
        let (p00, p01) = segment(&strings[s0], seg0);
        let (p10, p11) = segment(&strings[s1], seg1);
        self.li.compute_intersection(&p00, &p01, &p10, &p11);
        if !self.li.has_intersection() {
            return;
        }
        self.num_intersections += 1;
        if self.li.is_interior_intersection() {
            self.num_interior_intersections += 1;
        }
        if self.is_trivial_intersection(&strings[s0], s0 == s1, seg0, seg1) {
            return;
        }
        strings[s0].add_intersections(&self.li, seg0);
        strings[s1].add_intersections(&self.li, seg1);
        if self.li.is_proper() {
            self.num_proper_intersections += 1;
        }
    }
}

/// Records interior intersection points and adds them as nodes, for use
/// by snap-rounding.
#[derive(Debug, Clone)]
pub struct InteriorIntersectionFinderAdder {
    li: LineIntersector,
    interior_intersections: Vec<Coord>,
}

impl InteriorIntersectionFinderAdder {
    #[must_use]
    pub fn new(li: LineIntersector) -> Self {
        Self {
            li,
            interior_intersections: Vec::new(),
        }
    }

    #[must_use]
    pub fn interior_intersections(&self) -> &[Coord] {
        &self.interior_intersections
    }

    #[must_use]
    pub fn into_interior_intersections(self) -> Vec<Coord> {
        self.interior_intersections
    }
}

impl SegmentIntersector for InteriorIntersectionFinderAdder {
    fn process_intersections<D: Clone>(
        &mut self,
        strings: &mut [NodedSegmentString<D>],
        s0: usize,
        seg0: usize,
        s1: usize,
        seg1: usize,
    ) {
        if s0 == s1 && seg0 == seg1 {
            return;
        }
        let (p00, p01) = segment(&strings[s0], seg0);
        let (p10, p11) = segment(&strings[s1], seg1);
        self.li.compute_intersection(&p00, &p01, &p10, &p11);
        if !self.li.has_intersection() || !self.li.is_interior_intersection() {
            return;
        }
        for i in 0..self.li.intersection_num() {
            self.interior_intersections.push(self.li.intersection(i));
        }
        strings[s0].add_intersections(&self.li, seg0);
        strings[s1].add_intersections(&self.li, seg1);
    }
}
