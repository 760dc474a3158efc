//! Monotone chains: maximal runs of segments of a coordinate sequence whose
//! directions all lie in the same quadrant.
//!
//! A monotone chain cannot self-intersect, and the envelope of any
//! sub-chain is spanned by its two end vertices, which makes overlap search
//! by recursive bisection cheap.

use crate::math::{Coord, Envelope};
use crate::topology::Quadrant;

/// A monotone section `[start, end]` of the coordinate sequence of the
/// segment string identified by `context`.
#[derive(Debug, Clone)]
pub struct MonotoneChain {
    context: usize,
    start: usize,
    end: usize,
    env: Envelope,
    id: usize,
}

impl MonotoneChain {
    /// Splits `pts` into monotone chains tagged with `context`. Chain ids
    /// are numbered consecutively from `first_id`.
    #[must_use]
    pub fn build(pts: &[Coord], context: usize, first_id: usize) -> Vec<MonotoneChain> {
        let mut chains = Vec::new();
        if pts.len() < 2 {
            return chains;
        }
        let mut start = 0;
        loop {
            let end = find_chain_end(pts, start);
            chains.push(MonotoneChain {
                context,
                start,
                end,
                env: Envelope::from_coords(&pts[start], &pts[end]),
                id: first_id + chains.len(),
            });
            start = end;
            if start >= pts.len() - 1 {
                break;
            }
        }
        chains
    }

    #[must_use]
    pub fn context(&self) -> usize {
        self.context
    }

    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    #[must_use]
    pub fn envelope(&self) -> &Envelope {
        &self.env
    }

    /// Reports every pair of segments, one from each chain, whose envelopes
    /// overlap, as `(segment index in self, segment index in other)`.
    pub fn compute_overlaps(
        &self,
        pts: &[Coord],
        other: &MonotoneChain,
        other_pts: &[Coord],
        action: &mut dyn FnMut(usize, usize),
    ) {
        overlaps(pts, self.start, self.end, other_pts, other.start, other.end, action);
    }

    /// Reports every segment start index whose sub-chain envelope meets
    /// `search`.
    pub fn select(&self, pts: &[Coord], search: &Envelope, action: &mut dyn FnMut(usize)) {
        select(pts, self.start, self.end, search, action);
    }
}

fn find_chain_end(pts: &[Coord], start: usize) -> usize {
    // Skip repeated points to find the first real direction.
    let mut safe_start = start;
    while safe_start < pts.len() - 1 && pts[safe_start] == pts[safe_start + 1] {
        safe_start += 1;
    }
    if safe_start >= pts.len() - 1 {
        return pts.len() - 1;
    }
    let quadrant = |a: &Coord, b: &Coord| Quadrant::of(b.x - a.x, b.y - a.y);
    let chain_quad = quadrant(&pts[safe_start], &pts[safe_start + 1]);
    let mut last = start + 1;
    while last < pts.len() {
        if pts[last - 1] != pts[last] && quadrant(&pts[last - 1], &pts[last]) != chain_quad {
            break;
        }
        last += 1;
    }
    last - 1
}

fn overlaps(
    pts0: &[Coord],
    start0: usize,
    end0: usize,
    pts1: &[Coord],
    start1: usize,
    end1: usize,
    action: &mut dyn FnMut(usize, usize),
) {
    if end0 - start0 == 1 && end1 - start1 == 1 {
        action(start0, start1);
        return;
    }
    let env0 = Envelope::from_coords(&pts0[start0], &pts0[end0]);
    let env1 = Envelope::from_coords(&pts1[start1], &pts1[end1]);
    if !env0.intersects(&env1) {
        return;
    }
    let mid0 = (start0 + end0) / 2;
    let mid1 = (start1 + end1) / 2;
    if start0 < mid0 {
        if start1 < mid1 {
            overlaps(pts0, start0, mid0, pts1, start1, mid1, action);
        }
        if mid1 < end1 {
            overlaps(pts0, start0, mid0, pts1, mid1, end1, action);
        }
    }
    if mid0 < end0 {
        if start1 < mid1 {
            overlaps(pts0, mid0, end0, pts1, start1, mid1, action);
        }
        if mid1 < end1 {
            overlaps(pts0, mid0, end0, pts1, mid1, end1, action);
        }
    }
}

fn select(pts: &[Coord], start: usize, end: usize, search: &Envelope, action: &mut dyn FnMut(usize)) {
    if !search.intersects(&Envelope::from_coords(&pts[start], &pts[end])) {
        return;
    }
    if end - start == 1 {
        action(start);
        return;
    }
    let mid = (start + end) / 2;
    if start < mid {
        select(pts, start, mid, search, action);
    }
    if mid < end {
        select(pts, mid, end, search, action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag() -> Vec<Coord> {
        vec![
            Coord::new(0.0, 0.0),
            Coord::new(1.0, 1.0),
            Coord::new(2.0, 3.0),
            Coord::new(3.0, 2.0),
            Coord::new(4.0, 0.0),
            Coord::new(4.0, 0.0),
            Coord::new(5.0, -1.0),
            Coord::new(6.0, 1.0),
        ]
    }

    #[test]
    fn chains_split_on_quadrant_change() {
        let chains = MonotoneChain::build(&zigzag(), 0, 10);
        let spans: Vec<(usize, usize)> = chains.iter().map(|c| (c.start, c.end)).collect();
        // The repeated vertex stays inside the south-east run.
        assert_eq!(spans, vec![(0, 2), (2, 6), (6, 7)]);
        assert_eq!(chains[1].id(), 11);
    }

    #[test]
    fn overlaps_report_crossing_segments() {
        let a = vec![Coord::new(0.0, 0.0), Coord::new(1.0, 1.0), Coord::new(2.0, 2.0), Coord::new(3.0, 3.0)];
        let b = vec![Coord::new(0.0, 3.0), Coord::new(3.0, 0.0)];
        let ca = MonotoneChain::build(&a, 0, 0);
        let cb = MonotoneChain::build(&b, 1, ca.len());
        let mut pairs = Vec::new();
        ca[0].compute_overlaps(&a, &cb[0], &b, &mut |i, j| pairs.push((i, j)));
        assert!(pairs.contains(&(1, 0)));
        assert!(pairs.iter().all(|&(_, j)| j == 0));
    }

    #[test]
    fn select_finds_segments_in_envelope() {
        let pts = vec![Coord::new(0.0, 0.0), Coord::new(1.0, 0.0), Coord::new(2.0, 0.0), Coord::new(3.0, 0.0)];
        let chain = &MonotoneChain::build(&pts, 0, 0)[0];
        let mut found = Vec::new();
        let search = Envelope::from_coords(&Coord::new(1.5, -0.5), &Coord::new(1.7, 0.5));
        chain.select(&pts, &search, &mut |i| found.push(i));
        assert_eq!(found, vec![1]);
    }
}
