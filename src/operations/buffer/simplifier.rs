use crate::math::distance_2d::point_to_segment;
use crate::math::{orientation_index, Coord};

/// Number of intermediate vertices sampled when checking that a run of
/// deleted vertices stays shallow.
const NUM_PTS_TO_CHECK: usize = 10;

/// Simplifies a buffer input line by removing shallow concavities on the
/// side being buffered.
///
/// A vertex is removed when it bends towards the buffer side by less than
/// the distance tolerance, since the buffer curve would cover the notch
/// anyway. A positive tolerance simplifies the left side of the line, a
/// negative one the right side. Convex vertices are never removed, so the
/// buffer result is unchanged up to the tolerance.
#[derive(Debug)]
pub struct BufferInputLineSimplifier<'a> {
    input: &'a [Coord],
    distance_tol: f64,
    angle_orientation: i32,
    is_deleted: Vec<bool>,
}

impl<'a> BufferInputLineSimplifier<'a> {
    #[must_use]
    pub fn new(input: &'a [Coord]) -> Self {
        Self {
            input,
            distance_tol: 0.0,
            angle_orientation: 1,
            is_deleted: vec![false; input.len()],
        }
    }

    /// Returns the simplified line for the signed tolerance `distance_tol`.
    #[must_use]
    pub fn simplify(mut self, distance_tol: f64) -> Vec<Coord> {
        self.distance_tol = distance_tol.abs();
        self.angle_orientation = if distance_tol < 0.0 { -1 } else { 1 };
        while self.delete_shallow_concavities() {}
        self.input
            .iter()
            .zip(&self.is_deleted)
            .filter(|(_, deleted)| !**deleted)
            .map(|(p, _)| *p)
            .collect()
    }

    fn delete_shallow_concavities(&mut self) -> bool {
        let mut index = 1;
        let mut mid_index = self.next_index(index);
        let mut last_index = self.next_index(mid_index);
        let mut is_changed = false;
        while last_index < self.input.len() {
            let mut is_middle_deleted = false;
            if self.is_deletable(index, mid_index, last_index) {
                self.is_deleted[mid_index] = true;
                is_middle_deleted = true;
                is_changed = true;
            }
            index = if is_middle_deleted { last_index } else { mid_index };
            mid_index = self.next_index(index);
            last_index = self.next_index(mid_index);
        }
        is_changed
    }

    fn next_index(&self, index: usize) -> usize {
        let mut next = index + 1;
        while next < self.input.len() && self.is_deleted[next] {
            next += 1;
        }
        next
    }

    fn is_deletable(&self, i0: usize, i1: usize, i2: usize) -> bool {
        let (p0, p1, p2) = (&self.input[i0], &self.input[i1], &self.input[i2]);
        if orientation_index(p0, p1, p2) != self.angle_orientation {
            return false;
        }
        if !self.is_shallow(p0, p1, p2) {
            return false;
        }
        // Samples against the chord to the middle vertex, not the far one.
        self.is_shallow_sampled(p0, p1, i0, i2)
    }

    fn is_shallow_sampled(&self, p0: &Coord, p2: &Coord, i0: usize, i2: usize) -> bool {
        let inc = ((i2 - i0) / NUM_PTS_TO_CHECK).max(1);
        (i0..i2)
            .step_by(inc)
            .all(|i| self.is_shallow(p0, &self.input[i], p2))
    }

    fn is_shallow(&self, p0: &Coord, p1: &Coord, p2: &Coord) -> bool {
        point_to_segment(p1, p0, p2) < self.distance_tol
    }
}
