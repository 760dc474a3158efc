//! Snap-rounding: noding whose output vertices all lie on a fixed grid.
//!
//! Every input vertex is rounded to the grid and every interior
//! intersection becomes a *hot pixel*, a grid cell of side `1 / scale`.
//! Any segment passing through a hot pixel gets a node at the pixel's
//! centre. The result is fully noded even after rounding, at the cost of
//! moving vertices by up to half a grid cell.

use tracing::trace;

use crate::algorithm::LineIntersector;
use crate::geometry::remove_repeated_points;
use crate::math::{Coord, Envelope, PrecisionModel};

use super::mc_index_noder::McIndex;
use super::{InteriorIntersectionFinderAdder, NodedSegmentString, Noder, SegmentIntersector};

fn scaled(v: f64, scale: f64) -> f64 {
    (v * scale + 0.5).floor()
}

/// A grid cell around a snap point. Containment tests run in scaled
/// coordinates, where the cell corners are exact.
#[derive(Debug, Clone)]
pub struct HotPixel {
    original: Coord,
    centre: Coord,
    scale: f64,
    corners: [Coord; 4],
    env: Envelope,
    li: LineIntersector,
}

impl HotPixel {
    const TOLERANCE: f64 = 0.5;
    const SAFE_TOLERANCE: f64 = 0.75;

    #[must_use]
    pub fn new(pt: Coord, scale: f64) -> Self {
        let centre = Coord::new(scaled(pt.x, scale), scaled(pt.y, scale));
        let (min_x, max_x) = (centre.x - Self::TOLERANCE, centre.x + Self::TOLERANCE);
        let (min_y, max_y) = (centre.y - Self::TOLERANCE, centre.y + Self::TOLERANCE);
        Self {
            original: pt,
            centre,
            scale,
            corners: [
                Coord::new(max_x, max_y),
                Coord::new(min_x, max_y),
                Coord::new(min_x, min_y),
                Coord::new(max_x, min_y),
            ],
            env: Envelope::from_coords(&Coord::new(min_x, min_y), &Coord::new(max_x, max_y)),
            li: LineIntersector::default(),
        }
    }

    /// The point this pixel was created for.
    #[must_use]
    pub fn coordinate(&self) -> Coord {
        self.original
    }

    /// World-space envelope slightly larger than the pixel, used to query
    /// candidate segments.
    #[must_use]
    pub fn safe_envelope(&self) -> Envelope {
        let tol = Self::SAFE_TOLERANCE / self.scale;
        Envelope::from_coords(
            &Coord::new(self.original.x - tol, self.original.y - tol),
            &Coord::new(self.original.x + tol, self.original.y + tol),
        )
    }

    /// Returns `true` if segment `p0 -> p1` passes through the pixel.
    ///
    /// The pixel includes its left and bottom edges but not its top and
    /// right edges.
    pub fn intersects(&mut self, p0: &Coord, p1: &Coord) -> bool {
        let p0 = Coord::new(scaled(p0.x, self.scale), scaled(p0.y, self.scale));
        let p1 = Coord::new(scaled(p1.x, self.scale), scaled(p1.y, self.scale));
        if !self.env.intersects(&Envelope::from_coords(&p0, &p1)) {
            return false;
        }
        self.intersects_tolerance_square(&p0, &p1)
    }

    fn intersects_tolerance_square(&mut self, p0: &Coord, p1: &Coord) -> bool {
        let mut intersects_left = false;
        let mut intersects_bottom = false;

        for i in 0..4 {
            let (c0, c1) = (self.corners[i], self.corners[(i + 1) % 4]);
            self.li.compute_intersection(p0, p1, &c0, &c1);
            if self.li.is_proper() {
                return true;
            }
            match i {
                1 => intersects_left = self.li.has_intersection(),
                2 => intersects_bottom = self.li.has_intersection(),
                _ => {}
            }
        }

        if intersects_left && intersects_bottom {
            return true;
        }
        *p0 == self.centre || *p1 == self.centre
    }

    /// Adds a node at this pixel's point to segment `segment_index` of
    /// `string` if the segment passes through the pixel.
    pub fn add_snapped_node<D: Clone>(&mut self, string: &mut NodedSegmentString<D>, segment_index: usize) -> bool {
        let pts = string.coords();
        let (p0, p1) = (pts[segment_index], pts[segment_index + 1]);
        if self.intersects(&p0, &p1) {
            string.add_intersection(self.original, segment_index);
            return true;
        }
        false
    }
}

/// Snaps `pixel` into every indexed segment that passes through it, except
/// the segment `exclude` it originates from. Returns `true` if a node was
/// added.
fn snap<D: Clone>(
    index: &McIndex,
    strings: &mut [NodedSegmentString<D>],
    pixel: &mut HotPixel,
    exclude: Option<(usize, usize)>,
) -> bool {
    let mut candidates = Vec::new();
    index.select_segments(strings, &pixel.safe_envelope(), &mut |s, i| {
        if exclude != Some((s, i)) {
            candidates.push((s, i));
        }
    });
    let mut is_node_added = false;
    for (s, i) in candidates {
        is_node_added |= pixel.add_snapped_node(&mut strings[s], i);
    }
    is_node_added
}

/// Noder that snap-rounds its input to the grid of a fixed precision
/// model with the given scale.
#[derive(Debug, Clone)]
pub struct SnapRoundingNoder {
    pm: PrecisionModel,
    scale: f64,
}

impl SnapRoundingNoder {
    #[must_use]
    pub fn new(scale: f64) -> Self {
        Self {
            pm: PrecisionModel::fixed(scale),
            scale,
        }
    }

    #[must_use]
    pub fn precision(&self) -> &PrecisionModel {
        &self.pm
    }
}

impl<D: Clone> Noder<D> for SnapRoundingNoder {
    fn compute_nodes(&mut self, strings: Vec<NodedSegmentString<D>>) -> Vec<NodedSegmentString<D>> {
        // Step 1: round every vertex to the grid.
        let mut strings: Vec<NodedSegmentString<D>> = strings
            .into_iter()
            .map(|s| {
                let rounded: Vec<Coord> = s.coords().iter().map(|c| self.pm.make_precise_coord(c)).collect();
                NodedSegmentString::new(remove_repeated_points(&rounded), s.data().clone())
            })
            .collect();

        // Step 2: find and add the interior intersections.
        let index = McIndex::build(&strings);
        let mut finder = InteriorIntersectionFinderAdder::new(LineIntersector::new(self.pm));
        for (s0, i0, s1, i1) in index.overlapping_segments(&strings) {
            finder.process_intersections(&mut strings, s0, i0, s1, i1);
        }
        let intersections = finder.into_interior_intersections();
        trace!(count = intersections.len(), scale = self.scale, "snap-rounding intersections");

        // Step 3: snap segments to intersection pixels.
        for pt in intersections {
            let mut pixel = HotPixel::new(pt, self.scale);
            snap(&index, &mut strings, &mut pixel, None);
        }

        // Step 4: snap segments to vertex pixels.
        for s in 0..strings.len() {
            let pts = strings[s].coords().to_vec();
            for (i, pt) in pts.iter().enumerate().take(pts.len().saturating_sub(1)) {
                let mut pixel = HotPixel::new(*pt, self.scale);
                if snap(&index, &mut strings, &mut pixel, Some((s, i))) {
                    strings[s].add_intersection(*pt, i);
                }
            }
        }

        NodedSegmentString::noded_substrings(strings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn pixel_includes_left_and_bottom_edges() {
        let mut pixel = HotPixel::new(c(2.0, 2.0), 1.0);
        // Passes through the centre.
        assert!(pixel.intersects(&c(0.0, 0.0), &c(4.0, 4.0)));
        // Entirely above the pixel.
        assert!(!pixel.intersects(&c(0.0, 4.0), &c(4.0, 4.0)));
        // Vertex at the centre.
        assert!(pixel.intersects(&c(2.0, 2.0), &c(5.0, 7.0)));
    }

    #[test]
    fn pixel_tests_in_scaled_space() {
        let mut pixel = HotPixel::new(c(0.2, 0.2), 10.0);
        assert!(pixel.intersects(&c(0.0, 0.21), &c(1.0, 0.21)));
        assert!(!pixel.intersects(&c(0.0, 0.5), &c(1.0, 0.5)));
        let env = pixel.safe_envelope();
        assert!((env.width() - 0.15).abs() < 1e-12);
    }

    #[test]
    fn crossing_is_snapped_to_grid() {
        let strings = vec![
            NodedSegmentString::new(vec![c(0.0, 0.0), c(10.0, 3.0)], 0),
            NodedSegmentString::new(vec![c(0.0, 3.0), c(10.0, 0.0)], 1),
        ];
        let mut noder = SnapRoundingNoder::new(1.0);
        let parts = noder.compute_nodes(strings);
        assert_eq!(parts.len(), 4);
        for p in &parts {
            for q in p.coords() {
                assert_eq!(q.x, q.x.round());
                assert_eq!(q.y, q.y.round());
            }
        }
        // The crossing at (5, 1.5) rounds half-up to (5, 2).
        assert!(parts.iter().all(|p| p.coords().contains(&c(5.0, 2.0))));
    }

    #[test]
    fn vertex_near_segment_becomes_node() {
        // The second string's start rounds onto the first string's pixel path.
        let strings = vec![
            NodedSegmentString::new(vec![c(0.0, 0.0), c(10.0, 0.0)], ()),
            NodedSegmentString::new(vec![c(5.2, 0.3), c(5.0, 8.0)], ()),
        ];
        let mut noder = SnapRoundingNoder::new(1.0);
        let parts = noder.compute_nodes(strings);
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().any(|p| p.coords() == [c(0.0, 0.0), c(5.0, 0.0)]));
    }

    #[test]
    fn collapsed_string_yields_nothing() {
        let strings = vec![NodedSegmentString::new(vec![c(0.1, 0.1), c(0.2, 0.3)], ())];
        let mut noder = SnapRoundingNoder::new(1.0);
        assert!(noder.compute_nodes(strings).is_empty());
    }
}
