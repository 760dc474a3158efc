use super::Coord;

/// Returns the minimum distance from `p` to the line segment `a -> b`.
#[must_use]
pub fn point_to_segment(p: &Coord, a: &Coord, b: &Coord) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq == 0.0 {
        // Degenerate segment (zero length).
        return (p - a).norm();
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    let closest = a + d * t;
    (p - closest).norm()
}
