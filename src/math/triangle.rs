use super::{distance, Coord};

/// Incentre of the triangle `a, b, c`: the centre of its inscribed circle.
///
/// Each vertex is weighted by the length of the opposite side.
#[must_use]
pub fn in_centre(a: &Coord, b: &Coord, c: &Coord) -> Coord {
    let len0 = distance(b, c);
    let len1 = distance(a, c);
    let len2 = distance(a, b);
    let circum = len0 + len1 + len2;
    Coord::new(
        (len0 * a.x + len1 * b.x + len2 * c.x) / circum,
        (len0 * a.y + len1 * b.y + len2 * c.y) / circum,
    )
}
