use crate::math::{orientation_index, Coord};
use crate::topology::Location;

/// Signed area of a ring by the shoelace formula.
///
/// Positive for counter-clockwise rings, negative for clockwise rings.
#[must_use]
pub fn signed_area(ring: &[Coord]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let x0 = ring[0].x;
    let mut sum = 0.0;
    for i in 1..ring.len() - 1 {
        let x = ring[i].x - x0;
        let y1 = ring[i + 1].y;
        let y2 = ring[i - 1].y;
        sum += x * (y2 - y1);
    }
    -sum / 2.0
}

/// Tests whether a closed ring is oriented counter-clockwise.
///
/// Uses the orientation at the highest vertex, so it is correct even for
/// rings with collinear or repeated points. Rings with fewer than four
/// points, or flat rings, report `false`.
#[must_use]
pub fn is_ccw(ring: &[Coord]) -> bool {
    if ring.len() < 4 {
        return false;
    }
    let n_pts = ring.len() - 1;

    // Highest point, first one found wins.
    let mut hi_index = 0;
    for i in 1..=n_pts {
        if ring[i].y > ring[hi_index].y {
            hi_index = i;
        }
    }
    let hi_pt = ring[hi_index];

    // Distinct point before the highest point.
    let mut i_prev = hi_index;
    loop {
        i_prev = if i_prev == 0 { n_pts } else { i_prev - 1 };
        if ring[i_prev] != hi_pt || i_prev == hi_index {
            break;
        }
    }

    // Distinct point after the highest point.
    let mut i_next = hi_index;
    loop {
        i_next = (i_next + 1) % n_pts;
        if ring[i_next] != hi_pt || i_next == hi_index {
            break;
        }
    }

    let prev = ring[i_prev];
    let next = ring[i_next];
    if prev == hi_pt || next == hi_pt || prev == next {
        return false;
    }

    let disc = orientation_index(&prev, &hi_pt, &next);
    if disc == 0 {
        // Collinear: the ring is CCW if prev lies to the right of next.
        prev.x > next.x
    } else {
        disc > 0
    }
}

/// Locates a point relative to a closed ring by ray crossing.
///
/// Returns [`Location::Boundary`] for points on the ring.
#[must_use]
pub fn locate_point_in_ring(p: &Coord, ring: &[Coord]) -> Location {
    let mut crossings = 0_usize;
    for i in 1..ring.len() {
        let p1 = &ring[i];
        let p2 = &ring[i - 1];

        if p1.x < p.x && p2.x < p.x {
            continue;
        }
        if p == p2 {
            return Location::Boundary;
        }
        if p1.y == p.y && p2.y == p.y {
            let min_x = p1.x.min(p2.x);
            let max_x = p1.x.max(p2.x);
            if p.x >= min_x && p.x <= max_x {
                return Location::Boundary;
            }
            continue;
        }
        if (p1.y > p.y && p2.y <= p.y) || (p2.y > p.y && p1.y <= p.y) {
            let mut sign = orientation_index(p, p1, p2);
            if sign == 0 {
                return Location::Boundary;
            }
            if p2.y < p1.y {
                sign = -sign;
            }
            if sign > 0 {
                crossings += 1;
            }
        }
    }
    if crossings % 2 == 1 {
        Location::Interior
    } else {
        Location::Exterior
    }
}

/// Returns `true` if the point is inside or on the ring.
#[must_use]
pub fn is_point_in_ring(p: &Coord, ring: &[Coord]) -> bool {
    locate_point_in_ring(p, ring) != Location::Exterior
}
