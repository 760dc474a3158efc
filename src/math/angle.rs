use std::f64::consts::PI;

use super::Coord;

/// Angle of the vector `p0 -> p1` from the positive x-axis, in `(-PI, PI]`.
#[must_use]
pub fn angle(p0: &Coord, p1: &Coord) -> f64 {
    (p1.y - p0.y).atan2(p1.x - p0.x)
}

/// Normalizes an angle into the range `(-PI, PI]`.
#[must_use]
pub fn normalize(mut angle: f64) -> f64 {
    while angle > PI {
        angle -= 2.0 * PI;
    }
    while angle <= -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Signed angle from `tail -> tip1` to `tail -> tip2`, in `(-PI, PI]`.
///
/// Positive values are counter-clockwise turns.
#[must_use]
pub fn angle_between_oriented(tip1: &Coord, tail: &Coord, tip2: &Coord) -> f64 {
    let a1 = angle(tail, tip1);
    let a2 = angle(tail, tip2);
    let delta = a2 - a1;
    if delta <= -PI {
        return delta + 2.0 * PI;
    }
    if delta > PI {
        return delta - 2.0 * PI;
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn normalize_wraps() {
        assert_relative_eq!(normalize(3.0 * PI), PI, epsilon = 1e-12);
        assert_relative_eq!(normalize(-PI), PI, epsilon = 1e-12);
        assert_relative_eq!(normalize(0.5), 0.5);
    }

    #[test]
    fn oriented_angle_sign() {
        let tail = Coord::new(0.0, 0.0);
        let east = Coord::new(1.0, 0.0);
        let north = Coord::new(0.0, 1.0);
        assert_relative_eq!(angle_between_oriented(&east, &tail, &north), FRAC_PI_2);
        assert_relative_eq!(angle_between_oriented(&north, &tail, &east), -FRAC_PI_2);
    }
}
