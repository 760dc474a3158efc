#![allow(clippy::unwrap_used)]

mod common;

use approx::assert_abs_diff_eq;
use common::{c, init_tracing, polygon, square};
use planar_buffer::algorithm::ring;
use planar_buffer::geometry::{Geometry, LineString, Polygon};
use planar_buffer::math::PrecisionModel;
use planar_buffer::operations::buffer::{BufferOp, BufferParameters, EndCapStyle};
use planar_buffer::operations::query::IsValid;
use planar_buffer::{buffer, BufferError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn default_buffer(geom: &Geometry, distance: f64) -> Result<Geometry, BufferError> {
    buffer(geom, distance, &BufferParameters::default())
}

fn l_shape() -> Polygon {
    Polygon::from_rings(vec![vec![
        c(0.0, 0.0),
        c(0.0, 6.0),
        c(2.0, 6.0),
        c(2.0, 2.0),
        c(6.0, 2.0),
        c(6.0, 0.0),
        c(0.0, 0.0),
    ]])
    .unwrap()
}

#[test]
fn zero_buffer_keeps_valid_polygon() {
    init_tracing();
    let input = l_shape();
    let out = default_buffer(&polygon(input.clone()), 0.0).unwrap();
    let polys = out.polygons();
    assert_eq!(polys.len(), 1);
    assert_abs_diff_eq!(out.area(), input.area(), epsilon = 1e-12);

    let mut expected: Vec<(f64, f64)> = input.exterior().coords().iter().map(|p| (p.x, p.y)).collect();
    let mut actual: Vec<(f64, f64)> = polys[0].exterior().coords().iter().map(|p| (p.x, p.y)).collect();
    expected.pop();
    actual.pop();
    expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
    actual.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(actual, expected);
}

#[test]
fn shells_are_clockwise_and_holes_counter_clockwise() {
    init_tracing();
    let with_hole = Polygon::from_rings(vec![
        vec![c(0.0, 0.0), c(0.0, 20.0), c(20.0, 20.0), c(20.0, 0.0), c(0.0, 0.0)],
        vec![c(5.0, 5.0), c(15.0, 5.0), c(15.0, 15.0), c(5.0, 15.0), c(5.0, 5.0)],
    ])
    .unwrap();
    for distance in [-1.0, 0.0, 1.0] {
        let out = default_buffer(&polygon(with_hole.clone()), distance).unwrap();
        let polys = out.polygons();
        assert_eq!(polys.len(), 1, "distance {distance}");
        assert!(!ring::is_ccw(polys[0].exterior().coords()));
        assert_eq!(polys[0].interiors().len(), 1, "distance {distance}");
        assert!(ring::is_ccw(polys[0].interiors()[0].coords()));
    }
}

fn square_with_hole(ccw: bool) -> Polygon {
    let mut shell = vec![c(0.0, 0.0), c(0.0, 10.0), c(10.0, 10.0), c(10.0, 0.0), c(0.0, 0.0)];
    let mut hole = vec![c(4.0, 4.0), c(6.0, 4.0), c(6.0, 6.0), c(4.0, 6.0), c(4.0, 4.0)];
    if ccw {
        shell.reverse();
        hole.reverse();
    }
    Polygon::from_rings(vec![shell, hole]).unwrap()
}

#[test]
fn holes_shrink_outward_and_grow_inward() {
    init_tracing();
    // Area of the 32-gon approximating a unit circle.
    let unit_circle = 16.0 * (std::f64::consts::PI / 16.0).sin();
    for ccw in [false, true] {
        let input = polygon(square_with_hole(ccw));

        let grown = default_buffer(&input, 0.5).unwrap();
        let polys = grown.polygons();
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0].interiors().len(), 1);
        assert_abs_diff_eq!(ring::signed_area(polys[0].interiors()[0].coords()).abs(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(grown.area(), 120.0 + 0.25 * unit_circle - 1.0, epsilon = 1e-6);

        let shrunk = default_buffer(&input, -1.0).unwrap();
        let polys = shrunk.polygons();
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0].interiors().len(), 1);
        let hole_area = ring::signed_area(polys[0].interiors()[0].coords()).abs();
        assert_abs_diff_eq!(hole_area, 4.0 + 8.0 + unit_circle, epsilon = 1e-6);
        assert_abs_diff_eq!(shrunk.area(), 64.0 - hole_area, epsilon = 1e-9);

        assert!(default_buffer(&input, -3.5).unwrap().is_empty(), "ccw {ccw}");
    }
}

#[test]
fn large_buffer_fills_hole() {
    let with_hole = Polygon::from_rings(vec![
        vec![c(0.0, 0.0), c(0.0, 20.0), c(20.0, 20.0), c(20.0, 0.0), c(0.0, 0.0)],
        vec![c(5.0, 5.0), c(15.0, 5.0), c(15.0, 15.0), c(5.0, 15.0), c(5.0, 5.0)],
    ])
    .unwrap();
    let out = default_buffer(&polygon(with_hole), 6.0).unwrap();
    assert!(out.polygons()[0].interiors().is_empty());
}

#[test]
fn triangle_erodes_at_incircle_radius() {
    // The 3-4-5 right triangle has inradius 1.
    let tri = polygon(Polygon::from_rings(vec![vec![c(0.0, 0.0), c(0.0, 4.0), c(3.0, 0.0), c(0.0, 0.0)]]).unwrap());
    assert!(default_buffer(&tri, -1.001).unwrap().is_empty());
    let inner = default_buffer(&tri, -0.5).unwrap();
    assert!(!inner.is_empty());
    assert!(inner.area() < 6.0);
}

#[test]
fn round_cap_has_two_q_segments() {
    let line = Geometry::LineString(LineString::new(vec![c(0.0, 0.0), c(10.0, 0.0)]).unwrap());
    for q in [2, 4, 8] {
        let params = BufferParameters::default().with_quadrant_segments(q);
        let out = buffer(&line, 1.0, &params).unwrap();
        let shell = out.polygons()[0].exterior().coords().len();
        let q = usize::try_from(q).unwrap();
        // Two caps of 2Q segments joined by the two straight sides, closed.
        assert_eq!(shell, 2 * (2 * q + 1) + 1, "q = {q}");
    }
}

#[test]
fn flat_and_square_caps_bound_the_round_cap() {
    let line = Geometry::LineString(LineString::new(vec![c(0.0, 0.0), c(10.0, 0.0)]).unwrap());
    let area_of = |cap| {
        buffer(&line, 1.0, &BufferParameters::default().with_end_cap(cap))
            .unwrap()
            .area()
    };
    let (flat, round, square) = (area_of(EndCapStyle::Flat), area_of(EndCapStyle::Round), area_of(EndCapStyle::Square));
    assert_abs_diff_eq!(flat, 20.0, epsilon = 1e-9);
    assert_abs_diff_eq!(square, 24.0, epsilon = 1e-9);
    assert!(flat < round && round < square);
}

#[test]
fn fixed_input_precision_rounds_output() {
    init_tracing();
    let geom = polygon(square(0.0, 0.0, 10.0));
    let mut op = BufferOp::new(&geom).with_precision(PrecisionModel::fixed(10.0));
    let out = op.execute(1.0).unwrap();
    out.polygons()[0].exterior().coords().iter().for_each(|p| {
        assert_abs_diff_eq!(p.x * 10.0, (p.x * 10.0).round(), epsilon = 1e-9);
        assert_abs_diff_eq!(p.y * 10.0, (p.y * 10.0).round(), epsilon = 1e-9);
    });
    assert_eq!(op.last_precision_digits(), None);
}

#[test]
fn buffered_random_polygons_are_valid() {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let polys: Vec<Polygon> = (0..4)
            .map(|_| {
                let x = rng.random_range(0.0..20.0);
                let y = rng.random_range(0.0..20.0);
                let size = rng.random_range(1.0..8.0);
                square(x, y, size)
            })
            .collect();
        let distance = rng.random_range(-0.5..2.0);
        let out = default_buffer(&Geometry::MultiPolygon(polys), distance).unwrap();
        assert!(IsValid::new(&out).execute().unwrap(), "distance {distance}");
    }
}
