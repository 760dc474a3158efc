#![allow(clippy::unwrap_used)]

mod common;

use common::{init_tracing, polygon, square};
use planar_buffer::geometry::{Geometry, Polygon};
use planar_buffer::operations::query::IsValid;
use planar_buffer::operations::union::CascadedPolygonUnion;
use planar_buffer::{cascaded_union, union};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_squares(seed: u64, count: usize) -> Vec<Polygon> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let x = rng.random_range(0.0..40.0);
            let y = rng.random_range(0.0..40.0);
            let size = rng.random_range(2.0..10.0);
            square(x, y, size)
        })
        .collect()
}

#[test]
fn empty_input_has_no_union() {
    assert!(cascaded_union(&[]).unwrap().is_none());
}

#[test]
fn cascaded_matches_sequential_union() {
    init_tracing();
    for seed in [1, 2, 3] {
        let polys = random_squares(seed, 25);
        let cascaded = cascaded_union(&polys).unwrap().unwrap();
        let sequential = polys
            .iter()
            .skip(1)
            .fold(polygon(polys[0].clone()), |acc, p| union(&acc, &polygon(p.clone())).unwrap());
        let (a, b) = (cascaded.area(), sequential.area());
        assert!((a - b).abs() <= 1e-6 * b.max(1.0), "seed {seed}: {a} vs {b}");
        assert_eq!(cascaded.polygons().len(), sequential.polygons().len(), "seed {seed}");
        assert!(IsValid::new(&cascaded).execute().unwrap());
    }
}

#[test]
fn union_is_deterministic() {
    let polys = random_squares(9, 30);
    let first = CascadedPolygonUnion::new(&polys).execute().unwrap();
    let second = CascadedPolygonUnion::new(&polys).execute().unwrap();
    assert_eq!(first, second);
}

#[test]
fn union_never_shrinks_inputs() {
    let polys = random_squares(5, 12);
    let out = cascaded_union(&polys).unwrap().unwrap();
    let largest = polys.iter().map(Polygon::area).fold(0.0, f64::max);
    let total: f64 = polys.iter().map(Polygon::area).sum();
    assert!(out.area() >= largest - 1e-9);
    assert!(out.area() <= total + 1e-9);
    assert!(matches!(out, Geometry::Polygon(_) | Geometry::MultiPolygon(_)));
}
