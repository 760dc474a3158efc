#![allow(dead_code)]

use planar_buffer::geometry::{Geometry, Polygon};
use planar_buffer::math::Coord;
use tracing_subscriber::EnvFilter;

/// Installs a test subscriber honouring `RUST_LOG`; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn c(x: f64, y: f64) -> Coord {
    Coord::new(x, y)
}

/// Axis-aligned clockwise square.
#[allow(clippy::unwrap_used)]
pub fn square(x0: f64, y0: f64, size: f64) -> Polygon {
    Polygon::from_rings(vec![vec![
        c(x0, y0),
        c(x0, y0 + size),
        c(x0 + size, y0 + size),
        c(x0 + size, y0),
        c(x0, y0),
    ]])
    .unwrap()
}

pub fn polygon(p: Polygon) -> Geometry {
    Geometry::Polygon(p)
}
