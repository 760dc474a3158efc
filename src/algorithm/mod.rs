pub mod line_intersector;
pub mod locate;
pub mod ring;

pub use line_intersector::{IntersectionKind, LineIntersector};
