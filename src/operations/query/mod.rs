mod area;
mod bounding_box;
mod is_valid;

pub use area::Area;
pub use bounding_box::BoundingBox;
pub use is_valid::IsValid;
