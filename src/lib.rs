pub mod algorithm;
pub mod error;
pub mod geometry;
pub mod index;
pub mod math;
pub mod noding;
pub mod operations;
pub mod topology;

pub use error::{BufferError, Result};
pub use operations::buffer::{buffer, BufferOp, BufferParameters};
pub use operations::union::{cascaded_union, union};
