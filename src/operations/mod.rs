pub mod buffer;
pub mod query;
pub mod union;
