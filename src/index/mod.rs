pub mod monotone_chain;
pub mod strtree;

pub use monotone_chain::MonotoneChain;
pub use strtree::{ItemTree, StrTree};
