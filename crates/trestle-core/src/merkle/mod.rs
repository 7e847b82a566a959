pub mod proof;
pub mod tree;

pub use proof::*;
pub use tree::*;
