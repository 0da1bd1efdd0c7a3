mod digest;
mod path;
mod tree_stringify;

pub use digest::*;
pub use path::*;
pub use tree_stringify::*;
