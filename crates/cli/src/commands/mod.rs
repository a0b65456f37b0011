pub mod runs;
pub mod slice;

pub use runs::*;
pub use slice::*;
