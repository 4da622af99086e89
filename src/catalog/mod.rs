pub mod node;
pub mod flatten;
pub mod stats;

pub use node::*;
pub use flatten::*;
pub use stats::*;
