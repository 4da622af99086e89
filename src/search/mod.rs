pub mod config;
pub mod normalize;
pub mod query;
pub mod matcher;
pub mod engine;
pub mod expand;
pub mod highlight;

pub use config::*;
pub use normalize::*;
pub use query::*;
pub use matcher::*;
pub use engine::*;
pub use expand::*;
pub use highlight::*;

#[cfg(test)]
mod tests;
