//! Presentation-facing pipeline: debounced input, view snapshots, JS bindings

pub mod debounce;
pub mod view;
pub mod wasm;

pub use debounce::*;
pub use view::*;
pub use wasm::*;
