//! TariffCore: Customs Nomenclature Search Engine
//!
//! A Rust/WASM engine for browsing a hierarchical customs tariff entirely
//! client-side. The tree is loaded once; every query after that is a
//! synchronous pass over pre-folded records.
//!
//! # Architecture
//!
//! ## Catalog
//! - `node.rs` - CategoryNode: lenient decoding of the nested JSON tree
//! - `flatten.rs` - Catalog: pre-order flat records + parent/children/subtree indexes
//! - `stats.rs` - DatasetStats: hierarchy shape and enrichment coverage
//!
//! ## Search
//! - `normalize.rs` - Case/diacritic folding with offsets back to the original text
//! - `query.rs` - Query: exact / wildcard / numeric / fuzzy classification
//! - `matcher.rs` - Per-mode matchers (Aho-Corasick word-AND, weighted edit distance)
//! - `engine.rs` - SearchIndex: query → directly matched records
//! - `expand.rs` - Context expansion with ancestors and descendants
//! - `highlight.rs` - Match spans over the original display text
//!
//! ## Browser
//! - `debounce.rs` - Cancellable single-slot timer
//! - `view.rs` - Browser: debounced input → view snapshot → row windows
//! - `wasm.rs` - TariffBrowser: JS bindings
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { TariffBrowser } from 'tariffcore';
//!
//! await init();
//!
//! const browser = new TariffBrowser(treeJson, undefined);
//! browser.applyQuery('"cai"');
//! console.log(browser.matchedCount(), browser.visibleCount());
//! console.log(browser.rows(0, 50, 'ro'));   // code/name cells with highlight spans
//! console.log(browser.breadcrumb(42, 'en')); // "Live animals > Horses"
//! ```

pub mod error;
pub mod catalog;
pub mod search;
pub mod browser;

pub use error::CatalogError;
pub use catalog::*;
pub use search::*;
pub use browser::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("tariffcore v{}", env!("CARGO_PKG_VERSION"))
}
