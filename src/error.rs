//! Document-level load errors.
//!
//! Only whole-document failures surface here. Defects inside individual
//! nodes are absorbed while decoding (see `catalog::node`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The document was absent or blank
    #[error("nomenclature document is empty")]
    EmptyDocument,

    /// The document is not valid JSON
    #[error("malformed nomenclature document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The document root is neither a list of nodes nor an object wrapping one
    #[error("expected a list of category nodes at the document root, found {found}")]
    NotAList { found: &'static str },
}
