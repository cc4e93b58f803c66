//! # Canteen Catalog
//!
//! Domain types and the curated pairing knowledge base for the canteen
//! recommendation engine.
//!
//! ## Example
//!
//! ```
//! use canteen_catalog::KnowledgeBase;
//!
//! let kb = KnowledgeBase::builtin();
//! let tea = kb.get("tea").expect("bundled table knows tea");
//! assert!(tea.pairs_well_with.contains(&"Biscuits".to_string()));
//! ```

mod error;
mod knowledge;
mod types;

pub use error::{CatalogError, Result};
pub use knowledge::KnowledgeBase;
pub use types::{
    AssociationInfo, KnowledgeEntry, MenuItemSnapshot, Recommendation, RecommendationSource,
};
