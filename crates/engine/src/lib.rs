//! # Canteen Engine
//!
//! Item-association recommendation engine: given the current cart contents
//! and the live menu snapshot, propose additional items using a curated
//! pairing table, category affinity, and a popularity fallback, merged and
//! ranked under score/slot constraints.
//!
//! ## Strategies
//!
//! - [`RecommendationEngine`] — the default rule-based engine
//! - [`SemanticRecommender`] — optional embedding-similarity retrieval over
//!   the knowledge corpus
//! - [`HybridRecommender`] — rule-based output first, semantic fill-in
//!
//! All strategies share one contract ([`RecommendStrategy`]): no cart item
//! is ever recommended back, every output row is available on the supplied
//! menu, output is deduplicated by menu id and sorted by score descending
//! with name ascending as tie-break.
//!
//! ## Example
//!
//! ```
//! use canteen_engine::RecommendationEngine;
//! use canteen_catalog::MenuItemSnapshot;
//!
//! let engine = RecommendationEngine::with_builtin_knowledge();
//! let menu = vec![
//!     MenuItemSnapshot {
//!         id: 1,
//!         item_name: "Biscuits".into(),
//!         price: 10.0,
//!         category: "Snacks".into(),
//!         description: "Crispy biscuits".into(),
//!         availability: true,
//!     },
//! ];
//!
//! let recs = engine.recommend(&["Tea".into()], &menu, 5);
//! assert_eq!(recs[0].item_name, "Biscuits");
//! ```

mod candidates;
mod error;
mod hybrid;
mod rule;
mod semantic;
mod strategy;

pub use candidates::{
    CandidatePool, ASSOCIATION_BASE, ASSOCIATION_POSITION_BONUS, CATEGORY_AFFINITY_SCORE,
    POPULARITY_SCORE,
};
pub use error::{EngineError, Result};
pub use hybrid::HybridRecommender;
pub use rule::RecommendationEngine;
pub use semantic::{CosineIndex, SemanticRecommender, TextEmbedder};
pub use strategy::{build_strategy, RecommendStrategy, StrategyKind};

// Re-export catalog types for convenience
pub use canteen_catalog::{
    AssociationInfo, KnowledgeBase, KnowledgeEntry, MenuItemSnapshot, Recommendation,
    RecommendationSource,
};
