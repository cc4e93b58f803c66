use serde::{Deserialize, Serialize};

/// One row of the curated pairing table: a known catalog item, its category,
/// and the items it commonly accompanies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeEntry {
    /// Canonical item name (case-insensitive key)
    pub item: String,

    /// Category tag, e.g. "Beverages" or "Snacks"
    #[serde(alias = "type")]
    pub category: String,

    /// Free-text taste descriptor, used for display only
    #[serde(default)]
    pub taste_profile: String,

    /// Association targets, strongest first
    pub pairs_well_with: Vec<String>,

    /// Human-readable justification shown alongside recommendations
    pub reason: String,
}

/// A menu row as the persistence layer sees it right now.
///
/// Supplied by the caller on every request; only rows with
/// `availability == true` are eligible recommendation outputs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItemSnapshot {
    pub id: i64,
    pub item_name: String,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub availability: bool,
}

/// Which strategy produced a recommendation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationSource {
    /// Popularity/diversity fallback (weakest)
    Popularity,
    /// Shares a menu category with a cart item
    CategoryAffinity,
    /// Embedding similarity over the knowledge corpus
    Semantic,
    /// Direct curated pairing (strongest)
    Association,
}

/// A ranked recommendation returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub item_id: i64,
    pub item_name: String,
    pub price: f64,
    pub category: String,
    pub description: String,
    pub recommendation_score: f64,
    pub reason: String,
    pub source: RecommendationSource,
}

/// Introspection view of a knowledge entry, exposed for debugging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssociationInfo {
    pub category: String,
    pub pairs_with: Vec<String>,
    pub reason: String,
}

impl From<&KnowledgeEntry> for AssociationInfo {
    fn from(entry: &KnowledgeEntry) -> Self {
        Self {
            category: entry.category.clone(),
            pairs_with: entry.pairs_well_with.clone(),
            reason: entry.reason.clone(),
        }
    }
}
