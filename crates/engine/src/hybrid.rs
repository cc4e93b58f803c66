use crate::rule::RecommendationEngine;
use crate::semantic::SemanticRecommender;
use canteen_catalog::{AssociationInfo, KnowledgeBase, MenuItemSnapshot, Recommendation};
use std::collections::HashSet;

/// Rule-based results first, semantic results filling the remaining slots.
///
/// Association-sourced results always win a duplicate menu id. A missing or
/// failing semantic path degrades to the rule-based output alone; it never
/// surfaces to the caller.
pub struct HybridRecommender {
    rule: RecommendationEngine,
    semantic: Option<SemanticRecommender>,
}

impl HybridRecommender {
    pub fn new(rule: RecommendationEngine, semantic: Option<SemanticRecommender>) -> Self {
        Self { rule, semantic }
    }

    /// Build both strategies from one knowledge base. Semantic construction
    /// failure is logged and leaves the rule-based path on its own.
    pub fn from_knowledge(knowledge: KnowledgeBase) -> Self {
        let semantic = match SemanticRecommender::from_knowledge(&knowledge) {
            Ok(semantic) => Some(semantic),
            Err(err) => {
                log::warn!("Semantic strategy unavailable: {err}; using rule-based only");
                None
            }
        };
        Self {
            rule: RecommendationEngine::new(knowledge),
            semantic,
        }
    }

    pub fn recommend(
        &self,
        cart_items: &[String],
        available_items: &[MenuItemSnapshot],
        max_recommendations: usize,
    ) -> Vec<Recommendation> {
        let mut merged = self
            .rule
            .recommend(cart_items, available_items, max_recommendations);

        let Some(semantic) = &self.semantic else {
            return merged;
        };
        if merged.len() >= max_recommendations {
            return merged;
        }

        match semantic.recommend(cart_items, available_items, max_recommendations) {
            Ok(semantic_recs) => {
                let seen_ids: HashSet<i64> = merged.iter().map(|r| r.item_id).collect();
                for rec in semantic_recs {
                    if merged.len() >= max_recommendations {
                        break;
                    }
                    if seen_ids.contains(&rec.item_id) {
                        continue;
                    }
                    merged.push(rec);
                }
            }
            Err(err) => {
                log::warn!("Semantic recommendation failed: {err}; keeping rule-based output");
            }
        }

        merged
    }

    pub fn association_info(&self, item_name: &str) -> Option<AssociationInfo> {
        self.rule.association_info(item_name)
    }
}
