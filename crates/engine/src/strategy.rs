use crate::hybrid::HybridRecommender;
use crate::rule::RecommendationEngine;
use canteen_catalog::{AssociationInfo, KnowledgeBase, MenuItemSnapshot, Recommendation};

/// Which retrieval strategy the composition root wires in. Resolved once at
/// startup from configuration, never probed at request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    #[default]
    RuleBased,
    Hybrid,
}

/// The recommendation contract served to collaborators. Implementations are
/// best-effort: they return an empty list rather than erroring, so a data
/// problem can never abort an order flow.
pub trait RecommendStrategy: Send + Sync {
    fn recommend(
        &self,
        cart_items: &[String],
        available_items: &[MenuItemSnapshot],
        max_recommendations: usize,
    ) -> Vec<Recommendation>;

    fn association_info(&self, item_name: &str) -> Option<AssociationInfo>;
}

impl RecommendStrategy for RecommendationEngine {
    fn recommend(
        &self,
        cart_items: &[String],
        available_items: &[MenuItemSnapshot],
        max_recommendations: usize,
    ) -> Vec<Recommendation> {
        RecommendationEngine::recommend(self, cart_items, available_items, max_recommendations)
    }

    fn association_info(&self, item_name: &str) -> Option<AssociationInfo> {
        RecommendationEngine::association_info(self, item_name)
    }
}

impl RecommendStrategy for HybridRecommender {
    fn recommend(
        &self,
        cart_items: &[String],
        available_items: &[MenuItemSnapshot],
        max_recommendations: usize,
    ) -> Vec<Recommendation> {
        HybridRecommender::recommend(self, cart_items, available_items, max_recommendations)
    }

    fn association_info(&self, item_name: &str) -> Option<AssociationInfo> {
        HybridRecommender::association_info(self, item_name)
    }
}

/// Build the configured strategy from a knowledge base.
pub fn build_strategy(kind: StrategyKind, knowledge: KnowledgeBase) -> Box<dyn RecommendStrategy> {
    match kind {
        StrategyKind::RuleBased => Box::new(RecommendationEngine::new(knowledge)),
        StrategyKind::Hybrid => Box::new(HybridRecommender::from_knowledge(knowledge)),
    }
}
