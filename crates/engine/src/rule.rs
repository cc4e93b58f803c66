use crate::candidates::{normalize, CandidatePool};
use canteen_catalog::{AssociationInfo, KnowledgeBase, MenuItemSnapshot, Recommendation};
use std::collections::{HashMap, HashSet};

/// The rule-based recommendation engine.
///
/// A pure function over the immutable knowledge base and the caller-supplied
/// cart/menu snapshots. No interior mutability, so a shared reference can be
/// used from any number of threads without coordination.
pub struct RecommendationEngine {
    knowledge: KnowledgeBase,
}

impl RecommendationEngine {
    pub fn new(knowledge: KnowledgeBase) -> Self {
        Self { knowledge }
    }

    /// Engine backed by the pairing table shipped with `canteen-catalog`.
    pub fn with_builtin_knowledge() -> Self {
        Self::new(KnowledgeBase::builtin())
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Propose up to `max_recommendations` items to add to the cart.
    ///
    /// Candidate generation walks each unique cart item: curated pairings
    /// where the knowledge base knows the item, same-category items where it
    /// does not. Short pools are padded with a popularity fallback before
    /// everything is filtered against the live menu, deduplicated by menu id
    /// and ranked.
    ///
    /// An empty cart or a zero cap short-circuits to an empty list; unknown
    /// cart names simply contribute no candidates.
    pub fn recommend(
        &self,
        cart_items: &[String],
        available_items: &[MenuItemSnapshot],
        max_recommendations: usize,
    ) -> Vec<Recommendation> {
        if cart_items.is_empty() || max_recommendations == 0 {
            return Vec::new();
        }

        // Unique cart names in first-seen order; duplicates must not
        // inflate association weight.
        let mut cart_names: HashSet<String> = HashSet::new();
        let mut cart_unique: Vec<(String, &str)> = Vec::new();
        for raw in cart_items {
            let key = normalize(raw);
            if key.is_empty() || !cart_names.insert(key.clone()) {
                continue;
            }
            cart_unique.push((key, raw.as_str()));
        }

        // First row wins when the menu repeats a name.
        let mut menu_by_name: HashMap<String, &MenuItemSnapshot> = HashMap::new();
        for row in available_items {
            menu_by_name.entry(normalize(&row.item_name)).or_insert(row);
        }

        let mut pool = CandidatePool::new();

        for (key, display_name) in &cart_unique {
            if let Some(entry) = self.knowledge.get(key) {
                let mut seen_targets: HashSet<String> = HashSet::new();
                for (position, target) in entry.pairs_well_with.iter().enumerate() {
                    if !seen_targets.insert(normalize(target)) {
                        continue;
                    }
                    pool.add_association(target, position, &entry.reason);
                }
            } else if let Some(row) = menu_by_name.get(key) {
                // Unknown to the knowledge base: fall back to items sharing
                // the cart item's menu category.
                let category = row.category.clone();
                for other in available_items {
                    if !other.availability {
                        continue;
                    }
                    if other.category != category {
                        continue;
                    }
                    let other_key = normalize(&other.item_name);
                    if cart_names.contains(&other_key) {
                        continue;
                    }
                    pool.add_category_affinity(
                        &other.item_name,
                        format!("From the same category as {display_name}"),
                    );
                }
            } else {
                log::debug!("Cart item '{display_name}' unknown to knowledge base and menu");
            }
        }

        // Pad thin pools with a deterministic popularity fallback, scanning
        // available items in ascending name order.
        if pool.len() < max_recommendations {
            let mut fallback: Vec<&MenuItemSnapshot> =
                available_items.iter().filter(|r| r.availability).collect();
            fallback.sort_by(|a, b| a.item_name.cmp(&b.item_name));

            for row in fallback {
                if pool.len() >= max_recommendations {
                    break;
                }
                let key = normalize(&row.item_name);
                if cart_names.contains(&key) || pool.contains(&key) {
                    continue;
                }
                pool.add_popularity(
                    &row.item_name,
                    "Popular with other orders".to_string(),
                );
            }
        }

        let results = pool.resolve(&cart_names, &menu_by_name, max_recommendations);
        log::debug!(
            "Rule-based engine: {} cart items -> {} recommendations",
            cart_unique.len(),
            results.len()
        );
        results
    }

    /// Case-insensitive knowledge lookup for debugging; `None` for unknown
    /// names, never an error.
    pub fn association_info(&self, item_name: &str) -> Option<AssociationInfo> {
        self.knowledge.get(item_name).map(AssociationInfo::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canteen_catalog::{KnowledgeEntry, RecommendationSource};
    use pretty_assertions::assert_eq;

    fn entry(item: &str, category: &str, pairs: &[&str], reason: &str) -> KnowledgeEntry {
        KnowledgeEntry {
            item: item.to_string(),
            category: category.to_string(),
            taste_profile: String::new(),
            pairs_well_with: pairs.iter().map(|s| s.to_string()).collect(),
            reason: reason.to_string(),
        }
    }

    fn menu_row(id: i64, name: &str, category: &str, available: bool) -> MenuItemSnapshot {
        MenuItemSnapshot {
            id,
            item_name: name.to_string(),
            price: 10.0,
            category: category.to_string(),
            description: format!("{name} description"),
            availability: available,
        }
    }

    fn tea_engine() -> RecommendationEngine {
        RecommendationEngine::new(KnowledgeBase::from_entries(vec![
            entry("Tea", "Beverages", &["Biscuits", "Samosa"], "Classic tea-time pairing"),
            entry("Coffee", "Beverages", &["Biscuits", "Sandwich"], "A coffee-break favourite"),
        ]))
    }

    fn cart(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_cart_returns_empty() {
        let engine = tea_engine();
        let menu = vec![menu_row(1, "Tea", "Beverages", true)];
        assert!(engine.recommend(&[], &menu, 5).is_empty());
    }

    #[test]
    fn zero_cap_returns_empty() {
        let engine = tea_engine();
        let menu = vec![menu_row(1, "Tea", "Beverages", true)];
        assert!(engine.recommend(&cart(&["Tea"]), &menu, 0).is_empty());
    }

    #[test]
    fn unavailable_pairing_is_excluded() {
        // Scenario: Tea pairs with Biscuits and Samosa, Samosa is sold out.
        let engine = tea_engine();
        let menu = vec![
            menu_row(1, "Tea", "Beverages", true),
            menu_row(2, "Biscuits", "Snacks", true),
            menu_row(3, "Samosa", "Snacks", false),
        ];

        let recs = engine.recommend(&cart(&["Tea"]), &menu, 5);
        let names: Vec<&str> = recs.iter().map(|r| r.item_name.as_str()).collect();
        assert_eq!(names, vec!["Biscuits"]);
        assert_eq!(recs[0].source, RecommendationSource::Association);
        assert_eq!(recs[0].reason, "Classic tea-time pairing");
    }

    #[test]
    fn dual_association_outranks_single() {
        let engine = tea_engine();
        let menu = vec![
            menu_row(1, "Tea", "Beverages", true),
            menu_row(2, "Coffee", "Beverages", true),
            menu_row(3, "Biscuits", "Snacks", true),
            menu_row(4, "Samosa", "Snacks", true),
            menu_row(5, "Sandwich", "Snacks", true),
        ];

        let single = engine.recommend(&cart(&["Tea"]), &menu, 5);
        let single_score = single
            .iter()
            .find(|r| r.item_name == "Biscuits")
            .unwrap()
            .recommendation_score;

        let dual = engine.recommend(&cart(&["Tea", "Coffee"]), &menu, 5);
        assert_eq!(dual[0].item_name, "Biscuits");
        assert!(dual[0].recommendation_score > single_score);
    }

    #[test]
    fn cart_items_are_never_recommended() {
        // Biscuits is Tea's top pairing but already sits in the cart.
        let engine = tea_engine();
        let menu = vec![
            menu_row(1, "Tea", "Beverages", true),
            menu_row(2, "Biscuits", "Snacks", true),
        ];

        let recs = engine.recommend(&cart(&["Tea", "Biscuits"]), &menu, 5);
        assert!(recs.iter().all(|r| r.item_name != "Biscuits"));
    }

    #[test]
    fn duplicate_cart_entries_do_not_boost() {
        let engine = tea_engine();
        let menu = vec![
            menu_row(1, "Tea", "Beverages", true),
            menu_row(2, "Biscuits", "Snacks", true),
        ];

        let once = engine.recommend(&cart(&["Tea"]), &menu, 5);
        let twice = engine.recommend(&cart(&["Tea", "tea", "TEA"]), &menu, 5);
        assert_eq!(once, twice);
    }

    #[test]
    fn cart_order_does_not_change_scores() {
        // Mystery Juice triggers category affinity for Biscuits before Tea's
        // association names it; the association score must stand alone either
        // way.
        let engine = RecommendationEngine::new(KnowledgeBase::from_entries(vec![entry(
            "Tea",
            "Beverages",
            &["Biscuits"],
            "Classic tea-time pairing",
        )]));
        let menu = vec![
            menu_row(1, "Tea", "Snacks", true),
            menu_row(2, "Mystery Juice", "Snacks", true),
            menu_row(3, "Biscuits", "Snacks", true),
        ];

        let forward = engine.recommend(&cart(&["Mystery Juice", "Tea"]), &menu, 5);
        let reversed = engine.recommend(&cart(&["Tea", "Mystery Juice"]), &menu, 5);
        assert_eq!(forward, reversed);

        let biscuits = forward
            .iter()
            .find(|r| r.item_name == "Biscuits")
            .expect("biscuits recommended");
        assert_eq!(biscuits.source, RecommendationSource::Association);
        assert_eq!(
            biscuits.recommendation_score,
            crate::ASSOCIATION_BASE + crate::ASSOCIATION_POSITION_BONUS
        );
    }

    #[test]
    fn unknown_cart_item_falls_back_to_category() {
        let engine = tea_engine();
        let menu = vec![
            menu_row(1, "Mystery Juice", "Beverages", true),
            menu_row(2, "Lassi", "Beverages", true),
            menu_row(3, "Samosa", "Snacks", true),
        ];

        let recs = engine.recommend(&cart(&["Mystery Juice"]), &menu, 1);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].item_name, "Lassi");
        assert_eq!(recs[0].source, RecommendationSource::CategoryAffinity);
    }

    #[test]
    fn unknown_everywhere_pads_with_popularity() {
        let engine = tea_engine();
        let menu = vec![
            menu_row(1, "Poha", "Breakfast", true),
            menu_row(2, "Upma", "Breakfast", true),
        ];

        let recs = engine.recommend(&cart(&["UnknownItem123"]), &menu, 5);
        let names: Vec<&str> = recs.iter().map(|r| r.item_name.as_str()).collect();
        // Deterministic ascending-name fallback, never an error.
        assert_eq!(names, vec!["Poha", "Upma"]);
        assert!(recs
            .iter()
            .all(|r| r.source == RecommendationSource::Popularity));
    }

    #[test]
    fn cap_above_eligible_count_returns_all_without_padding() {
        let engine = tea_engine();
        let menu = vec![
            menu_row(1, "Tea", "Beverages", true),
            menu_row(2, "Biscuits", "Snacks", true),
        ];

        let recs = engine.recommend(&cart(&["Tea"]), &menu, 50);
        let ids: HashSet<i64> = recs.iter().map(|r| r.item_id).collect();
        assert_eq!(ids.len(), recs.len());
        // Only Biscuits is eligible: Tea is in the cart, everything else
        // sits off-menu.
        assert_eq!(recs.len(), 1);
    }

    #[test]
    fn association_info_is_case_insensitive() {
        let engine = tea_engine();
        assert_eq!(engine.association_info("tea"), engine.association_info("Tea"));
        let info = engine.association_info("TEA").unwrap();
        assert_eq!(info.pairs_with, vec!["Biscuits", "Samosa"]);
        assert_eq!(info.reason, "Classic tea-time pairing");
        assert!(engine.association_info("Pizza").is_none());
    }

    #[test]
    fn empty_knowledge_base_degrades_to_fallbacks() {
        let engine = RecommendationEngine::new(KnowledgeBase::default());
        let menu = vec![
            menu_row(1, "Tea", "Beverages", true),
            menu_row(2, "Coffee", "Beverages", true),
        ];

        let recs = engine.recommend(&cart(&["Tea"]), &menu, 5);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].item_name, "Coffee");
    }
}
