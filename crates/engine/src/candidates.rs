use canteen_catalog::{MenuItemSnapshot, Recommendation, RecommendationSource};
use std::collections::{HashMap, HashSet};

/// Base weight of a direct curated pairing. Chosen so that a single
/// association contribution always outranks any category-affinity or
/// popularity candidate.
pub const ASSOCIATION_BASE: f64 = 3.0;

/// Extra weight for appearing early in a `pairs_well_with` list; decays as
/// `1 / (1 + position)`.
pub const ASSOCIATION_POSITION_BONUS: f64 = 1.0;

/// Weight of a same-category candidate generated for a cart item the
/// knowledge base does not know.
pub const CATEGORY_AFFINITY_SCORE: f64 = 1.5;

/// Weight of the popularity fallback used to pad short result lists.
pub const POPULARITY_SCORE: f64 = 0.5;

struct Candidate {
    score: f64,
    reason: String,
    source: RecommendationSource,
}

/// Accumulates provisional recommendations before resolution against the
/// live menu.
///
/// Keys are lowercase item names. Association contributions are additive:
/// a target referenced by two distinct cart items collects both weights, so
/// it outranks a target referenced by one. Weaker sources never overwrite a
/// stronger source's reason.
#[derive(Default)]
pub struct CandidatePool {
    candidates: HashMap<String, Candidate>,
}

impl CandidatePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a direct-pairing contribution for `target` at `position` within
    /// the pairing list (0 = strongest).
    pub fn add_association(&mut self, target: &str, position: usize, reason: &str) {
        let contribution = ASSOCIATION_BASE + ASSOCIATION_POSITION_BONUS / (1.0 + position as f64);
        let key = normalize(target);
        if key.is_empty() {
            return;
        }

        match self.candidates.get_mut(&key) {
            Some(existing) => {
                if existing.source == RecommendationSource::Association {
                    existing.score += contribution;
                } else {
                    // A weaker source's score is superseded, not boosted:
                    // only distinct association contributions stack.
                    existing.score = contribution;
                    existing.source = RecommendationSource::Association;
                    existing.reason = reason.to_string();
                }
            }
            None => {
                self.candidates.insert(
                    key,
                    Candidate {
                        score: contribution,
                        reason: reason.to_string(),
                        source: RecommendationSource::Association,
                    },
                );
            }
        }
    }

    /// Add a same-category candidate. No-op if the target is already pooled
    /// with a stronger or equal source.
    pub fn add_category_affinity(&mut self, target: &str, reason: String) {
        let key = normalize(target);
        if key.is_empty() {
            return;
        }
        self.candidates.entry(key).or_insert(Candidate {
            score: CATEGORY_AFFINITY_SCORE,
            reason,
            source: RecommendationSource::CategoryAffinity,
        });
    }

    /// Add a popularity-fallback candidate. No-op if already pooled.
    pub fn add_popularity(&mut self, target: &str, reason: String) {
        let key = normalize(target);
        if key.is_empty() {
            return;
        }
        self.candidates.entry(key).or_insert(Candidate {
            score: POPULARITY_SCORE,
            reason,
            source: RecommendationSource::Popularity,
        });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.candidates.contains_key(&normalize(name))
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Resolve candidates against the live menu: drop anything that is not
    /// an available menu row or that sits in the cart, deduplicate by menu
    /// id (highest score wins, stronger source's reason wins), then rank by
    /// score descending with name ascending as tie-break.
    pub fn resolve(
        self,
        cart_names: &HashSet<String>,
        menu_by_name: &HashMap<String, &MenuItemSnapshot>,
        max_recommendations: usize,
    ) -> Vec<Recommendation> {
        let mut by_id: HashMap<i64, Recommendation> = HashMap::new();

        for (key, candidate) in self.candidates {
            if cart_names.contains(&key) {
                continue;
            }
            let Some(row) = menu_by_name.get(&key) else {
                continue;
            };
            if !row.availability {
                continue;
            }

            let rec = Recommendation {
                item_id: row.id,
                item_name: row.item_name.clone(),
                price: row.price,
                category: row.category.clone(),
                description: row.description.clone(),
                recommendation_score: candidate.score,
                reason: candidate.reason,
                source: candidate.source,
            };

            match by_id.get_mut(&row.id) {
                Some(existing) => {
                    if rec.source > existing.source {
                        existing.source = rec.source;
                        existing.reason = rec.reason;
                    }
                    if rec.recommendation_score > existing.recommendation_score {
                        existing.recommendation_score = rec.recommendation_score;
                    }
                }
                None => {
                    by_id.insert(row.id, rec);
                }
            }
        }

        let mut ranked: Vec<Recommendation> = by_id.into_values().collect();
        ranked.sort_by(|a, b| {
            b.recommendation_score
                .partial_cmp(&a.recommendation_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.item_name.cmp(&b.item_name))
        });
        ranked.truncate(max_recommendations);
        ranked
    }
}

/// Lowercased, trimmed form used for every name comparison in the engine.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
