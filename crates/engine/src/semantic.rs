use crate::candidates::normalize;
use crate::error::{EngineError, Result};
use canteen_catalog::{
    KnowledgeBase, KnowledgeEntry, MenuItemSnapshot, Recommendation, RecommendationSource,
};
use std::collections::{HashMap, HashSet};

/// Deterministic bag-of-words embedder fitted on the knowledge corpus.
///
/// The vocabulary is the sorted set of corpus tokens, so identical corpora
/// always produce identical vectors. Query tokens outside the vocabulary are
/// dropped.
pub struct TextEmbedder {
    vocabulary: HashMap<String, usize>,
}

impl TextEmbedder {
    pub fn fit(corpus: &[String]) -> Self {
        let mut tokens: Vec<String> = corpus
            .iter()
            .flat_map(|text| tokenize(text))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        tokens.sort();

        let vocabulary = tokens
            .into_iter()
            .enumerate()
            .map(|(idx, token)| (token, idx))
            .collect();

        Self { vocabulary }
    }

    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    /// Term-frequency vector, L2-normalized. All-zero for text sharing no
    /// vocabulary with the corpus.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.vocabulary.len()];
        for token in tokenize(text) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                vector[idx] += 1.0;
            }
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Brute-force cosine-similarity index over the knowledge corpus. Small
/// corpora (tens of entries) make an ANN structure pointless here.
pub struct CosineIndex {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

impl CosineIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: Vec::new(),
        }
    }

    pub fn add(&mut self, vector: Vec<f32>) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(EngineError::EmbeddingError(format!(
                "invalid vector dimension: expected {}, got {}",
                self.dimension,
                vector.len()
            )));
        }
        self.vectors.push(vector);
        Ok(())
    }

    /// K nearest neighbors as (document_index, similarity), best first.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        if query.len() != self.dimension {
            return Err(EngineError::EmbeddingError(format!(
                "invalid query dimension: expected {}, got {}",
                self.dimension,
                query.len()
            )));
        }

        let mut scores: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(idx, vector)| (idx, cosine_similarity(query, vector)))
            .collect();

        scores.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scores.truncate(k);
        Ok(scores)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Alternate retrieval strategy: embedding similarity over the knowledge
/// corpus instead of explicit pairing lists. Same input/output contract and
/// filtering rules as the rule-based engine.
pub struct SemanticRecommender {
    documents: Vec<KnowledgeEntry>,
    embedder: TextEmbedder,
    index: CosineIndex,
}

impl SemanticRecommender {
    /// Build the corpus once at construction. Errors when the knowledge base
    /// is empty; callers treat that as "semantic path unavailable".
    pub fn from_knowledge(knowledge: &KnowledgeBase) -> Result<Self> {
        if knowledge.is_empty() {
            return Err(EngineError::EmptyCorpus);
        }

        // Stable document order regardless of map iteration order.
        let mut documents: Vec<KnowledgeEntry> = knowledge.entries().cloned().collect();
        documents.sort_by(|a, b| a.item.cmp(&b.item));

        let texts: Vec<String> = documents.iter().map(document_text).collect();
        let embedder = TextEmbedder::fit(&texts);
        let mut index = CosineIndex::new(embedder.dimension());
        for text in &texts {
            index.add(embedder.embed(text))?;
        }

        log::info!(
            "Semantic recommender ready: {} documents, {} vocabulary terms",
            documents.len(),
            embedder.dimension()
        );

        Ok(Self {
            documents,
            embedder,
            index,
        })
    }

    pub fn recommend(
        &self,
        cart_items: &[String],
        available_items: &[MenuItemSnapshot],
        max_recommendations: usize,
    ) -> Result<Vec<Recommendation>> {
        if cart_items.is_empty() || max_recommendations == 0 {
            return Ok(Vec::new());
        }

        let query = format!("food items that pair well with {}", cart_items.join(", "));
        let query_vector = self.embedder.embed(&query);

        // Over-fetch so cart items and unavailable rows can be skipped.
        let k = (max_recommendations * 2).min(self.documents.len());
        let neighbors = self.index.search(&query_vector, k)?;

        let cart_names: HashSet<String> = cart_items.iter().map(|n| normalize(n)).collect();
        let mut menu_by_name: HashMap<String, &MenuItemSnapshot> = HashMap::new();
        for row in available_items {
            menu_by_name.entry(normalize(&row.item_name)).or_insert(row);
        }

        let mut seen_ids: HashSet<i64> = HashSet::new();
        let mut results = Vec::new();

        for (doc_idx, similarity) in neighbors {
            if results.len() >= max_recommendations {
                break;
            }
            if similarity <= 0.0 {
                continue;
            }
            let entry = &self.documents[doc_idx];
            let key = normalize(&entry.item);
            if cart_names.contains(&key) {
                continue;
            }
            let Some(row) = menu_by_name.get(&key) else {
                continue;
            };
            if !row.availability || !seen_ids.insert(row.id) {
                continue;
            }

            results.push(Recommendation {
                item_id: row.id,
                item_name: row.item_name.clone(),
                price: row.price,
                category: row.category.clone(),
                description: row.description.clone(),
                recommendation_score: f64::from(similarity),
                reason: entry.reason.clone(),
                source: RecommendationSource::Semantic,
            });
        }

        // Similarity ties resolve by name for deterministic output.
        results.sort_by(|a, b| {
            b.recommendation_score
                .partial_cmp(&a.recommendation_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.item_name.cmp(&b.item_name))
        });
        Ok(results)
    }
}

/// One retrievable text document per knowledge entry.
fn document_text(entry: &KnowledgeEntry) -> String {
    format!(
        "{} - {} - {} - {} - pairs with: {}",
        entry.item,
        entry.category,
        entry.taste_profile,
        entry.reason,
        entry.pairs_well_with.join(", ")
    )
}
