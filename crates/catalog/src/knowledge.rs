use crate::error::Result;
use crate::types::KnowledgeEntry;
use std::collections::HashMap;
use std::path::Path;

/// Bundled pairing table so the engine works without any configuration.
const BUILTIN_KNOWLEDGE: &str = include_str!("../data/food_knowledge.json");

/// Case-insensitive lookup from item name to its [`KnowledgeEntry`].
///
/// Loaded once at engine construction and read-only afterwards. Loading
/// fails soft: a missing or malformed source logs a warning and yields an
/// empty knowledge base, so a data problem can never take down the request
/// path that consumes it.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: HashMap<String, KnowledgeEntry>,
}

impl KnowledgeBase {
    /// Build from already-parsed entries. Duplicate names (after lowercase
    /// normalization) keep the first occurrence.
    pub fn from_entries(entries: Vec<KnowledgeEntry>) -> Self {
        let mut map: HashMap<String, KnowledgeEntry> = HashMap::with_capacity(entries.len());
        for entry in entries {
            let key = entry.item.trim().to_lowercase();
            if key.is_empty() {
                log::warn!("Skipping knowledge entry with empty item name");
                continue;
            }
            if map.contains_key(&key) {
                log::warn!("Duplicate knowledge entry for '{}', keeping first", entry.item);
                continue;
            }
            map.insert(key, entry);
        }
        Self { entries: map }
    }

    /// Parse a JSON array of entries.
    pub fn from_json(data: &str) -> Result<Self> {
        let entries: Vec<KnowledgeEntry> = serde_json::from_str(data)?;
        Ok(Self::from_entries(entries))
    }

    /// Load from a JSON file, degrading to an empty knowledge base on any
    /// read or parse failure.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(data) => match Self::from_json(&data) {
                Ok(kb) => {
                    log::info!("Loaded {} knowledge entries from {:?}", kb.len(), path);
                    kb
                }
                Err(err) => {
                    log::warn!("Malformed knowledge base at {path:?}: {err}; starting empty");
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Cannot read knowledge base at {path:?}: {err}; starting empty");
                Self::default()
            }
        }
    }

    /// The pairing table shipped with the crate.
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_KNOWLEDGE).expect("builtin knowledge data is valid JSON")
    }

    /// Case-insensitive lookup.
    pub fn get(&self, item_name: &str) -> Option<&KnowledgeEntry> {
        self.entries.get(&item_name.trim().to_lowercase())
    }

    /// Iterate entries in unspecified order.
    pub fn entries(&self) -> impl Iterator<Item = &KnowledgeEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
