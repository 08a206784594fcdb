//! Translation payloads, cache and provider fallback chain

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{TranslateError, now_millis};

/// One line of a translation card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TranslationEntry {
    Phonetic {
        text: String,
        #[serde(default)]
        audio: Option<String>,
    },
    Translation {
        text: String,
        source: String,
    },
    #[serde(rename_all = "camelCase")]
    Definition {
        part_of_speech: String,
        text: String,
        #[serde(default)]
        example: Option<String>,
        #[serde(default)]
        synonyms: Option<Vec<String>>,
    },
}

impl TranslationEntry {
    pub fn is_translation(&self) -> bool {
        matches!(self, Self::Translation { .. })
    }
}

/// Everything known about one word's meaning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub word: String,
    pub translations: Vec<TranslationEntry>,
    #[serde(default)]
    pub has_multiple: bool,
    #[serde(default)]
    pub timestamp: u64,
}

impl TranslationResult {
    pub fn new(word: &str, translations: Vec<TranslationEntry>) -> Self {
        Self {
            word: word.to_string(),
            has_multiple: translations.len() > 1,
            translations,
            timestamp: now_millis(),
        }
    }

    /// Text of the first plain translation, if any
    pub fn primary_text(&self) -> Option<&str> {
        self.translations.iter().find_map(|entry| match entry {
            TranslationEntry::Translation { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Translations keyed by lower-case word, bounded by capacity.
/// When full, the entry with the oldest timestamp is evicted.
#[derive(Debug, Clone)]
pub struct TranslationCache {
    entries: HashMap<String, TranslationResult>,
    capacity: usize,
}

impl TranslationCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, word: &str) -> Option<&TranslationResult> {
        self.entries.get(&word.to_lowercase())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(&word.to_lowercase())
    }

    pub fn insert(&mut self, word: &str, result: TranslationResult) {
        let key = word.to_lowercase();
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.entries.insert(key, result);
    }

    pub fn remove(&mut self, word: &str) -> Option<TranslationResult> {
        self.entries.remove(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by key
    pub fn entries(&self) -> Vec<(&str, &TranslationResult)> {
        let mut out: Vec<_> = self
            .entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
            .collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by(|a, b| a.1.timestamp.cmp(&b.1.timestamp).then_with(|| a.0.cmp(b.0)))
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            tracing::debug!("Evicting cached translation for {:?}", key);
            self.entries.remove(&key);
        }
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(crate::StoreConfig::default().cache_capacity)
    }
}

/// A source of translation entries for a single word
pub trait TranslationProvider {
    fn name(&self) -> &str;

    fn lookup(&self, word: &str) -> Result<Vec<TranslationEntry>, TranslateError>;
}

/// Tries primary providers in order, then adds dictionary entries.
///
/// A word always gets at least one translation: when no provider produces
/// one, a placeholder from source `"Fallback"` is used.
#[derive(Default)]
pub struct FallbackTranslator {
    primaries: Vec<Box<dyn TranslationProvider>>,
    dictionary: Option<Box<dyn TranslationProvider>>,
}

impl FallbackTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_primary(mut self, provider: impl TranslationProvider + 'static) -> Self {
        self.primaries.push(Box::new(provider));
        self
    }

    pub fn with_dictionary(mut self, provider: impl TranslationProvider + 'static) -> Self {
        self.dictionary = Some(Box::new(provider));
        self
    }

    /// Cached result for `word`, or a fresh lookup that is then cached
    pub fn translate(&self, word: &str, cache: &mut TranslationCache) -> TranslationResult {
        if let Some(hit) = cache.get(word) {
            tracing::debug!("Translation cache hit: {}", word);
            return hit.clone();
        }
        let result = self.lookup(word);
        cache.insert(word, result.clone());
        result
    }

    /// Query the providers, bypassing the cache
    pub fn lookup(&self, word: &str) -> TranslationResult {
        let mut translations = Vec::new();

        for provider in &self.primaries {
            match provider.lookup(word) {
                Ok(entries) if entries.iter().any(TranslationEntry::is_translation) => {
                    translations.extend(entries.into_iter().filter(TranslationEntry::is_translation));
                    break;
                }
                Ok(_) => tracing::debug!("{} had no translation for {}", provider.name(), word),
                Err(err) => tracing::warn!("Translation provider error: {}", err),
            }
        }

        if let Some(dictionary) = &self.dictionary {
            match dictionary.lookup(word) {
                Ok(entries) => translations.extend(entries),
                Err(err) => tracing::warn!("Dictionary lookup error: {}", err),
            }
        }

        if !translations.iter().any(TranslationEntry::is_translation) {
            translations.push(placeholder(word));
        }
        TranslationResult::new(word, translations)
    }
}

fn placeholder(word: &str) -> TranslationEntry {
    TranslationEntry::Translation {
        text: format!("{word} (translation unavailable)"),
        source: "Fallback".to_string(),
    }
}
