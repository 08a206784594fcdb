//! Saved-word store
//!
//! Keys are lower-case; the spelling the user saved is kept in the
//! metadata. Every change that affects highlighting is queued as a
//! `StoreEvent` for the owner to drain.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vl_highlight::RootWordSet;

use crate::{StoreConfig, StoreError, StoreResult, TranslationCache, TranslationResult, now_millis};

/// Metadata for one saved word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedWordData {
    /// Original spelling
    pub word: String,
    #[serde(default)]
    pub added_time: u64,
    #[serde(default)]
    pub translation_data: Option<TranslationResult>,
}

/// Metadata for a word the user marked as known
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownWordData {
    pub word: String,
    #[serde(default)]
    pub added_time: u64,
    #[serde(default)]
    pub known_time: u64,
}

/// Store changes relevant to highlighting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Saved(String),
    Removed(String),
    /// Left the saved list for the known list
    MarkedKnown(String),
    UnmarkedKnown(String),
    /// Words newly added by an import
    Imported(Vec<String>),
    /// Every saved word was removed
    Cleared,
    KnownCleared,
    ColorChanged(String),
}

#[derive(Debug)]
pub struct WordStore {
    pub(crate) config: StoreConfig,
    pub(crate) words: BTreeMap<String, SavedWordData>,
    pub(crate) known: BTreeMap<String, KnownWordData>,
    pub(crate) cache: TranslationCache,
    highlight_color: String,
    events: Vec<StoreEvent>,
}

fn normalize(word: &str) -> StoreResult<String> {
    let trimmed = word.trim();
    if trimmed.is_empty() {
        return Err(StoreError::EmptyWord);
    }
    Ok(trimmed.to_lowercase())
}

impl WordStore {
    pub fn new(config: StoreConfig) -> Self {
        let cache = TranslationCache::new(config.cache_capacity);
        let highlight_color = config.default_color.clone();
        Self {
            config,
            words: BTreeMap::new(),
            known: BTreeMap::new(),
            cache,
            highlight_color,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Save a word now. Returns whether it was not saved before.
    pub fn save_word(
        &mut self,
        word: &str,
        translation: Option<TranslationResult>,
    ) -> StoreResult<bool> {
        self.save_word_at(word, translation, now_millis())
    }

    /// Save a word with an explicit timestamp (epoch millis)
    pub fn save_word_at(
        &mut self,
        word: &str,
        translation: Option<TranslationResult>,
        added_time: u64,
    ) -> StoreResult<bool> {
        let key = normalize(word)?;
        if let Some(result) = &translation {
            self.cache.insert(&key, result.clone());
        }
        let data = SavedWordData {
            word: word.trim().to_string(),
            added_time,
            translation_data: translation,
        };
        let is_new = self.words.insert(key.clone(), data).is_none();
        tracing::info!("Saved word: {}", key);
        self.events.push(StoreEvent::Saved(key));
        Ok(is_new)
    }

    /// Drop a word with its metadata and cached translation
    pub fn remove_word(&mut self, word: &str) -> bool {
        let Ok(key) = normalize(word) else {
            return false;
        };
        self.cache.remove(&key);
        if self.words.remove(&key).is_none() {
            return false;
        }
        tracing::info!("Removed word: {}", key);
        self.events.push(StoreEvent::Removed(key));
        true
    }

    /// Move a word to the known list. Returns false if it was already known.
    pub fn mark_known(&mut self, word: &str) -> StoreResult<bool> {
        let key = normalize(word)?;
        if self.known.contains_key(&key) {
            return Ok(false);
        }
        let now = now_millis();
        let (spelling, added_time) = match self.words.remove(&key) {
            Some(data) => (data.word, data.added_time),
            None => (word.trim().to_string(), now),
        };
        self.known.insert(
            key.clone(),
            KnownWordData {
                word: spelling,
                added_time,
                known_time: now,
            },
        );
        tracing::info!("Marked word as known: {}", key);
        self.events.push(StoreEvent::MarkedKnown(key));
        Ok(true)
    }

    pub fn unmark_known(&mut self, word: &str) -> bool {
        let Ok(key) = normalize(word) else {
            return false;
        };
        if self.known.remove(&key).is_none() {
            return false;
        }
        self.events.push(StoreEvent::UnmarkedKnown(key));
        true
    }

    /// Drop every saved word and its metadata. Cached translations stay.
    /// Returns how many words were removed.
    pub fn clear_words(&mut self) -> usize {
        let removed = self.words.len();
        if removed == 0 {
            return 0;
        }
        self.words.clear();
        tracing::info!("Cleared {} saved words", removed);
        self.events.push(StoreEvent::Cleared);
        removed
    }

    /// Forget every known word
    pub fn clear_known(&mut self) -> usize {
        let removed = self.known.len();
        if removed == 0 {
            return 0;
        }
        self.known.clear();
        tracing::info!("Cleared {} known words", removed);
        self.events.push(StoreEvent::KnownCleared);
        removed
    }

    pub fn is_known(&self, word: &str) -> bool {
        normalize(word).is_ok_and(|key| self.known.contains_key(&key))
    }

    pub fn is_saved(&self, word: &str) -> bool {
        normalize(word).is_ok_and(|key| self.words.contains_key(&key))
    }

    pub fn get(&self, word: &str) -> Option<&SavedWordData> {
        normalize(word).ok().and_then(|key| self.words.get(&key))
    }

    /// The current root-word set for highlighting
    pub fn snapshot(&self) -> RootWordSet {
        self.words.keys().collect()
    }

    /// Saved words, newest first
    pub fn words_by_recent(&self) -> Vec<&SavedWordData> {
        let mut out: Vec<_> = self.words.values().collect();
        out.sort_by(|a, b| b.added_time.cmp(&a.added_time));
        out
    }

    /// Known words, most recently marked first
    pub fn known_words(&self) -> Vec<&KnownWordData> {
        let mut out: Vec<_> = self.known.values().collect();
        out.sort_by(|a, b| b.known_time.cmp(&a.known_time));
        out
    }

    /// Saved words whose spelling contains `query`, newest first
    pub fn search(&self, query: &str) -> Vec<&SavedWordData> {
        let needle = query.trim().to_lowercase();
        self.words_by_recent()
            .into_iter()
            .filter(|data| data.word.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn known_count(&self) -> usize {
        self.known.len()
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut TranslationCache {
        &mut self.cache
    }

    /// Cached translation for a word or, failing that, for its root
    pub fn cached_translation(&self, word: &str, root: &str) -> Option<&TranslationResult> {
        self.cache.get(word).or_else(|| self.cache.get(root))
    }

    pub fn highlight_color(&self) -> &str {
        &self.highlight_color
    }

    pub fn set_highlight_color(&mut self, color: &str) -> bool {
        let color = color.trim();
        if color.is_empty() || color == self.highlight_color {
            return false;
        }
        self.highlight_color = color.to_string();
        self.events.push(StoreEvent::ColorChanged(self.highlight_color.clone()));
        true
    }

    pub(crate) fn push_event(&mut self, event: StoreEvent) {
        self.events.push(event);
    }

    /// Take all queued events, oldest first
    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for WordStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}
