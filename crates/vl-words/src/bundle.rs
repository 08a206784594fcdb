//! JSON backup format
//!
//! Map-valued fields travel as arrays of `[key, value]` pairs. Imports merge
//! into the store; nothing is applied unless the whole bundle parses.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    KnownWordData, SavedWordData, StoreError, StoreEvent, StoreResult, TranslationResult,
    WordStore, now_millis,
};

/// A full backup of the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub words: Vec<String>,
    pub words_data: Vec<(String, SavedWordData)>,
    pub translation_cache: Vec<(String, TranslationResult)>,
    pub known_words: Vec<String>,
    pub known_words_data: Vec<(String, KnownWordData)>,
    pub highlight_color: String,
    pub version: String,
    /// Epoch millis
    pub export_time: u64,
    pub count: usize,
    pub known_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportBundle {
    /// Non-string entries are dropped
    words: Vec<Value>,
    #[serde(default)]
    words_data: Vec<(String, SavedWordData)>,
    #[serde(default)]
    translation_cache: Vec<(String, TranslationResult)>,
    #[serde(default)]
    known_words: Vec<Value>,
    #[serde(default)]
    known_words_data: Vec<(String, KnownWordData)>,
}

/// What an import changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Words that were not saved before, sorted
    pub words_added: Vec<String>,
    pub metadata_merged: usize,
    pub translations_merged: usize,
    pub known_added: usize,
}

fn key_of(word: &str) -> Option<String> {
    let trimmed = word.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

impl WordStore {
    pub fn export(&self) -> ExportBundle {
        ExportBundle {
            words: self.words.keys().cloned().collect(),
            words_data: self
                .words
                .iter()
                .map(|(key, data)| (key.clone(), data.clone()))
                .collect(),
            translation_cache: self
                .cache
                .entries()
                .into_iter()
                .map(|(key, result)| (key.to_string(), result.clone()))
                .collect(),
            known_words: self.known.values().map(|data| data.word.clone()).collect(),
            known_words_data: self
                .known
                .iter()
                .map(|(key, data)| (key.clone(), data.clone()))
                .collect(),
            highlight_color: self.highlight_color().to_string(),
            version: self.config.data_version.clone(),
            export_time: now_millis(),
            count: self.words.len(),
            known_count: self.known.len(),
        }
    }

    /// Pretty-printed backup JSON
    pub fn export_json(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(&self.export())?)
    }

    /// Merge a backup into the store
    pub fn import_json(&mut self, json: &str) -> StoreResult<ImportReport> {
        let value: Value = serde_json::from_str(json)
            .map_err(|err| StoreError::InvalidImport(err.to_string()))?;
        if !value.get("words").is_some_and(Value::is_array) {
            return Err(StoreError::InvalidImport("`words` must be an array".into()));
        }
        let bundle: ImportBundle = serde_json::from_value(value)
            .map_err(|err| StoreError::InvalidImport(err.to_string()))?;
        Ok(self.merge(bundle))
    }

    fn merge(&mut self, bundle: ImportBundle) -> ImportReport {
        let now = now_millis();
        let mut report = ImportReport::default();

        for (key, data) in bundle.known_words_data {
            if let Some(key) = key_of(&key) {
                if self.known.insert(key, data).is_none() {
                    report.known_added += 1;
                }
            }
        }
        for word in bundle.known_words.iter().filter_map(Value::as_str) {
            let Some(key) = key_of(word) else { continue };
            if self.known.contains_key(&key) {
                continue;
            }
            let data = KnownWordData {
                word: word.trim().to_string(),
                added_time: now,
                known_time: now,
            };
            self.known.insert(key, data);
            report.known_added += 1;
        }

        // A word is either saved or known, never both.
        let demoted: Vec<String> = self
            .words
            .keys()
            .filter(|key| self.known.contains_key(*key))
            .cloned()
            .collect();
        for key in &demoted {
            self.words.remove(key);
        }

        let imported: BTreeSet<String> = bundle
            .words
            .iter()
            .filter_map(Value::as_str)
            .filter_map(key_of)
            .filter(|key| !self.known.contains_key(key))
            .collect();
        for key in &imported {
            if self.words.contains_key(key) {
                continue;
            }
            let data = SavedWordData {
                word: key.clone(),
                added_time: now,
                translation_data: None,
            };
            self.words.insert(key.clone(), data);
            report.words_added.push(key.clone());
        }

        // Metadata only attaches to words that are saved after the merge.
        for (key, data) in bundle.words_data {
            let Some(key) = key_of(&key) else { continue };
            if self.words.contains_key(&key) {
                self.words.insert(key, data);
                report.metadata_merged += 1;
            }
        }

        for (key, result) in bundle.translation_cache {
            if let Some(key) = key_of(&key) {
                self.cache.insert(&key, result);
                report.translations_merged += 1;
            }
        }

        tracing::info!(
            "Imported {} new words ({} metadata, {} translations, {} known)",
            report.words_added.len(),
            report.metadata_merged,
            report.translations_merged,
            report.known_added
        );
        if !report.words_added.is_empty() {
            self.push_event(StoreEvent::Imported(report.words_added.clone()));
        }
        for key in demoted {
            tracing::info!("Imported word is known, unsaving: {}", key);
            self.push_event(StoreEvent::MarkedKnown(key));
        }
        report
    }
}
