//! vocab-lens word store
//!
//! The user's saved words with their metadata, the known-words list, the
//! translation cache and the JSON backup format that carries all three.

mod bundle;
mod config;
mod dictionary;
mod error;
mod store;
mod text;
mod translation;

pub use bundle::{ExportBundle, ImportReport};
pub use config::StoreConfig;
pub use dictionary::parse_dictionary_response;
pub use error::{StoreError, StoreResult, TranslateError};
pub use store::{KnownWordData, SavedWordData, StoreEvent, WordStore};
pub use text::{is_english_text, is_english_word};
pub use translation::{
    FallbackTranslator, TranslationCache, TranslationEntry, TranslationProvider,
    TranslationResult,
};

/// Milliseconds since the Unix epoch
pub(crate) fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}
