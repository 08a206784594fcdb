//! Store, translator and backup working together

use vl_words::{
    FallbackTranslator, StoreConfig, StoreEvent, TranslateError, TranslationEntry,
    TranslationProvider, WordStore, is_english_word, parse_dictionary_response,
};

/// Serves a canned dictionary body
struct CannedDictionary(&'static str);

impl TranslationProvider for CannedDictionary {
    fn name(&self) -> &str {
        "Dictionary"
    }

    fn lookup(&self, _word: &str) -> Result<Vec<TranslationEntry>, TranslateError> {
        parse_dictionary_response(self.0)
    }
}

struct Glossary;

impl TranslationProvider for Glossary {
    fn name(&self) -> &str {
        "Glossary"
    }

    fn lookup(&self, word: &str) -> Result<Vec<TranslationEntry>, TranslateError> {
        let text = match word.to_lowercase().as_str() {
            "study" => "学习",
            "memorize" => "记住",
            _ => return Ok(Vec::new()),
        };
        Ok(vec![TranslationEntry::Translation {
            text: text.into(),
            source: self.name().into(),
        }])
    }
}

const MEMORIZE: &str = r#"[{"word":"memorize","phonetics":[{"text":"/ˈmɛməˌɹaɪz/"}],
    "meanings":[{"partOfSpeech":"verb","definitions":[{"definition":"To commit to memory."}]}]}]"#;

#[test]
fn test_translate_then_save_flow() {
    let translator = FallbackTranslator::new()
        .with_primary(Glossary)
        .with_dictionary(CannedDictionary(MEMORIZE));
    let mut store = WordStore::default();

    let selection = "Memorize";
    assert!(is_english_word(selection));

    let result = translator.translate(selection, store.cache_mut());
    assert_eq!(result.primary_text(), Some("记住"));
    assert_eq!(result.translations.len(), 3);
    assert!(result.has_multiple);

    store.save_word(selection, Some(result.clone())).unwrap();
    assert_eq!(store.cache().len(), 1);
    assert_eq!(store.get("memorize").unwrap().translation_data, Some(result));
    assert_eq!(store.drain_events(), vec![StoreEvent::Saved("memorize".into())]);
}

#[test]
fn test_unknown_word_gets_placeholder() {
    let translator = FallbackTranslator::new().with_primary(Glossary);
    let mut store = WordStore::default();
    let result = translator.translate("zyzzyva", store.cache_mut());
    assert_eq!(
        result.translations,
        vec![TranslationEntry::Translation {
            text: "zyzzyva (translation unavailable)".into(),
            source: "Fallback".into(),
        }]
    );
}

#[test]
fn test_backup_round_trip_preserves_store() {
    let translator = FallbackTranslator::new().with_primary(Glossary);
    let mut store = WordStore::new(StoreConfig {
        data_version: "2.0.0".into(),
        ..StoreConfig::default()
    });
    for (i, word) in ["study", "memorize", "vocabulary"].into_iter().enumerate() {
        let result = translator.translate(word, store.cache_mut());
        store.save_word_at(word, Some(result), i as u64).unwrap();
    }
    store.mark_known("vocabulary").unwrap();
    store.set_highlight_color("#ce93d8");

    let json = store.export_json().unwrap();
    assert!(json.contains("\"version\": \"2.0.0\""));

    let mut restored = WordStore::default();
    let report = restored.import_json(&json).unwrap();
    assert_eq!(report.words_added, vec!["memorize".to_string(), "study".to_string()]);
    assert_eq!(restored.snapshot(), store.snapshot());
    assert_eq!(restored.get("study"), store.get("study"));
    assert!(restored.is_known("vocabulary"));
    assert_eq!(restored.cache().len(), store.cache().len());
}

#[test]
fn test_import_is_a_merge() {
    let mut store = WordStore::default();
    store.save_word("cat", None).unwrap();
    store.import_json(r#"{"words": ["dog"]}"#).unwrap();
    store.import_json(r#"{"words": ["dog", "emu"]}"#).unwrap();

    let words: Vec<String> = store.snapshot().iter().map(String::from).collect();
    assert_eq!(words, vec!["cat", "dog", "emu"]);
}
