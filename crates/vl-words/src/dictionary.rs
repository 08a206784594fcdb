//! Free-dictionary response parsing
//!
//! Converts the JSON returned by dictionaryapi.dev-style services into
//! translation entries: one phonetic line, then up to two definitions for
//! each of the first three parts of speech.

use serde::Deserialize;

use crate::{TranslateError, TranslationEntry};

const MAX_PARTS_OF_SPEECH: usize = 3;
const MAX_DEFINITIONS: usize = 2;
const MAX_SYNONYMS: usize = 3;

#[derive(Debug, Deserialize)]
struct ApiEntry {
    #[serde(default)]
    phonetics: Vec<ApiPhonetic>,
    #[serde(default)]
    meanings: Vec<ApiMeaning>,
}

#[derive(Debug, Deserialize)]
struct ApiPhonetic {
    text: Option<String>,
    audio: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMeaning {
    part_of_speech: String,
    #[serde(default)]
    definitions: Vec<ApiDefinition>,
}

#[derive(Debug, Deserialize)]
struct ApiDefinition {
    definition: String,
    example: Option<String>,
    #[serde(default)]
    synonyms: Vec<String>,
}

/// Parse a dictionary response body. Only the first entry is used.
pub fn parse_dictionary_response(body: &str) -> Result<Vec<TranslationEntry>, TranslateError> {
    let entries: Vec<ApiEntry> = serde_json::from_str(body)
        .map_err(|err| TranslateError::MalformedResponse(err.to_string()))?;
    let Some(entry) = entries.into_iter().next() else {
        return Ok(Vec::new());
    };

    let mut out = Vec::new();

    let phonetic = entry
        .phonetics
        .iter()
        .find(|p| p.text.is_some())
        .or_else(|| entry.phonetics.first());
    if let Some(ApiPhonetic {
        text: Some(text),
        audio,
    }) = phonetic
    {
        out.push(TranslationEntry::Phonetic {
            text: text.clone(),
            audio: audio.clone().filter(|a| !a.is_empty()),
        });
    }

    for meaning in entry.meanings.into_iter().take(MAX_PARTS_OF_SPEECH) {
        for def in meaning.definitions.into_iter().take(MAX_DEFINITIONS) {
            let synonyms: Vec<String> = def.synonyms.into_iter().take(MAX_SYNONYMS).collect();
            out.push(TranslationEntry::Definition {
                part_of_speech: meaning.part_of_speech.clone(),
                text: def.definition,
                example: def.example,
                synonyms: (!synonyms.is_empty()).then_some(synonyms),
            });
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STUDY: &str = r#"[{
        "word": "study",
        "phonetics": [{"audio": ""}, {"text": "/ˈstʌdi/", "audio": "https://example.org/study.mp3"}],
        "meanings": [
            {"partOfSpeech": "noun", "definitions": [
                {"definition": "The act of studying.", "synonyms": ["learning", "reading", "research", "review"]},
                {"definition": "A room for reading."},
                {"definition": "A sketch."}
            ]},
            {"partOfSpeech": "verb", "definitions": [
                {"definition": "To learn.", "example": "I study English."}
            ]},
            {"partOfSpeech": "adjective", "definitions": [{"definition": "a"}]},
            {"partOfSpeech": "adverb", "definitions": [{"definition": "b"}]}
        ]
    }]"#;

    #[test]
    fn test_parse_limits_and_shapes() {
        let entries = parse_dictionary_response(STUDY).unwrap();
        assert_eq!(
            entries[0],
            TranslationEntry::Phonetic {
                text: "/ˈstʌdi/".into(),
                audio: Some("https://example.org/study.mp3".into()),
            }
        );
        // phonetic + 2 noun + 1 verb + 1 adjective; adverb is past the limit
        assert_eq!(entries.len(), 5);
        match &entries[1] {
            TranslationEntry::Definition { synonyms, .. } => {
                assert_eq!(synonyms.as_ref().map(Vec::len), Some(3));
            }
            other => panic!("expected definition, got {other:?}"),
        }
        match &entries[3] {
            TranslationEntry::Definition {
                part_of_speech,
                example,
                synonyms,
                ..
            } => {
                assert_eq!(part_of_speech, "verb");
                assert_eq!(example.as_deref(), Some("I study English."));
                assert!(synonyms.is_none());
            }
            other => panic!("expected definition, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_and_malformed() {
        assert!(parse_dictionary_response("[]").unwrap().is_empty());
        assert!(matches!(
            parse_dictionary_response(r#"{"title": "No Definitions Found"}"#),
            Err(TranslateError::MalformedResponse(_))
        ));
    }
}
