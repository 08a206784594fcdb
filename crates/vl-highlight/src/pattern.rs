//! Word pattern compilation
//!
//! All saved roots and their generated forms become one case-insensitive
//! alternation anchored on word boundaries, so a single `find_iter` over a
//! text node yields every match left to right.

use regex::{Regex, RegexBuilder};

use crate::{HighlightResult, MatchSpan, RootWordSet, attribute, stem};

/// Compiled pattern for one annotation pass
#[derive(Debug, Clone)]
pub enum WordPattern {
    /// Nothing to highlight; scanning is skipped entirely
    NoOp,
    Compiled(CompiledPattern),
}

impl WordPattern {
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }

    /// Every match in `text`, attributed against `roots`
    pub fn scan(&self, text: &str, roots: &RootWordSet) -> Vec<MatchSpan> {
        match self {
            Self::NoOp => Vec::new(),
            Self::Compiled(pattern) => pattern.scan(text, roots),
        }
    }
}

/// A successfully compiled word alternation
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
    alternatives: usize,
}

impl CompiledPattern {
    /// Number of distinct alternatives in the pattern
    pub fn alternatives(&self) -> usize {
        self.alternatives
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn scan(&self, text: &str, roots: &RootWordSet) -> Vec<MatchSpan> {
        self.regex
            .find_iter(text)
            .map(|m| MatchSpan {
                start: m.start(),
                end: m.end(),
                literal: m.as_str().to_string(),
                attribution: attribute(m.as_str(), roots),
            })
            .collect()
    }
}

/// Builds the pattern for a root-word set
#[derive(Debug, Clone)]
pub struct PatternBuilder {
    size_limit: usize,
}

impl PatternBuilder {
    pub fn new(size_limit: usize) -> Self {
        Self { size_limit }
    }

    /// Escaped, de-duplicated alternatives: each root, then its forms
    pub fn alternatives(&self, roots: &RootWordSet) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut alternatives = Vec::new();
        let mut add = |raw: &str| {
            let escaped = regex::escape(raw);
            if seen.insert(escaped.clone()) {
                alternatives.push(escaped);
            }
        };

        for root in roots.iter() {
            add(root);
            match stem(root) {
                Ok(forms) => forms.iter().for_each(|form| add(form.as_str())),
                Err(err) => tracing::warn!("Skipping variants of {:?}: {}", root, err),
            }
        }
        alternatives
    }

    /// Compile the pattern; an empty set yields `WordPattern::NoOp`
    pub fn build(&self, roots: &RootWordSet) -> HighlightResult<WordPattern> {
        if roots.is_empty() {
            return Ok(WordPattern::NoOp);
        }

        let alternatives = self.alternatives(roots);
        let source = format!(r"\b(?:{})\b", alternatives.join("|"));
        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .size_limit(self.size_limit)
            .dfa_size_limit(self.size_limit)
            .build()?;

        tracing::debug!(
            "Compiled word pattern: {} roots, {} alternatives",
            roots.len(),
            alternatives.len()
        );
        Ok(WordPattern::Compiled(CompiledPattern {
            regex,
            alternatives: alternatives.len(),
        }))
    }

    /// Like `build`, but a pattern that fails to compile degrades to `NoOp`
    pub fn build_or_noop(&self, roots: &RootWordSet) -> WordPattern {
        self.build(roots).unwrap_or_else(|err| {
            tracing::warn!("Highlighting disabled for this pass: {}", err);
            WordPattern::NoOp
        })
    }
}

impl Default for PatternBuilder {
    fn default() -> Self {
        Self::new(crate::HighlightConfig::default().regex_size_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HighlightError, MatchKind};

    fn build(words: &[&str]) -> WordPattern {
        let roots: RootWordSet = words.iter().collect();
        PatternBuilder::default().build(&roots).unwrap()
    }

    fn literals(pattern: &WordPattern, words: &[&str], text: &str) -> Vec<String> {
        let roots: RootWordSet = words.iter().collect();
        pattern
            .scan(text, &roots)
            .into_iter()
            .map(|m| m.literal)
            .collect()
    }

    #[test]
    fn test_empty_set_is_noop() {
        let pattern = build(&[]);
        assert!(pattern.is_noop());
        assert!(pattern.scan("anything at all", &RootWordSet::new()).is_empty());
    }

    #[test]
    fn test_whole_word_only() {
        let pattern = build(&["cat"]);
        assert_eq!(literals(&pattern, &["cat"], "concatenate the cat"), vec!["cat"]);
    }

    #[test]
    fn test_case_insensitive() {
        let pattern = build(&["study"]);
        assert_eq!(
            literals(&pattern, &["study"], "STUDY Study studies"),
            vec!["STUDY", "Study", "studies"]
        );
    }

    #[test]
    fn test_longer_variant_found_despite_shorter_alternative() {
        let pattern = build(&["run"]);
        let roots: RootWordSet = ["run"].into_iter().collect();
        let spans = pattern.scan("She was running late", &roots);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].literal, "running");
        assert_eq!((spans[0].start, spans[0].end), (8, 15));
        assert_eq!(spans[0].attribution.kind, MatchKind::DoubledConsonant);
    }

    #[test]
    fn test_metacharacters_are_escaped() {
        let pattern = build(&["a.b"]);
        assert_eq!(literals(&pattern, &["a.b"], "a.b axb"), vec!["a.b"]);
    }

    #[test]
    fn test_compiled_source_is_boundary_anchored() {
        let WordPattern::Compiled(compiled) = build(&["a.b"]) else {
            panic!("expected a compiled pattern");
        };
        assert!(compiled.as_str().starts_with(r"\b(?:a\.b|"));
        assert!(compiled.as_str().ends_with(r")\b"));
        let roots: RootWordSet = ["a.b"].iter().collect();
        assert_eq!(
            compiled.alternatives(),
            PatternBuilder::default().alternatives(&roots).len()
        );
    }

    #[test]
    fn test_alternatives_are_deduplicated() {
        let roots: RootWordSet = ["happy", "happies"].into_iter().collect();
        let alts = PatternBuilder::default().alternatives(&roots);
        let count = alts.iter().filter(|a| a.as_str() == "happies").count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_tiny_size_limit_fails_to_compile() {
        let roots: RootWordSet = ["vocabulary", "memorize", "study"].into_iter().collect();
        let builder = PatternBuilder::new(16);
        assert!(matches!(
            builder.build(&roots),
            Err(HighlightError::PatternCompilation(_))
        ));
        assert!(builder.build_or_noop(&roots).is_noop());
    }
}
