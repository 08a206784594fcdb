//! Saved root-word set

use std::collections::BTreeSet;

/// The user's saved words, normalized to trimmed lower case.
///
/// Iteration order is the set's own (sorted) order; nothing downstream may
/// rely on which root wins when several could explain one token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootWordSet {
    words: BTreeSet<String>,
}

impl RootWordSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn normalize(word: &str) -> Option<String> {
        let trimmed = word.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
    }

    /// Add a word; blank input is ignored
    pub fn insert(&mut self, word: &str) -> bool {
        match Self::normalize(word) {
            Some(word) => self.words.insert(word),
            None => false,
        }
    }

    pub fn remove(&mut self, word: &str) -> bool {
        Self::normalize(word).is_some_and(|word| self.words.remove(&word))
    }

    pub fn contains(&self, word: &str) -> bool {
        Self::normalize(word).is_some_and(|word| self.words.contains(&word))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for RootWordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<S: AsRef<str>> Extend<S> for RootWordSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for word in iter {
            self.insert(word.as_ref());
        }
    }
}
