//! Highlighting errors

use vl_dom::DomError;

pub type HighlightResult<T> = Result<T, HighlightError>;

#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    /// The stemmer was handed something that is not a word
    #[error("invalid root word {word:?}: {reason}")]
    InvalidInput { word: String, reason: &'static str },

    /// The combined alternation did not compile
    #[error("failed to compile word pattern: {0}")]
    PatternCompilation(#[from] regex::Error),

    /// A node went stale between snapshot and replacement
    #[error("DOM mutation failed: {0}")]
    DomMutation(#[from] DomError),
}
