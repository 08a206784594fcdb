//! vocab-lens highlighting engine
//!
//! Turns a saved-word set into one whole-word pattern covering every
//! mechanically generated inflection, then rewrites a document so each match
//! is wrapped in a marker that remembers which saved word it came from.
//!
//! # Example
//! ```rust,ignore
//! use vl_highlight::{HighlightConfig, HighlightContext, HighlightEvent};
//!
//! let mut ctx = HighlightContext::new(HighlightConfig::default());
//! ctx.apply(HighlightEvent::WordAdded("study".into()));
//! let report = ctx.refresh(doc.tree_mut(), body);
//! ```

mod annotator;
mod config;
mod context;
mod error;
mod matcher;
mod pattern;
mod stemmer;
mod words;

pub use annotator::{Annotator, MarkerHit, PassReport, marker_at, markers, strip_markers};
pub use config::HighlightConfig;
pub use context::{HighlightContext, HighlightEvent};
pub use error::{HighlightError, HighlightResult};
pub use matcher::{Attribution, MatchKind, MatchSpan, attribute};
pub use pattern::{CompiledPattern, PatternBuilder, WordPattern};
pub use stemmer::{STEM_CHANGE_SUFFIXES, VALID_SUFFIXES, stem};
pub use words::RootWordSet;
