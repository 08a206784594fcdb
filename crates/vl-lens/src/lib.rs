//! vocab-lens sessions
//!
//! A [`Session`] ties the word store to a parsed page: store changes become
//! highlight events, and one refresh re-annotates the page.

mod session;

pub use session::{Session, highlight_event};
pub use vl_highlight::{HighlightConfig, MarkerHit, PassReport};
pub use vl_words::{StoreConfig, WordStore};
