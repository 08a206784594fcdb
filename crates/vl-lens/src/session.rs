//! Word store ↔ document wiring

use vl_dom::{Document, NodeId};
use vl_highlight::{
    HighlightConfig, HighlightContext, HighlightEvent, MarkerHit, PassReport, RootWordSet,
    markers,
};
use vl_html::{HtmlParser, ParseError, outer_html};
use vl_words::{StoreEvent, TranslationResult, WordStore};

/// Highlighting consequence of a store change, if it has one
pub fn highlight_event(event: StoreEvent) -> Option<HighlightEvent> {
    match event {
        StoreEvent::Saved(word) => Some(HighlightEvent::WordAdded(word)),
        StoreEvent::Removed(word) | StoreEvent::MarkedKnown(word) => {
            Some(HighlightEvent::WordRemoved(word))
        }
        StoreEvent::UnmarkedKnown(_) | StoreEvent::KnownCleared => None,
        StoreEvent::Imported(words) => Some(HighlightEvent::WordsMerged(words)),
        StoreEvent::Cleared => Some(HighlightEvent::WordsChanged(RootWordSet::new())),
        StoreEvent::ColorChanged(color) => Some(HighlightEvent::ColorChanged(color)),
    }
}

/// One page being read, with the user's words
#[derive(Debug)]
pub struct Session {
    store: WordStore,
    context: HighlightContext,
    document: Document,
}

impl Session {
    pub fn new(document: Document, mut store: WordStore, config: HighlightConfig) -> Self {
        // Anything queued before the session existed is covered by the snapshot.
        store.drain_events();
        let mut context = HighlightContext::with_words(config, store.snapshot().iter());
        context.apply(HighlightEvent::ColorChanged(store.highlight_color().to_string()));
        Self {
            store,
            context,
            document,
        }
    }

    pub fn from_html(html: &str, store: WordStore) -> Result<Self, ParseError> {
        let document = HtmlParser::new().parse(html)?;
        Ok(Self::new(document, store, HighlightConfig::default()))
    }

    pub fn store(&self) -> &WordStore {
        &self.store
    }

    /// Changes made here reach the page on the next `refresh`
    pub fn store_mut(&mut self) -> &mut WordStore {
        &mut self.store
    }

    pub fn context(&self) -> &HighlightContext {
        &self.context
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Apply queued store changes to the highlight state. Returns whether
    /// the page needs re-annotating.
    fn forward_events(&mut self) -> bool {
        for event in self.store.drain_events() {
            if let Some(event) = highlight_event(event) {
                self.context.apply(event);
            }
        }
        self.context.needs_refresh()
    }

    /// Forward queued store changes and re-annotate once if any mattered
    pub fn refresh(&mut self) -> Option<PassReport> {
        if !self.forward_events() {
            return None;
        }
        Some(self.force_refresh())
    }

    /// Re-annotate unconditionally
    pub fn force_refresh(&mut self) -> PassReport {
        self.forward_events();
        let root = self.document.content_root();
        self.context.refresh(self.document.tree_mut(), root)
    }

    /// Marker under a hovered or clicked node
    pub fn marker_at(&self, node: NodeId) -> Option<MarkerHit> {
        vl_highlight::marker_at(self.document.tree(), node, self.context.config())
    }

    pub fn markers(&self) -> Vec<MarkerHit> {
        markers(
            self.document.tree(),
            self.document.content_root(),
            self.context.config(),
        )
    }

    /// Cached translation for a marker: the inflected form first, then its root
    pub fn translation_for(&self, hit: &MarkerHit) -> Option<&TranslationResult> {
        self.store.cached_translation(&hit.display_text, &hit.root)
    }

    /// The whole page as HTML
    pub fn html(&self) -> String {
        outer_html(self.document.tree(), self.document.tree().root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            highlight_event(StoreEvent::MarkedKnown("cat".into())),
            Some(HighlightEvent::WordRemoved("cat".into()))
        );
        assert_eq!(highlight_event(StoreEvent::UnmarkedKnown("cat".into())), None);
        assert_eq!(
            highlight_event(StoreEvent::Cleared),
            Some(HighlightEvent::WordsChanged(RootWordSet::new()))
        );
        assert_eq!(highlight_event(StoreEvent::KnownCleared), None);
    }

    #[test]
    fn test_first_refresh_uses_store_snapshot() {
        let mut store = WordStore::default();
        store.save_word("cat", None).unwrap();
        let mut session = Session::from_html("<p>a cat</p>", store).unwrap();

        let report = session.refresh().unwrap();
        assert_eq!(report.markers_created, 1);
        assert!(session.refresh().is_none());
    }

    #[test]
    fn test_store_changes_reach_the_page() {
        let mut session = Session::from_html("<p>cats and dogs</p>", WordStore::default()).unwrap();
        assert!(session.refresh().is_none());

        session.store_mut().save_word("dog", None).unwrap();
        session.store_mut().save_word("cat", None).unwrap();
        let report = session.refresh().unwrap();
        assert_eq!(report.markers_created, 2);

        session.store_mut().mark_known("dog").unwrap();
        session.refresh().unwrap();
        let roots: Vec<String> = session.markers().into_iter().map(|h| h.root).collect();
        assert_eq!(roots, vec!["cat"]);
    }

    #[test]
    fn test_clearing_words_removes_every_marker() {
        let mut store = WordStore::default();
        for word in ["cat", "dog", "run"] {
            store.save_word(word, None).unwrap();
        }
        let mut session = Session::from_html("<p>cats, dogs and running</p>", store).unwrap();
        let before = session.html();
        assert_eq!(session.refresh().unwrap().markers_created, 3);

        assert_eq!(session.store_mut().clear_words(), 3);
        let report = session.refresh().unwrap();
        assert_eq!(report.markers_created, 0);
        assert!(session.markers().is_empty());
        assert!(session.context().roots().is_empty());
        assert_eq!(session.html(), before);
    }

    #[test]
    fn test_long_session_does_not_grow_the_arena() {
        let mut store = WordStore::default();
        store.save_word("cat", None).unwrap();
        store.save_word("run", None).unwrap();
        let mut session = Session::from_html("<p>the cat keeps running</p>", store).unwrap();
        session.refresh().unwrap();
        let settled = session.document().tree().len();

        for i in 0..500 {
            let color = if i % 2 == 0 { "red" } else { "blue" };
            session.store_mut().set_highlight_color(color);
            assert_eq!(session.refresh().unwrap().markers_created, 2);
        }
        assert_eq!(session.document().tree().len(), settled);
    }
}
