//! Highlighting state for one document
//!
//! Holds the current root words, highlight color and compiled pattern.
//! Word-list changes invalidate the pattern; it is rebuilt lazily on the
//! next refresh. A refresh always strips existing markers before
//! re-annotating, so repeated refreshes never nest markers.

use vl_dom::{DomTree, NodeId};

use crate::{
    Annotator, HighlightConfig, PassReport, PatternBuilder, RootWordSet, WordPattern,
    strip_markers,
};

/// Change notifications from the word store or settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightEvent {
    /// The whole list was replaced
    WordsChanged(RootWordSet),
    WordAdded(String),
    WordRemoved(String),
    /// Words brought in by an import
    WordsMerged(Vec<String>),
    ColorChanged(String),
}

#[derive(Debug)]
pub struct HighlightContext {
    config: HighlightConfig,
    roots: RootWordSet,
    color: String,
    pattern: Option<WordPattern>,
    pending: bool,
}

impl HighlightContext {
    pub fn new(config: HighlightConfig) -> Self {
        let color = config.default_color.clone();
        Self {
            config,
            roots: RootWordSet::new(),
            color,
            pattern: None,
            pending: false,
        }
    }

    pub fn with_words<I, S>(config: HighlightConfig, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut context = Self::new(config);
        context.roots.extend(words);
        context.pending = !context.roots.is_empty();
        context
    }

    pub fn roots(&self) -> &RootWordSet {
        &self.roots
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// Whether an applied event has not been rendered yet
    pub fn needs_refresh(&self) -> bool {
        self.pending
    }

    /// Update state from an event without touching any document.
    /// Returns whether anything changed.
    pub fn apply(&mut self, event: HighlightEvent) -> bool {
        let words_changed = match event {
            HighlightEvent::WordsChanged(roots) => {
                let changed = roots != self.roots;
                self.roots = roots;
                changed
            }
            HighlightEvent::WordAdded(word) => self.roots.insert(&word),
            HighlightEvent::WordRemoved(word) => self.roots.remove(&word),
            HighlightEvent::WordsMerged(words) => {
                let before = self.roots.len();
                self.roots.extend(words);
                self.roots.len() != before
            }
            HighlightEvent::ColorChanged(color) => {
                if color == self.color {
                    return false;
                }
                self.color = color;
                self.pending = true;
                return true;
            }
        };

        if words_changed {
            self.pattern = None;
            self.pending = true;
        }
        words_changed
    }

    /// Strip and re-annotate everything under `root`
    pub fn refresh(&mut self, tree: &mut DomTree, root: NodeId) -> PassReport {
        let stripped = strip_markers(tree, root, &self.config);

        let builder = PatternBuilder::new(self.config.regex_size_limit);
        let roots = &self.roots;
        let pattern = self
            .pattern
            .get_or_insert_with(|| builder.build_or_noop(roots));

        let report = Annotator::new(&self.config, &self.roots, pattern, &self.color)
            .annotate(tree, root);
        self.pending = false;

        tracing::info!(
            "Refreshed highlights: {} stripped, {} created over {} words",
            stripped,
            report.markers_created,
            self.roots.len()
        );
        report
    }

    /// Apply one event and refresh if it changed anything
    pub fn handle(
        &mut self,
        event: HighlightEvent,
        tree: &mut DomTree,
        root: NodeId,
    ) -> Option<PassReport> {
        self.apply(event);
        if !self.pending {
            return None;
        }
        Some(self.refresh(tree, root))
    }

    /// Apply a burst of events, then refresh at most once
    pub fn handle_batch<I>(&mut self, events: I, tree: &mut DomTree, root: NodeId) -> Option<PassReport>
    where
        I: IntoIterator<Item = HighlightEvent>,
    {
        for event in events {
            self.apply(event);
        }
        if !self.pending {
            return None;
        }
        Some(self.refresh(tree, root))
    }
}

impl Default for HighlightContext {
    fn default() -> Self {
        Self::new(HighlightConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(text: &str) -> (DomTree, NodeId) {
        let mut tree = DomTree::new();
        let body = tree.create_element("body");
        tree.append_child(tree.root(), body).unwrap();
        let t = tree.create_text(text);
        tree.append_child(body, t).unwrap();
        (tree, body)
    }

    #[test]
    fn test_word_change_invalidates_pattern() {
        let mut ctx = HighlightContext::with_words(HighlightConfig::default(), ["cat"]);
        let (mut tree, body) = page("cat dog");
        ctx.refresh(&mut tree, body);
        assert!(ctx.pattern.is_some());
        assert!(!ctx.needs_refresh());

        assert!(ctx.apply(HighlightEvent::WordAdded("dog".into())));
        assert!(ctx.pattern.is_none());
        assert!(ctx.needs_refresh());
    }

    #[test]
    fn test_redundant_events_do_not_refresh() {
        let mut ctx = HighlightContext::with_words(HighlightConfig::default(), ["cat"]);
        let (mut tree, body) = page("cat");
        ctx.refresh(&mut tree, body);

        assert!(ctx.handle(HighlightEvent::WordAdded("CAT".into()), &mut tree, body).is_none());
        assert!(ctx.handle(HighlightEvent::WordRemoved("dog".into()), &mut tree, body).is_none());
        let color = ctx.color().to_string();
        assert!(ctx.handle(HighlightEvent::ColorChanged(color), &mut tree, body).is_none());
    }

    #[test]
    fn test_color_change_keeps_pattern() {
        let mut ctx = HighlightContext::with_words(HighlightConfig::default(), ["cat"]);
        let (mut tree, body) = page("cat");
        ctx.refresh(&mut tree, body);

        let report = ctx
            .handle(HighlightEvent::ColorChanged("red".into()), &mut tree, body)
            .unwrap();
        assert!(ctx.pattern.is_some());
        assert_eq!(report.markers_created, 1);
        let marker = tree.child_ids(body)[0];
        assert_eq!(tree.get_attribute(marker, "style"), Some("background-color: red"));
    }

    #[test]
    fn test_batch_refreshes_once() {
        let mut ctx = HighlightContext::default();
        let (mut tree, body) = page("cat and dog");
        let report = ctx
            .handle_batch(
                [
                    HighlightEvent::WordAdded("cat".into()),
                    HighlightEvent::WordsMerged(vec!["dog".into(), "cat".into()]),
                ],
                &mut tree,
                body,
            )
            .unwrap();
        assert_eq!(report.markers_created, 2);
        assert_eq!(ctx.roots().len(), 2);
    }

    #[test]
    fn test_removing_last_word_clears_markers() {
        let mut ctx = HighlightContext::with_words(HighlightConfig::default(), ["cat"]);
        let (mut tree, body) = page("the cat");
        ctx.refresh(&mut tree, body);
        assert_eq!(tree.child_ids(body).len(), 2);

        let report = ctx
            .handle(HighlightEvent::WordRemoved("cat".into()), &mut tree, body)
            .unwrap();
        assert_eq!(report.markers_created, 0);
        assert_eq!(tree.child_ids(body).len(), 1);
        assert_eq!(tree.text_content(body), "the cat");
    }

    #[test]
    fn test_repeated_refresh_reuses_arena_slots() {
        let mut ctx = HighlightContext::with_words(HighlightConfig::default(), ["cat", "run"]);
        let (mut tree, body) = page("the cat and the running dog");
        ctx.refresh(&mut tree, body);
        let settled = tree.len();

        for _ in 0..1_000 {
            let report = ctx.refresh(&mut tree, body);
            assert_eq!(report.markers_created, 2);
        }
        assert_eq!(tree.len(), settled);
        assert_eq!(tree.text_content(body), "the cat and the running dog");
    }
}
