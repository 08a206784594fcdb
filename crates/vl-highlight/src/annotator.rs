//! DOM annotation pass
//!
//! Walks a subtree once, replacing each text node that contains matches with
//! a fragment of plain text and marker elements. Child lists are
//! snapshotted before recursing and every replacement is built completely
//! before it is swapped in, so the walk never observes a half-rewritten node.
//!
//! Marker shapes:
//! - exact or self-attributed: `<span class=marker data-word=root style=bg>token</span>`
//! - variant: `<span class=marker data-word=root title=..>pre<span class=root style=bg>root</span>post</span>`

use std::collections::BTreeSet;

use serde::Serialize;
use vl_dom::{DocumentFragment, DomError, DomTree, NodeData, NodeId};

use crate::{HighlightConfig, HighlightResult, MatchSpan, RootWordSet, WordPattern};

/// Counters for one pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub text_nodes_scanned: usize,
    pub text_nodes_rewritten: usize,
    pub markers_created: usize,
    pub subtrees_skipped: usize,
    /// Nodes abandoned because the tree changed under them
    pub errors: usize,
}

impl PassReport {
    /// Whether the pass touched the tree at all
    pub fn mutated(&self) -> bool {
        self.text_nodes_rewritten > 0
    }
}

/// One annotation pass over a document
pub struct Annotator<'a> {
    config: &'a HighlightConfig,
    roots: &'a RootWordSet,
    pattern: &'a WordPattern,
    color: &'a str,
}

impl<'a> Annotator<'a> {
    pub fn new(
        config: &'a HighlightConfig,
        roots: &'a RootWordSet,
        pattern: &'a WordPattern,
        color: &'a str,
    ) -> Self {
        Self {
            config,
            roots,
            pattern,
            color,
        }
    }

    /// Annotate everything under (and including) `root`
    pub fn annotate(&self, tree: &mut DomTree, root: NodeId) -> PassReport {
        let mut report = PassReport::default();
        if self.pattern.is_noop() {
            tracing::debug!("No saved words; skipping annotation");
            return report;
        }
        self.visit(tree, root, &mut report);
        tracing::debug!(
            "Annotation pass: {} text nodes scanned, {} markers, {} errors",
            report.text_nodes_scanned,
            report.markers_created,
            report.errors
        );
        report
    }

    /// Depth-first walk in document order over child-list snapshots
    fn visit(&self, tree: &mut DomTree, root: NodeId, report: &mut PassReport) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = tree.get(id) else {
                tracing::warn!("Skipping missing node {:?}", id);
                report.errors += 1;
                continue;
            };

            match &node.data {
                NodeData::Text(_) => {
                    report.text_nodes_scanned += 1;
                    if let Err(err) = self.visit_text(tree, id, report) {
                        tracing::warn!("Leaving text node {:?} unhighlighted: {}", id, err);
                        report.errors += 1;
                    }
                }
                NodeData::Element(_) if is_excluded(tree, id, self.config) => {
                    report.subtrees_skipped += 1;
                }
                NodeData::Element(_) | NodeData::Document => {
                    stack.extend(tree.child_ids(id).into_iter().rev());
                }
                NodeData::Doctype { .. } | NodeData::Comment(_) => {}
            }
        }
    }

    fn visit_text(
        &self,
        tree: &mut DomTree,
        id: NodeId,
        report: &mut PassReport,
    ) -> HighlightResult<()> {
        if !tree.is_attached(id) {
            return Err(DomError::Detached(id).into());
        }
        let parent = tree.parent(id).ok_or(DomError::Detached(id))?;
        let text = tree
            .get(id)
            .and_then(|node| node.as_text())
            .ok_or(DomError::NotFound(id))?
            .to_string();

        let spans = self.pattern.scan(&text, self.roots);
        if spans.is_empty() {
            return Ok(());
        }

        let fragment = self.build_fragment(tree, &text, &spans)?;
        tree.replace_with_fragment(parent, id, fragment)?;
        tree.release(id)?;

        report.text_nodes_rewritten += 1;
        report.markers_created += spans.len();
        Ok(())
    }

    /// Detached replacement for one text node
    fn build_fragment(
        &self,
        tree: &mut DomTree,
        text: &str,
        spans: &[MatchSpan],
    ) -> HighlightResult<DocumentFragment> {
        let mut fragment = DocumentFragment::new();
        let mut cursor = 0;
        for span in spans {
            if span.start > cursor {
                fragment.append(tree.create_text(&text[cursor..span.start]));
            }
            fragment.append(self.create_marker(tree, span)?);
            cursor = span.end;
        }
        if cursor < text.len() {
            fragment.append(tree.create_text(&text[cursor..]));
        }
        Ok(fragment)
    }

    fn create_marker(&self, tree: &mut DomTree, span: &MatchSpan) -> HighlightResult<NodeId> {
        let attribution = &span.attribution;
        let background = format!("background-color: {}", self.color);

        let marker = tree.create_element("span");
        tree.set_attribute(marker, "class", &self.config.marker_class)?;
        tree.set_attribute(marker, &self.config.word_attribute, &attribution.root)?;

        if !attribution.kind.is_variant() {
            tree.set_attribute(marker, "style", &background)?;
            let text = tree.create_text(&span.literal);
            tree.append_child(marker, text)?;
            return Ok(marker);
        }

        tree.set_attribute(marker, "style", "cursor: pointer;")?;
        tree.set_attribute(marker, "title", &self.config.marker_title)?;

        let (before, root_text, after) = attribution.split(&span.literal);
        if !before.is_empty() {
            let text = tree.create_text(before);
            tree.append_child(marker, text)?;
        }
        let inner = tree.create_element("span");
        tree.set_attribute(inner, "class", &self.config.root_class)?;
        tree.set_attribute(inner, "style", &background)?;
        let text = tree.create_text(root_text);
        tree.append_child(inner, text)?;
        tree.append_child(marker, inner)?;
        if !after.is_empty() {
            let text = tree.create_text(after);
            tree.append_child(marker, text)?;
        }
        Ok(marker)
    }
}

/// Markers, injected overlays and non-content elements are never scanned
fn is_excluded(tree: &DomTree, id: NodeId, config: &HighlightConfig) -> bool {
    if tree.tag_name(id).is_some_and(|tag| config.skips_tag(tag)) {
        return true;
    }
    tree.has_class(id, &config.marker_class)
        || config
            .overlay_classes
            .iter()
            .any(|class| tree.has_class(id, class))
}

/// Outermost markers under `root`, in document order
fn outer_markers(tree: &DomTree, root: NodeId, config: &HighlightConfig) -> Vec<NodeId> {
    let mut found = Vec::new();
    let mut stack: Vec<NodeId> = tree.child_ids(root).into_iter().rev().collect();
    while let Some(id) = stack.pop() {
        if tree.has_class(id, &config.marker_class) {
            found.push(id);
        } else {
            stack.extend(tree.child_ids(id).into_iter().rev());
        }
    }
    found
}

/// Replace every marker under `root` with its plain text and re-merge the
/// split text nodes. Returns the number of markers removed.
///
/// Removed markers are released back to the arena, so repeated
/// annotate/strip cycles reuse the same slots.
pub fn strip_markers(tree: &mut DomTree, root: NodeId, config: &HighlightConfig) -> usize {
    let found = outer_markers(tree, root, config);

    let mut parents = BTreeSet::new();
    let mut removed = 0;
    for marker in found {
        let Some(parent) = tree.parent(marker) else {
            continue;
        };
        let text = tree.text_content(marker);
        let replacement = tree.create_text(&text);
        let stripped = tree
            .replace_child(parent, replacement, marker)
            .and_then(|_| tree.release(marker));
        match stripped {
            Ok(_) => {
                parents.insert(parent);
                removed += 1;
            }
            Err(err) => tracing::warn!("Could not strip marker {:?}: {}", marker, err),
        }
    }

    for parent in parents {
        if let Err(err) = tree.normalize(parent) {
            tracing::warn!("Could not normalize {:?}: {}", parent, err);
        }
    }
    if removed > 0 {
        tracing::debug!("Stripped {} markers", removed);
    }
    removed
}

/// What a hover or click on a marker hands to the translation UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerHit {
    pub marker: NodeId,
    /// Attributed root word
    pub root: String,
    /// The inflected text actually shown on the page
    pub display_text: String,
}

/// Resolve an event target to the marker containing it, if any
pub fn marker_at(tree: &DomTree, target: NodeId, config: &HighlightConfig) -> Option<MarkerHit> {
    let mut current = target;
    while current.is_valid() {
        if tree.has_class(current, &config.marker_class) {
            let root = tree.get_attribute(current, &config.word_attribute)?;
            return Some(MarkerHit {
                marker: current,
                root: root.to_string(),
                display_text: tree.text_content(current),
            });
        }
        current = tree.parent(current).unwrap_or(NodeId::NONE);
    }
    None
}

/// All markers under `root`, in document order
pub fn markers(tree: &DomTree, root: NodeId, config: &HighlightConfig) -> Vec<MarkerHit> {
    tree.descendants(root)
        .into_iter()
        .filter(|&id| tree.has_class(id, &config.marker_class))
        .filter_map(|id| marker_at(tree, id, config))
        .collect()
}
