//! HTML output (innerHTML / outerHTML)
//!
//! Walks the arena with an explicit stack, so deeply nested pages cannot
//! overflow the call stack.

use vl_dom::{DomTree, NodeData, NodeId};

/// Elements that never have an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose text children are written back unescaped
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "iframe", "xmp"];

#[derive(Clone, Copy, PartialEq, Eq)]
enum Escape {
    Text,
    Attribute,
}

fn escape_into(out: &mut String, input: &str, mode: Escape) {
    for c in input.chars() {
        match (c, mode) {
            ('&', _) => out.push_str("&amp;"),
            ('<', _) => out.push_str("&lt;"),
            ('>', _) => out.push_str("&gt;"),
            ('\u{a0}', _) => out.push_str("&nbsp;"),
            ('"', Escape::Attribute) => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

enum Step {
    Open(NodeId),
    Close(NodeId),
}

/// Serializes `vl-dom` subtrees
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSerializer;

impl HtmlSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Children of `node_id`, without the node itself
    pub fn serialize_inner(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut out = String::new();
        if self.is_raw_text(tree, node_id) {
            self.write_raw_children(tree, node_id, &mut out);
        } else {
            let steps = tree.child_ids(node_id).into_iter().rev().map(Step::Open).collect();
            self.run(tree, steps, &mut out);
        }
        out
    }

    /// `node_id` and everything below it
    pub fn serialize_outer(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut out = String::new();
        self.run(tree, vec![Step::Open(node_id)], &mut out);
        out
    }

    fn is_raw_text(&self, tree: &DomTree, id: NodeId) -> bool {
        tree.tag_name(id).is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag))
    }

    fn write_raw_children(&self, tree: &DomTree, id: NodeId, out: &mut String) {
        for (_, child) in tree.children(id) {
            if let Some(text) = child.as_text() {
                out.push_str(text);
            }
        }
    }

    fn run(&self, tree: &DomTree, mut stack: Vec<Step>, out: &mut String) {
        while let Some(step) = stack.pop() {
            let id = match step {
                Step::Open(id) => id,
                Step::Close(id) => {
                    if let Some(tag) = tree.tag_name(id) {
                        out.push_str("</");
                        out.push_str(tag);
                        out.push('>');
                    }
                    continue;
                }
            };
            let Some(node) = tree.get(id) else { continue };

            match &node.data {
                NodeData::Document => {
                    stack.extend(tree.child_ids(id).into_iter().rev().map(Step::Open));
                }
                NodeData::Doctype { name, .. } => {
                    out.push_str("<!DOCTYPE ");
                    out.push_str(name);
                    out.push('>');
                }
                NodeData::Comment(text) => {
                    out.push_str("<!--");
                    out.push_str(text);
                    out.push_str("-->");
                }
                NodeData::Text(text) => escape_into(out, &text.content, Escape::Text),
                NodeData::Element(elem) => {
                    let tag = tree.resolve(elem.name);
                    out.push('<');
                    out.push_str(tag);
                    for attr in &elem.attrs {
                        out.push(' ');
                        out.push_str(tree.resolve(attr.name));
                        if !attr.value.is_empty() {
                            out.push_str("=\"");
                            escape_into(out, &attr.value, Escape::Attribute);
                            out.push('"');
                        }
                    }
                    out.push('>');

                    if VOID_ELEMENTS.contains(&tag) {
                        continue;
                    }
                    if RAW_TEXT_ELEMENTS.contains(&tag) {
                        self.write_raw_children(tree, id, out);
                        stack.push(Step::Close(id));
                    } else {
                        stack.push(Step::Close(id));
                        stack.extend(tree.child_ids(id).into_iter().rev().map(Step::Open));
                    }
                }
            }
        }
    }
}

/// innerHTML of a node
pub fn inner_html(tree: &DomTree, node_id: NodeId) -> String {
    HtmlSerializer::new().serialize_inner(tree, node_id)
}

/// outerHTML of a node
pub fn outer_html(tree: &DomTree, node_id: NodeId) -> String {
    HtmlSerializer::new().serialize_outer(tree, node_id)
}
