//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it to the arena DOM. Whitespace-only
//! text is kept so that annotating and stripping a page never changes its
//! text content.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use vl_dom::{Document, DomTree, NodeId};

use crate::ParseError;

/// HTML5 parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, ParseError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, ParseError> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut document = Document::empty(url);
        let root = document.tree().root();
        self.convert_node(&dom.document, document.tree_mut(), root)?;
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Copy an RcDom subtree into the arena, depth-first with an explicit
    /// stack so nesting depth is bounded only by memory
    fn convert_node(
        &self,
        handle: &Handle,
        tree: &mut DomTree,
        parent: NodeId,
    ) -> Result<(), ParseError> {
        let mut stack: Vec<(Handle, NodeId)> = vec![(handle.clone(), parent)];
        while let Some((handle, parent)) = stack.pop() {
            let children_parent = match &handle.data {
                RcNodeData::Document => Some(parent),
                RcNodeData::Doctype {
                    name,
                    public_id,
                    system_id,
                } => {
                    let id = tree.create_doctype(name, public_id, system_id);
                    tree.append_child(parent, id)?;
                    None
                }
                RcNodeData::Text { contents } => {
                    let text = contents.borrow();
                    if !text.is_empty() {
                        let id = tree.create_text(&text);
                        tree.append_child(parent, id)?;
                    }
                    None
                }
                RcNodeData::Comment { contents } => {
                    let id = tree.create_comment(contents);
                    tree.append_child(parent, id)?;
                    None
                }
                RcNodeData::Element { name, attrs, .. } => {
                    let id = tree.create_element(&name.local);
                    for attr in attrs.borrow().iter() {
                        tree.set_attribute(id, &attr.name.local, &attr.value)?;
                    }
                    tree.append_child(parent, id)?;
                    Some(id)
                }
                RcNodeData::ProcessingInstruction { .. } => None,
            };

            if let Some(target) = children_parent {
                let children = handle.children.borrow();
                stack.extend(children.iter().rev().map(|child| (child.clone(), target)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html).unwrap();

        assert!(doc.body().is_valid());
        assert_eq!(doc.title(), "Test");
        assert_eq!(doc.tree().text_content(doc.body()), "Hello");
    }

    #[test]
    fn test_parse_fragment_gets_skeleton() {
        let doc = HtmlParser::new().parse("<div><span>Text</span></div>").unwrap();
        assert!(doc.document_element().is_valid());
        assert!(doc.head().is_valid());
        assert_eq!(doc.tree().text_content(doc.body()), "Text");
    }

    #[test]
    fn test_whitespace_text_is_kept() {
        let doc = HtmlParser::new()
            .parse("<body><b>a</b> <i>b</i></body>")
            .unwrap();
        assert_eq!(doc.tree().text_content(doc.body()), "a b");
    }

    #[test]
    fn test_classes_are_cached() {
        let doc = HtmlParser::new()
            .parse(r#"<div class="lv-tooltip extra">x</div>"#)
            .unwrap();
        let tooltip = doc.get_elements_by_class_name(doc.body(), "lv-tooltip");
        assert_eq!(tooltip.len(), 1);
        assert!(doc.tree().has_class(tooltip[0], "extra"));
    }

    #[test]
    fn test_deeply_nested_page() {
        let depth = 10_000;
        let html = format!("{}cat{}", "<div>".repeat(depth), "</div>".repeat(depth));
        let doc = HtmlParser::new().parse(&html).unwrap();
        assert_eq!(doc.tree().text_content(doc.body()), "cat");
        assert_eq!(doc.element_count(), depth + 3);
    }
}
