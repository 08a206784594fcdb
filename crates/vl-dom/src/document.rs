//! Document - High-level document API

use crate::{DomResult, DomTree, Node, NodeId};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a new document with an html/head/body skeleton
    pub fn new(url: &str) -> DomResult<Self> {
        let mut doc = Self::empty(url);
        let tree = &mut doc.tree;
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");
        tree.append_child(tree.root(), html)?;
        tree.append_child(html, head)?;
        tree.append_child(html, body)?;

        doc.finalize();
        Ok(doc)
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Locate html/head/body after the tree was built externally
    pub fn finalize(&mut self) {
        self.html_element = self.find_child_element(self.tree.root(), "html");
        if self.html_element.is_valid() {
            self.head_element = self.find_child_element(self.html_element, "head");
            self.body_element = self.find_child_element(self.html_element, "body");
        }
    }

    fn find_child_element(&self, parent: NodeId, tag: &str) -> NodeId {
        self.tree
            .children(parent)
            .find(|(id, _)| self.tree.tag_name(*id) == Some(tag))
            .map_or(NodeId::NONE, |(id, _)| id)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Text of `<head><title>`, empty when missing
    pub fn title(&self) -> String {
        if !self.head_element.is_valid() {
            return String::new();
        }
        let title = self.find_child_element(self.head_element, "title");
        if title.is_valid() {
            self.tree.text_content(title)
        } else {
            String::new()
        }
    }

    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// `NONE` for documents built without a skeleton
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Body if present, otherwise the document node
    pub fn content_root(&self) -> NodeId {
        if self.body_element.is_valid() {
            self.body_element
        } else {
            self.tree.root()
        }
    }

    /// First element whose `id` attribute equals `id`
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&node| self.tree.get_attribute(node, "id") == Some(id))
    }

    /// Elements carrying `class`, in document order
    pub fn get_elements_by_class_name(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        self.tree
            .descendants(root)
            .into_iter()
            .filter(|&node| self.tree.has_class(node, class))
            .collect()
    }

    pub fn text_content(&self) -> String {
        self.tree.text_content(self.tree.root())
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Number of element nodes attached to the document
    pub fn element_count(&self) -> usize {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .filter(|&id| self.tree.get(id).is_some_and(Node::is_element))
            .count()
    }
}
