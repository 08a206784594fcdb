//! DOM Tree (arena-based allocation)

use crate::{
    DocumentFragment, DomError, DomResult, InternedString, Node, NodeData, NodeId,
    StringInterner,
};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    /// Released slots, reused by `create_*`
    free: Vec<NodeId>,
    interner: StringInterner,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            free: Vec::new(),
            interner: StringInterner::new(),
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Arena size: live and detached nodes plus released slots
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Released slots waiting to be reused
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve an interned name
    #[inline]
    pub fn resolve(&self, id: InternedString) -> &str {
        self.interner.get(id)
    }

    pub fn intern(&mut self, s: &str) -> InternedString {
        self.interner.intern(s)
    }

    fn push(&mut self, node: Node) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.index()] = node;
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Return a detached subtree's slots to the arena.
    ///
    /// Every ID in the subtree becomes invalid and may be handed out again by
    /// the next `create_*` call. Returns the number of slots released.
    pub fn release(&mut self, id: NodeId) -> DomResult<usize> {
        let node = self.node(id)?;
        if id == NodeId::ROOT || node.parent.is_valid() {
            return Err(DomError::StillAttached(id));
        }
        let mut stack = vec![id];
        let mut released = 0;
        while let Some(current) = stack.pop() {
            stack.extend(self.child_ids(current));
            self.nodes[current.index()] = Node::text("");
            self.free.push(current);
            released += 1;
        }
        Ok(released)
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.get_mut(id).ok_or(DomError::NotFound(id))
    }

    // ------------------------------------------------------------------
    // Node creation. New nodes start detached.
    // ------------------------------------------------------------------

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let name = self.interner.intern(&tag.to_ascii_lowercase());
        self.push(Node::element(name))
    }

    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content))
    }

    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.push(Node::doctype(
            name.to_string(),
            public_id.to_string(),
            system_id.to_string(),
        ))
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Set an attribute; `class` also refreshes the cached class list
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let name_id = self.interner.intern(name);
        let classes: Vec<InternedString> = if name == "class" {
            value
                .split_whitespace()
                .map(|class| self.interner.intern(class))
                .collect()
        } else {
            Vec::new()
        };

        let elem = self
            .node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType("set_attribute"))?;
        elem.set_attr(name_id, value.to_string());
        if name == "class" {
            elem.classes = classes;
        }
        Ok(())
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        let name_id = self.interner.lookup(name)?;
        self.get(id)?.as_element()?.get_attr(name_id)
    }

    /// Whether an element carries the class. Unknown class names never match.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        let Some(class_id) = self.interner.lookup(class) else {
            return false;
        };
        self.get(id)
            .and_then(Node::as_element)
            .is_some_and(|elem| elem.has_class(class_id))
    }

    /// Lower-case tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        let elem = self.get(id)?.as_element()?;
        Some(self.resolve(elem.name))
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    /// Iterate over the live child list
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let next = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        Children { tree: self, next }
    }

    /// Snapshot of the child IDs, safe to hold across mutation
    pub fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).map(|(child, _)| child).collect()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Whether the node is still reachable from the document node
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == NodeId::ROOT {
                return true;
            }
            match self.get(current) {
                Some(node) if node.parent.is_valid() => current = node.parent,
                _ => return false,
            }
        }
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = node;
        while current.is_valid() {
            if current == ancestor {
                return true;
            }
            current = self.get(current).map_or(NodeId::NONE, |n| n.parent);
        }
        false
    }

    /// Descendants of `root` in document order, `root` excluded
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.child_ids(root).into_iter().rev().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.child_ids(id).into_iter().rev());
        }
        out
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            out.push_str(text);
            return out;
        }
        for desc in self.descendants(id) {
            if let Some(text) = self.get(desc).and_then(Node::as_text) {
                out.push_str(text);
            }
        }
        out
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let parent_node = self.node(parent)?;
        self.node(child)?;
        if matches!(parent_node.data, NodeData::Text(_) | NodeData::Comment(_)) {
            return Err(DomError::InvalidNodeType("insert into leaf"));
        }
        if child == NodeId::ROOT || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        Ok(())
    }

    /// Unlink a node from its parent and siblings, if it has any
    fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else { return };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else if parent.is_valid() {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else if parent.is_valid() {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Append a child node, moving it if it is already attached elsewhere
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert `new_child` before `ref_child`, or at the end when `None`
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        ref_child: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.check_insertable(parent, new_child)?;
        if let Some(reference) = ref_child {
            if self.node(reference)?.parent != parent {
                return Err(DomError::NotAChild {
                    parent,
                    child: reference,
                });
            }
            if reference == new_child {
                return Ok(new_child);
            }
        }

        self.detach(new_child);

        match ref_child {
            Some(reference) => {
                let prev = self.nodes[reference.index()].prev_sibling;
                {
                    let node = &mut self.nodes[new_child.index()];
                    node.parent = parent;
                    node.prev_sibling = prev;
                    node.next_sibling = reference;
                }
                self.nodes[reference.index()].prev_sibling = new_child;
                if prev.is_valid() {
                    self.nodes[prev.index()].next_sibling = new_child;
                } else {
                    self.nodes[parent.index()].first_child = new_child;
                }
            }
            None => {
                let last = self.nodes[parent.index()].last_child;
                {
                    let node = &mut self.nodes[new_child.index()];
                    node.parent = parent;
                    node.prev_sibling = last;
                    node.next_sibling = NodeId::NONE;
                }
                if last.is_valid() {
                    self.nodes[last.index()].next_sibling = new_child;
                } else {
                    self.nodes[parent.index()].first_child = new_child;
                }
                self.nodes[parent.index()].last_child = new_child;
            }
        }

        Ok(new_child)
    }

    /// Remove a child node; it stays in the arena, detached
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if self.node(child)?.parent != parent {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child);
        Ok(child)
    }

    /// Replace `old_child` with `new_child`
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> DomResult<NodeId> {
        if self.node(old_child)?.parent != parent {
            return Err(DomError::NotAChild {
                parent,
                child: old_child,
            });
        }
        self.insert_before(parent, new_child, Some(old_child))?;
        self.detach(old_child);
        Ok(old_child)
    }

    /// Swap a fully built fragment in for `old_child` in one step.
    ///
    /// Every fragment node is validated before the tree is touched, so a
    /// failure leaves the tree unchanged.
    pub fn replace_with_fragment(
        &mut self,
        parent: NodeId,
        old_child: NodeId,
        mut fragment: DocumentFragment,
    ) -> DomResult<()> {
        if !self.is_attached(parent) {
            return Err(DomError::Detached(parent));
        }
        if self.node(old_child)?.parent != parent {
            return Err(DomError::NotAChild {
                parent,
                child: old_child,
            });
        }
        let children = fragment.take_children();
        for &child in &children {
            self.check_insertable(parent, child)?;
        }
        let count = children.len();
        for child in children {
            self.insert_before(parent, child, Some(old_child))?;
        }
        self.detach(old_child);
        tracing::trace!("Replaced {:?} with {} nodes", old_child, count);
        Ok(())
    }

    /// Merge adjacent text nodes and drop empty ones below `id`.
    ///
    /// Merged-away text nodes are released back to the arena.
    pub fn normalize(&mut self, id: NodeId) -> DomResult<()> {
        self.node(id)?;
        let mut stack = vec![id];
        while let Some(parent) = stack.pop() {
            let mut previous_text: Option<NodeId> = None;
            for child in self.child_ids(parent) {
                let text = self.nodes[child.index()].as_text().map(str::to_owned);
                match text {
                    Some(content) if content.is_empty() => {
                        self.detach(child);
                        self.release(child)?;
                    }
                    Some(content) => match previous_text {
                        Some(prev) => {
                            if let NodeData::Text(data) = &mut self.nodes[prev.index()].data {
                                data.content.push_str(&content);
                            }
                            self.detach(child);
                            self.release(child)?;
                        }
                        None => previous_text = Some(child),
                    },
                    None => {
                        previous_text = None;
                        stack.push(child);
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a node's children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.next.is_valid() {
            return None;
        }
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}
