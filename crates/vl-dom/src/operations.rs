//! DOM Node Operations
//!
//! Error type for tree surgery and the detached fragment used to stage a
//! replacement before it is swapped into the tree.

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found
    #[error("node {0:?} not found")]
    NotFound(NodeId),
    /// Hierarchy error (e.g., inserting an ancestor into its descendant)
    #[error("hierarchy request error")]
    HierarchyRequest,
    /// Invalid node type for the operation
    #[error("invalid node type for {0}")]
    InvalidNodeType(&'static str),
    /// Node is not a child of the given parent
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
    /// Node is no longer attached to the document
    #[error("node {0:?} is detached from the document")]
    Detached(NodeId),
    /// Only detached subtrees can be released
    #[error("node {0:?} is still attached")]
    StillAttached(NodeId),
}

/// Document fragment - detached nodes waiting to be inserted together
#[derive(Debug, Clone, Default)]
pub struct DocumentFragment {
    pub children: Vec<NodeId>,
}

impl DocumentFragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, node: NodeId) {
        self.children.push(node);
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Take all children (clears fragment)
    pub fn take_children(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.children)
    }
}
