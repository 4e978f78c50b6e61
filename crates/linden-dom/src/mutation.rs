//! Tree mutation and flat-index bookkeeping.
//!
//! [§ 4.2.3 Mutation algorithms](https://dom.spec.whatwg.org/#mutation-algorithms)
//!
//! Every insertion validates all of its arguments before touching the tree,
//! so a failed call leaves the document unchanged.

use std::collections::HashSet;

use linden_common::{Error, Result};
use linden_tokenizer::{TokenKind, TokenizerOptions, tokenize};

use crate::{Document, NodeId, NodeType};

/// An argument to [`Document::append`]: an existing node or markup that is
/// turned into a leaf node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOrText {
    /// A node of the same document.
    Node(NodeId),
    /// Markup; its first token becomes a text or comment node.
    Text(String),
}

impl From<NodeId> for NodeOrText {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<&str> for NodeOrText {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for NodeOrText {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

macro_rules! node_or_text_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for NodeOrText {
                fn from(value: $ty) -> Self {
                    Self::Text(value.to_string())
                }
            }
        )*
    };
}

node_or_text_from_number!(i32, i64, u32, u64, usize, f64);

impl Document {
    /// [§ 4.2.3 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// Append nodes and text to `parent`, in order. Nodes are first removed
    /// from their current parent. Strings and numbers are tokenized and the
    /// first token becomes a text (or comment) leaf.
    ///
    /// # Errors
    ///
    /// Nothing is changed when any argument is rejected:
    /// - [`Error::NotANode`] for a handle this document does not own
    /// - [`Error::HierarchyRequest`] when `parent` cannot have children, or
    ///   a node is a document, `parent` itself or one of its ancestors
    pub fn append<I>(&mut self, parent: NodeId, items: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<NodeOrText>,
    {
        let items: Vec<NodeOrText> = items.into_iter().map(Into::into).collect();
        self.validate_insertion(parent, &items)?;
        self.insert_items(parent, items);
        Ok(())
    }

    /// Append a single node to `parent`.
    ///
    /// # Errors
    ///
    /// Same as [`append`](Self::append).
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId> {
        self.append(parent, [child])?;
        Ok(child)
    }

    /// [§ 4.2.3 Replace all](https://dom.spec.whatwg.org/#concept-node-replace-all)
    ///
    /// Remove every child of `parent`, then append `items`.
    ///
    /// # Errors
    ///
    /// Same as [`append`](Self::append); the old children stay in place
    /// when an argument is rejected.
    pub fn replace_children<I>(&mut self, parent: NodeId, items: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<NodeOrText>,
    {
        let items: Vec<NodeOrText> = items.into_iter().map(Into::into).collect();
        self.validate_insertion(parent, &items)?;
        for child in self.nodes[parent.0].children.clone() {
            self.detach(child);
        }
        self.insert_items(parent, items);
        Ok(())
    }

    /// Remove `child` from `parent` and return it. The removed subtree is
    /// left intact.
    ///
    /// # Errors
    ///
    /// - [`Error::NotANode`] for an unknown handle
    /// - [`Error::NotAChild`] when `child` is not a child of `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId> {
        self.check_exists(parent)?;
        self.check_exists(child)?;
        if self.nodes[child.0].parent != Some(parent) {
            return Err(Error::NotAChild {
                parent: parent.0,
                child: child.0,
            });
        }
        self.detach(child);
        Ok(child)
    }

    /// Remove a node from its parent, if it has one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotANode`] for an unknown handle.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        self.check_exists(id)?;
        self.detach(id);
        Ok(())
    }

    /// Add the elements of the subtree rooted at `id` to the flat index at
    /// their document-order position.
    ///
    /// Does nothing for nodes that are not connected to the document or
    /// whose elements are already indexed.
    pub fn register(&mut self, id: NodeId) {
        if !self.exists(id) || !self.hangs_off_index(id) {
            return;
        }
        let elements = self.subtree_elements(id);
        if elements.first().is_none_or(|first| self.nodes[first.0].indexed) {
            return;
        }

        let position = self.index_position(id);
        for element in &elements {
            self.nodes[element.0].indexed = true;
        }
        let _ = self.all.splice(position..position, elements);
    }

    /// Remove the elements of the subtree rooted at `id` from the flat
    /// index.
    pub fn deregister(&mut self, id: NodeId) {
        if !self.exists(id) {
            return;
        }
        let removed: HashSet<NodeId> = self
            .subtree_elements(id)
            .into_iter()
            .filter(|element| self.nodes[element.0].indexed)
            .collect();
        if removed.is_empty() {
            return;
        }
        for element in &removed {
            self.nodes[element.0].indexed = false;
        }
        self.all.retain(|e| !removed.contains(e));
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn check_exists(&self, id: NodeId) -> Result<()> {
        if self.exists(id) {
            Ok(())
        } else {
            Err(Error::NotANode(id.0))
        }
    }

    /// [§ 4.2.3 Ensure pre-insertion validity](https://dom.spec.whatwg.org/#concept-node-ensure-pre-insertion-validity)
    fn validate_insertion(&self, parent: NodeId, items: &[NodeOrText]) -> Result<()> {
        self.check_exists(parent)?;
        for item in items {
            // A text argument has no handle yet; report the one it would get.
            let child = match item {
                NodeOrText::Node(id) => {
                    self.check_exists(*id)?;
                    *id
                }
                NodeOrText::Text(_) => NodeId(self.len()),
            };
            let reason = if !self.can_have_children(parent) {
                Some("parent cannot have children")
            } else if child.0 >= self.len() {
                None
            } else if matches!(self.nodes[child.0].node_type, NodeType::Document) {
                Some("a document cannot be inserted")
            } else if child == parent {
                Some("a node cannot be inserted into itself")
            } else if !self.nodes[child.0].children.is_empty()
                && self.is_descendant_of(parent, child)
            {
                Some("a node cannot be inserted into its own descendant")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(Error::HierarchyRequest {
                    parent: parent.0,
                    child: child.0,
                    reason,
                });
            }
        }
        Ok(())
    }

    fn can_have_children(&self, id: NodeId) -> bool {
        matches!(
            self.nodes[id.0].node_type,
            NodeType::Document | NodeType::Element(_)
        )
    }

    /// Attach already validated items to `parent`.
    fn insert_items(&mut self, parent: NodeId, items: Vec<NodeOrText>) {
        for item in items {
            let child = match item {
                NodeOrText::Node(id) => {
                    self.detach(id);
                    id
                }
                NodeOrText::Text(markup) => self.leaf_from_markup(&markup),
            };
            self.nodes[parent.0].children.push(child);
            self.nodes[child.0].parent = Some(parent);
            self.register(child);
        }
    }

    /// Unlink a node from its parent and drop its elements from the flat
    /// index.
    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes[id.0].parent else {
            return;
        };
        self.deregister(id);
        let siblings = &mut self.nodes[parent.0].children;
        if let Some(index) = siblings.iter().rposition(|&c| c == id) {
            let _ = siblings.remove(index);
        }
        self.nodes[id.0].parent = None;
    }

    /// Tokenize `markup` and wrap its first token as a leaf node.
    fn leaf_from_markup(&mut self, markup: &str) -> NodeId {
        let tokens = tokenize(markup, &TokenizerOptions::default());
        match tokens.first() {
            Some(token) if token.kind == TokenKind::Comment => {
                self.create_comment(token.comment_data())
            }
            Some(token) => self.create_text_node(token.raw.as_str()),
            None => self.create_text_node(markup),
        }
    }

    /// Elements of the subtree rooted at `id`, `id` included, in pre-order.
    pub(crate) fn subtree_elements(&self, id: NodeId) -> Vec<NodeId> {
        let mut elements = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if self.is_element(current) {
                elements.push(current);
            }
            stack.extend(self.child_nodes(current).iter().rev());
        }
        elements
    }

    /// Whether `id` is the document or a child of the document or of an
    /// indexed element. Connected elements are always indexed, so this
    /// stands in for [`Document::is_connected`] without walking up.
    fn hangs_off_index(&self, id: NodeId) -> bool {
        id == NodeId::ROOT
            || self.nodes[id.0]
                .parent
                .is_some_and(|parent| parent == NodeId::ROOT || self.nodes[parent.0].indexed)
    }

    /// Where the elements of the subtree at `id` go in the flat index.
    fn index_position(&self, id: NodeId) -> usize {
        if self.is_trailing_child(id) {
            return self.all.len();
        }
        match self.preceding_element(id) {
            Some(previous) => self
                .all
                .iter()
                .rposition(|&e| e == previous)
                .map_or(self.all.len(), |i| i + 1),
            None => 0,
        }
    }

    /// Whether `id` is its parent's last child while the flat index ends
    /// inside the parent's subtree. Appending during a parse always hits
    /// this case.
    fn is_trailing_child(&self, id: NodeId) -> bool {
        let Some(parent) = self.nodes[id.0].parent else {
            return false;
        };
        if self.nodes[parent.0].children.last() != Some(&id) {
            return false;
        }
        match self.all.last() {
            None => true,
            Some(&last) => {
                parent == NodeId::ROOT || last == parent || self.is_descendant_of(last, parent)
            }
        }
    }

    /// The last element, in pre-order, of the subtree rooted at `id`.
    fn last_element_in(&self, id: NodeId) -> Option<NodeId> {
        // Reverse pre-order: rightmost subtrees first, each node after its
        // children.
        let mut stack = vec![(id, false)];
        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                if self.is_element(current) {
                    return Some(current);
                }
                continue;
            }
            stack.push((current, true));
            stack.extend(self.child_nodes(current).iter().map(|&child| (child, false)));
        }
        None
    }

    /// The element that precedes `id` in document order.
    fn preceding_element(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        while let Some(parent) = self.parent_node(current) {
            let siblings = self.child_nodes(parent);
            let index = siblings.iter().rposition(|&c| c == current)?;
            if let Some(last) = siblings[..index]
                .iter()
                .rev()
                .find_map(|&sibling| self.last_element_in(sibling))
            {
                return Some(last);
            }
            if self.is_element(parent) {
                return Some(parent);
            }
            current = parent;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_inserts_in_document_order() {
        let mut doc = Document::new();
        let a = doc.create_element("a");
        let c = doc.create_element("c");
        doc.append(NodeId::ROOT, [a, c]).unwrap();

        let b = doc.create_element("b");
        let inner = doc.create_element("inner");
        doc.append(b, [inner]).unwrap();

        // Attach b between a and c by rebuilding the children list.
        doc.nodes[NodeId::ROOT.0].children.insert(1, b);
        doc.nodes[b.0].parent = Some(NodeId::ROOT);
        doc.register(b);

        assert_eq!(doc.all(), &[a, b, inner, c]);
    }

    #[test]
    fn test_register_after_deep_subtree() {
        let mut doc = Document::new();
        let a = doc.create_element("a");
        let c = doc.create_element("c");
        doc.append(NodeId::ROOT, [a, c]).unwrap();
        let mut deepest = a;
        for _ in 0..50_000 {
            let child = doc.create_element("div");
            doc.append(deepest, [child]).unwrap();
            deepest = child;
        }
        doc.append(deepest, ["leaf text"]).unwrap();

        // b lands between the deep subtree of a and c.
        let b = doc.create_element("b");
        doc.nodes[NodeId::ROOT.0].children.insert(1, b);
        doc.nodes[b.0].parent = Some(NodeId::ROOT);
        doc.register(b);

        assert_eq!(doc.last_element_in(a), Some(deepest));
        assert_eq!(doc.all().len(), 50_003);
        assert_eq!(&doc.all()[50_001..], &[b, c]);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut doc = Document::new();
        let a = doc.create_element("a");
        doc.append(NodeId::ROOT, [a]).unwrap();
        doc.register(a);
        assert_eq!(doc.all(), &[a]);
    }

    #[test]
    fn test_leaf_from_markup() {
        let mut doc = Document::new();
        let text = doc.leaf_from_markup("  hello ");
        assert_eq!(doc.as_text(text), Some("hello"));

        let comment = doc.leaf_from_markup("<!-- note -->");
        assert_eq!(
            doc.get(comment).map(|n| &n.node_type),
            Some(&NodeType::Comment(" note ".to_string()))
        );

        let blank = doc.leaf_from_markup("   ");
        assert_eq!(doc.as_text(blank), Some("   "));
    }
}
