//! Document tree for the linden HTML engine.
//!
//! This crate provides an arena-based tree loosely following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/), trimmed to what
//! server-side rendering and markup transformation need.
//!
//! # Design
//!
//! Every node lives in the [`Document`] arena and is addressed by a
//! [`NodeId`]. Operations that the DOM puts on nodes (`append`, `closest`,
//! `get_attribute`, ...) are methods on the document taking the node's
//! handle. Besides the tree itself the document keeps `all`, a flat,
//! document-ordered index of every attached element, which backs
//! [`Document::get_element_by_id`] and the selector queries.
//!
//! Detaching a node removes its subtree's elements from the flat index but
//! leaves the detached subtree intact, so it can be re-inserted elsewhere.

mod mutation;
pub mod plain;
mod query;
mod serialize;

pub use mutation::NodeOrText;
pub use plain::{PlainDocument, PlainNode};

use indexmap::IndexMap;
use linden_common::{Error, Result};
use linden_selector::Selectable;

/// Ordered map of attribute names to values. Keys keep the case written in
/// markup.
pub type AttributesMap = IndexMap<String, String>;

/// Elements that never have children and always serialize as `<name />`.
///
/// The HTML void elements plus the SVG shapes that are written self-closed
/// in practice.
pub const VOID_ELEMENTS: [&str; 23] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr", "path", "circle", "ellipse", "line", "rect", "use", "stop",
    "polygon", "polyline",
];

/// Whether `tag_name` names a void element (ASCII case-insensitive).
#[must_use]
pub fn is_void_element(tag_name: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(tag_name))
}

/// A type-safe index into a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,

    /// Set while the element is listed in [`Document::all`].
    pub(crate) indexed: bool,
}

/// The closed set of node kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    /// The document node, root of the arena.
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// Character data.
    Text(String),
    /// Comment data, without the `<!--` and `-->` delimiters.
    Comment(String),
}

/// Element-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// The tag name in its original case.
    pub tag_name: String,
    /// Attributes in source order.
    pub attrs: AttributesMap,
    /// Whether the element was written self-closed or is void. Self-closing
    /// elements serialize as `<name />`.
    pub self_closing: bool,
}

impl ElementData {
    /// Create element data. `self_closing` starts out as void membership.
    #[must_use]
    pub fn new(tag_name: impl Into<String>, attrs: AttributesMap) -> Self {
        let tag_name = tag_name.into();
        let self_closing = is_void_element(&tag_name);
        Self {
            tag_name,
            attrs,
            self_closing,
        }
    }

    /// Look up an attribute, comparing names ASCII-case-insensitively.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .get(name)
            .or_else(|| {
                self.attrs
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, value)| value)
            })
            .map(String::as_str)
    }

    /// Set an attribute. An existing attribute whose name matches
    /// case-insensitively keeps its key and position.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some((_, existing)) = self
            .attrs
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            *existing = value;
        } else {
            let _ = self.attrs.insert(name.to_string(), value);
        }
    }

    /// Remove an attribute, returning its value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self
            .attrs
            .keys()
            .position(|key| key.eq_ignore_ascii_case(name))?;
        self.attrs.shift_remove_index(index).map(|(_, value)| value)
    }

    /// The `id` attribute.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.get_attribute("id")
    }

    /// The `class` attribute.
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        self.get_attribute("class")
    }

    /// Class names from the whitespace-separated `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.class_name().unwrap_or_default().split_whitespace()
    }

    /// Whether this element carries the given class.
    #[must_use]
    pub fn has_class(&self, class_name: &str) -> bool {
        self.classes().any(|c| c == class_name)
    }
}

impl Selectable for ElementData {
    fn tag_name(&self) -> &str {
        &self.tag_name
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.get_attribute(name)
    }
}

/// Arena-based document tree.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree."
#[derive(Debug, Clone)]
pub struct Document {
    /// All nodes, indexed by [`NodeId`]. The document node is at index 0.
    nodes: Vec<Node>,
    /// Every element reachable from the document, in pre-order.
    all: Vec<NodeId>,
    doctype: Option<String>,
    charset: Option<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only the document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                node_type: NodeType::Document,
                parent: None,
                children: Vec::new(),
                indexed: false,
            }],
            all: Vec::new(),
            doctype: None,
            charset: None,
        }
    }

    /// The document node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its handle.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Whether `id` refers to a node of this document.
    #[must_use]
    pub fn exists(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Number of nodes ever allocated, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the document node is allocated on creation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a detached node and return its handle.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            indexed: false,
        });
        id
    }

    // =========================================================================
    // Document-level state
    // =========================================================================

    /// The doctype declaration as written, e.g. `<!DOCTYPE html>`.
    #[must_use]
    pub fn doctype(&self) -> Option<&str> {
        self.doctype.as_deref()
    }

    /// Record the doctype declaration.
    pub fn set_doctype(&mut self, doctype: impl Into<String>) {
        self.doctype = Some(doctype.into());
    }

    /// The upper-cased `<meta charset>` value, if any.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    /// Record the document charset. The value is stored upper-cased.
    pub fn set_charset(&mut self, charset: &str) {
        self.charset = Some(charset.to_ascii_uppercase());
    }

    /// Every element reachable from the document, in document order.
    #[must_use]
    pub fn all(&self) -> &[NodeId] {
        &self.all
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.child_nodes(NodeId::ROOT)
            .iter()
            .copied()
            .find(|&id| self.is_element(id))
    }

    // =========================================================================
    // Node constructors
    // =========================================================================

    /// Create a detached element with no attributes.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.alloc(NodeType::Element(ElementData::new(
            tag_name,
            AttributesMap::new(),
        )))
    }

    /// Create a detached element. The namespace is ignored.
    pub fn create_element_ns(&mut self, _namespace: Option<&str>, tag_name: &str) -> NodeId {
        self.create_element(tag_name)
    }

    /// Create a detached text node.
    pub fn create_text_node(&mut self, data: impl Into<String>) -> NodeId {
        self.alloc(NodeType::Text(data.into()))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, data: impl Into<String>) -> NodeId {
        self.alloc(NodeType::Comment(data.into()))
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// The parent of a node.
    #[must_use]
    pub fn parent_node(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// All children of a node, in order.
    #[must_use]
    pub fn child_nodes(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// The element children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.child_nodes(id)
            .iter()
            .copied()
            .filter(|&child| self.is_element(child))
            .collect()
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            document: self,
            current: self.parent_node(id),
        }
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// "An object A is called a descendant of an object B, if either A is a
    /// child of B or A is a child of an object C that is a descendant of B."
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Whether the node is the document or has the document as an ancestor.
    #[must_use]
    pub fn is_connected(&self, id: NodeId) -> bool {
        id == NodeId::ROOT || self.is_descendant_of(id, NodeId::ROOT)
    }

    // =========================================================================
    // Node data
    // =========================================================================

    /// Element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.nodes.get_mut(id.0).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Text if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Whether this node is an element.
    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        self.as_element(id).is_some()
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-nodename)
    ///
    /// The upper-cased tag name for elements, otherwise `#document`, `#text`
    /// or `#comment`.
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> Option<String> {
        self.get(id).map(|n| match &n.node_type {
            NodeType::Document => "#document".to_string(),
            NodeType::Element(data) => data.tag_name.to_ascii_uppercase(),
            NodeType::Text(_) => "#text".to_string(),
            NodeType::Comment(_) => "#comment".to_string(),
        })
    }

    /// The tag name of an element, in its original case.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(|e| e.tag_name.as_str())
    }

    /// The `id` attribute of an element.
    #[must_use]
    pub fn id(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).and_then(ElementData::id)
    }

    /// The `class` attribute of an element.
    #[must_use]
    pub fn class_name(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).and_then(ElementData::class_name)
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Read an attribute of an element. Names compare case-insensitively.
    #[must_use]
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.as_element(id).and_then(|e| e.get_attribute(name))
    }

    /// Same as [`get_attribute`](Self::get_attribute); the namespace is
    /// ignored.
    #[must_use]
    pub fn get_attribute_ns(&self, id: NodeId, _namespace: Option<&str>, name: &str) -> Option<&str> {
        self.get_attribute(id, name)
    }

    /// Whether an element has the attribute.
    #[must_use]
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    /// Same as [`has_attribute`](Self::has_attribute); the namespace is
    /// ignored.
    #[must_use]
    pub fn has_attribute_ns(&self, id: NodeId, _namespace: Option<&str>, name: &str) -> bool {
        self.has_attribute(id, name)
    }

    /// Set an attribute on an element. Non-element nodes are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotANode`] if `id` is unknown.
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<()> {
        if !self.exists(id) {
            return Err(Error::NotANode(id.0));
        }
        if let Some(element) = self.as_element_mut(id) {
            element.set_attribute(name, value);
        }
        Ok(())
    }

    /// Same as [`set_attribute`](Self::set_attribute); the namespace is
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotANode`] if `id` is unknown.
    pub fn set_attribute_ns(
        &mut self,
        id: NodeId,
        _namespace: Option<&str>,
        name: &str,
        value: impl Into<String>,
    ) -> Result<()> {
        self.set_attribute(id, name, value)
    }

    /// Remove an attribute from an element, returning its value.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.as_element_mut(id)
            .and_then(|e| e.remove_attribute(name))
    }

    /// Same as [`remove_attribute`](Self::remove_attribute); the namespace
    /// is ignored.
    pub fn remove_attribute_ns(
        &mut self,
        id: NodeId,
        _namespace: Option<&str>,
        name: &str,
    ) -> Option<String> {
        self.remove_attribute(id, name)
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    document: &'a Document,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.document.parent_node(id);
        Some(id)
    }
}
