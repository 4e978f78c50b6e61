//! Plain, serializable tree records.
//!
//! These records are what the lenient builder produces: owned nested data
//! with no arena, no handles and no flat index. They serialize to JSON with
//! serde, and any [`Document`] can be flattened into them with
//! [`Document::to_plain`].

use serde::{Deserialize, Serialize};

use crate::{AttributesMap, Document, NodeId, NodeType};

/// A node of a plain tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlainNode {
    /// An element and its children.
    Element {
        /// Tag name in its original case.
        tag_name: String,
        /// Attributes in source order.
        attributes: AttributesMap,
        /// Written self-closed or void.
        self_closing: bool,
        /// Child nodes in order.
        children: Vec<PlainNode>,
    },
    /// Character data.
    Text {
        /// The text.
        value: String,
    },
    /// A comment, without delimiters.
    Comment {
        /// The comment data.
        value: String,
    },
}

impl PlainNode {
    /// Create an element record with no children.
    #[must_use]
    pub fn element(tag_name: impl Into<String>, attributes: AttributesMap, self_closing: bool) -> Self {
        Self::Element {
            tag_name: tag_name.into(),
            attributes,
            self_closing,
            children: Vec::new(),
        }
    }

    /// The tag name of an element record.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::Element { tag_name, .. } => Some(tag_name),
            _ => None,
        }
    }

    /// The children of an element record; empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Element { children, .. } => children,
            _ => &[],
        }
    }

    /// Append a child to an element record. Leaves ignore the call.
    pub fn push_child(&mut self, child: Self) {
        if let Self::Element { children, .. } = self {
            children.push(child);
        }
    }
}

/// The root of a plain tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainDocument {
    /// The doctype declaration as written.
    pub doctype: Option<String>,
    /// The upper-cased `<meta charset>` value.
    pub charset: Option<String>,
    /// Top-level nodes.
    pub children: Vec<PlainNode>,
}

impl PlainDocument {
    /// Number of element records in the tree.
    #[must_use]
    pub fn element_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&PlainNode> = self.children.iter().collect();
        while let Some(node) = stack.pop() {
            if let PlainNode::Element { children, .. } = node {
                count += 1;
                stack.extend(children);
            }
        }
        count
    }
}

impl Document {
    /// Copy the tree into plain records.
    #[must_use]
    pub fn to_plain(&self) -> PlainDocument {
        let mut document = PlainDocument {
            doctype: self.doctype().map(str::to_string),
            charset: self.charset().map(str::to_string),
            children: Vec::new(),
        };
        // Elements whose children are still being copied, innermost last.
        let mut open: Vec<PlainNode> = Vec::new();
        let mut stack: Vec<(NodeId, bool)> = self
            .child_nodes(NodeId::ROOT)
            .iter()
            .rev()
            .map(|&child| (child, false))
            .collect();

        while let Some((id, leaving)) = stack.pop() {
            let finished = if leaving {
                open.pop()
            } else {
                let Some(node) = self.get(id) else {
                    continue;
                };
                match &node.node_type {
                    NodeType::Document => None,
                    NodeType::Element(data) => {
                        let record =
                            PlainNode::element(&data.tag_name, data.attrs.clone(), data.self_closing);
                        if node.children.is_empty() {
                            Some(record)
                        } else {
                            open.push(record);
                            stack.push((id, true));
                            stack.extend(node.children.iter().rev().map(|&child| (child, false)));
                            None
                        }
                    }
                    NodeType::Text(value) => Some(PlainNode::Text {
                        value: value.clone(),
                    }),
                    NodeType::Comment(value) => Some(PlainNode::Comment {
                        value: value.clone(),
                    }),
                }
            };
            if let Some(finished) = finished {
                match open.last_mut() {
                    Some(parent) => parent.push_child(finished),
                    None => document.children.push(finished),
                }
            }
        }
        document
    }
}
