//! Text extraction and markup serialization.
//!
//! Serialized markup puts one node per line, indented two spaces per depth.
//! Comments are left out. The output parses back to the same tree but is
//! not byte-identical to the source.

use linden_common::escape::escape_attribute;

use crate::{Document, ElementData, NodeId, NodeType};

impl Document {
    /// [§ 4.4 textContent](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// Concatenated text of the node's subtree in document order. A `br`
    /// element contributes a line break; comments contribute nothing.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            match &node.node_type {
                NodeType::Text(text) => out.push_str(text),
                NodeType::Comment(_) => {}
                NodeType::Element(data) if data.tag_name.eq_ignore_ascii_case("br") => {
                    out.push('\n');
                }
                NodeType::Element(_) | NodeType::Document => {
                    stack.extend(node.children.iter().rev());
                }
            }
        }
        out
    }

    /// Serialize the children of a node.
    #[must_use]
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut lines = Vec::new();
        for &child in self.child_nodes(id) {
            self.write_node(child, 0, &mut lines);
        }
        lines.join("\n")
    }

    /// Serialize a node and its subtree. For the document this is the same
    /// as [`inner_html`](Self::inner_html).
    #[must_use]
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut lines = Vec::new();
        self.write_node(id, 0, &mut lines);
        lines.join("\n")
    }

    fn write_node(&self, id: NodeId, depth: usize, lines: &mut Vec<String>) {
        let mut stack = vec![Step::Enter { id, depth }];
        while let Some(step) = stack.pop() {
            match step {
                Step::Enter { id, depth } => {
                    let Some(node) = self.get(id) else {
                        continue;
                    };
                    match &node.node_type {
                        NodeType::Document => {
                            stack.extend(node.children.iter().rev().map(|&child| Step::Enter {
                                id: child,
                                depth,
                            }));
                        }
                        NodeType::Text(text) => {
                            let text = text.trim();
                            if !text.is_empty() {
                                lines.push(format!("{}{text}", "  ".repeat(depth)));
                            }
                        }
                        NodeType::Comment(_) => {}
                        NodeType::Element(data) if data.self_closing => {
                            lines.push(format!("{} />", open_tag(data, depth)));
                        }
                        NodeType::Element(_) => {
                            // Placeholder for the start tag, filled in on close.
                            stack.push(Step::Close {
                                id,
                                depth,
                                line: lines.len(),
                            });
                            lines.push(String::new());
                            stack.extend(node.children.iter().rev().map(|&child| Step::Enter {
                                id: child,
                                depth: depth + 1,
                            }));
                        }
                    }
                }
                Step::Close { id, depth, line } => {
                    let Some(data) = self.as_element(id) else {
                        continue;
                    };
                    let open = open_tag(data, depth);
                    if lines.len() == line + 1 {
                        lines[line] = format!("{open}></{}>", data.tag_name);
                    } else {
                        lines[line] = format!("{open}>");
                        lines.push(format!("{}</{}>", "  ".repeat(depth), data.tag_name));
                    }
                }
            }
        }
    }
}

/// Pending serialization work.
enum Step {
    Enter { id: NodeId, depth: usize },
    /// Finish an element whose start tag sits at `lines[line]`.
    Close { id: NodeId, depth: usize, line: usize },
}

/// Indented start tag without its closing `>`.
fn open_tag(data: &ElementData, depth: usize) -> String {
    format!(
        "{}<{}{}",
        "  ".repeat(depth),
        data.tag_name,
        serialize_attributes(data)
    )
}

/// ` name="value"` for every attribute, values trimmed and quote-escaped.
fn serialize_attributes(data: &ElementData) -> String {
    data.attrs
        .iter()
        .map(|(name, value)| format!(" {name}=\"{}\"", escape_attribute(value.trim())))
        .collect()
}
