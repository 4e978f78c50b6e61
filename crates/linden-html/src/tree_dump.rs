//! Debug rendering of a document tree.
//!
//! One node per line: the DOM node name, the arena handle in brackets, then
//! what distinguishes the node.
//!
//! ```text
//! #document [0] doctype="<!DOCTYPE html>"
//!   UL [1] class="menu"
//!     LI [2]
//!       #text [3] "Home"
//!     BR [4] /
//! ```

use std::fmt::Write;

use linden_dom::{Document, NodeId, NodeType};

/// Render the subtree at `id`, indented two spaces per level starting at
/// `indent`.
#[must_use]
pub fn dump_tree(tree: &Document, id: NodeId, indent: usize) -> String {
    let mut out = String::new();
    let mut stack = vec![(id, indent)];
    while let Some((current, depth)) = stack.pop() {
        let (Some(node), Some(name)) = (tree.get(current), tree.node_name(current)) else {
            continue;
        };
        let _ = write!(out, "{}{name} [{}]", "  ".repeat(depth), current.0);
        match &node.node_type {
            NodeType::Document => {
                if let Some(doctype) = tree.doctype() {
                    let _ = write!(out, " doctype={doctype:?}");
                }
                if let Some(charset) = tree.charset() {
                    let _ = write!(out, " charset={charset:?}");
                }
            }
            NodeType::Element(data) => {
                for (attr, value) in &data.attrs {
                    let _ = if value.is_empty() {
                        write!(out, " {attr}")
                    } else {
                        write!(out, " {attr}={value:?}")
                    };
                }
                if data.self_closing {
                    out.push_str(" /");
                }
            }
            NodeType::Text(text) | NodeType::Comment(text) => {
                let _ = write!(out, " {text:?}");
            }
        }
        out.push('\n');
        stack.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
    }
    out
}

/// Print the subtree at `id` to stdout.
pub fn print_tree(tree: &Document, id: NodeId, indent: usize) {
    print!("{}", dump_tree(tree, id, indent));
}

#[cfg(test)]
mod tests {
    use super::*;
    use linden_dom::NodeOrText;

    #[test]
    fn test_dump_names_handles_and_attributes() {
        let mut tree = Document::new();
        tree.set_doctype("<!DOCTYPE html>");
        let div = tree.create_element("div");
        tree.set_attribute(div, "hidden", "").unwrap();
        tree.set_attribute(div, "id", "x").unwrap();
        let br = tree.create_element("br");
        let note = tree.create_comment(" note ");
        tree.append(NodeId::ROOT, [div]).unwrap();
        tree.append(div, [NodeOrText::from("a \"b\""), br.into(), note.into()])
            .unwrap();

        assert_eq!(
            dump_tree(&tree, NodeId::ROOT, 0),
            "#document [0] doctype=\"<!DOCTYPE html>\"\n\
             \x20 DIV [1] hidden id=\"x\"\n\
             \x20   #text [4] \"a \\\"b\\\"\"\n\
             \x20   BR [2] /\n\
             \x20   #comment [3] \" note \"\n"
        );
    }

    #[test]
    fn test_dump_starts_at_given_indent() {
        let mut tree = Document::new();
        let p = tree.create_element("p");
        tree.append(NodeId::ROOT, [p]).unwrap();
        assert_eq!(dump_tree(&tree, p, 2), "    P [1]\n");
    }
}
