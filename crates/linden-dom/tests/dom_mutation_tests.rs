//! Tests for tree mutation: append, remove_child, replace_children, remove,
//! and the flat element index they maintain.

use linden_common::Error;
use linden_dom::{Document, NodeId, NodeType};

/// Helper to create an element and attach it to `parent`.
fn add_element(doc: &mut Document, parent: NodeId, tag: &str) -> NodeId {
    let id = doc.create_element(tag);
    doc.append(parent, [id]).unwrap();
    id
}

/// Helper to collect the elements reachable from the root in pre-order.
fn walk_elements(doc: &Document) -> Vec<NodeId> {
    fn walk(doc: &Document, id: NodeId, out: &mut Vec<NodeId>) {
        if doc.is_element(id) {
            out.push(id);
        }
        for &child in doc.child_nodes(id) {
            walk(doc, child, out);
        }
    }
    let mut out = Vec::new();
    walk(doc, NodeId::ROOT, &mut out);
    out
}

// ========== append ==========

#[test]
fn test_append_wires_parent_links() {
    let mut doc = Document::new();
    let div = add_element(&mut doc, NodeId::ROOT, "div");
    let p = add_element(&mut doc, div, "p");

    assert_eq!(doc.parent_node(p), Some(div));
    assert_eq!(doc.child_nodes(div), &[p]);
    assert_eq!(doc.all(), &[div, p]);
    assert_eq!(doc.document_element(), Some(div));
}

#[test]
fn test_append_text_and_numbers() {
    let mut doc = Document::new();
    let p = add_element(&mut doc, NodeId::ROOT, "p");
    doc.append(p, ["  count: "]).unwrap();
    doc.append(p, [42]).unwrap();

    let children = doc.child_nodes(p);
    assert_eq!(children.len(), 2);
    assert_eq!(doc.as_text(children[0]), Some("count:"));
    assert_eq!(doc.as_text(children[1]), Some("42"));
    assert_eq!(doc.text_content(p), "count:42");
}

#[test]
fn test_append_comment_markup_creates_comment() {
    let mut doc = Document::new();
    let div = add_element(&mut doc, NodeId::ROOT, "div");
    doc.append(div, ["<!-- hidden -->"]).unwrap();

    let child = doc.child_nodes(div)[0];
    assert_eq!(doc.node_name(child).as_deref(), Some("#comment"));
    assert!(matches!(
        doc.get(child).map(|n| &n.node_type),
        Some(NodeType::Comment(data)) if data == " hidden "
    ));
}

#[test]
fn test_append_moves_node_from_previous_parent() {
    let mut doc = Document::new();
    let a = add_element(&mut doc, NodeId::ROOT, "a");
    let b = add_element(&mut doc, NodeId::ROOT, "b");
    let span = add_element(&mut doc, a, "span");

    doc.append(b, [span]).unwrap();

    assert!(doc.child_nodes(a).is_empty());
    assert_eq!(doc.child_nodes(b), &[span]);
    assert_eq!(doc.parent_node(span), Some(b));
    assert_eq!(doc.all(), &[a, b, span]);
}

#[test]
fn test_append_detached_subtree_registers_all_elements() {
    let mut doc = Document::new();
    let root = add_element(&mut doc, NodeId::ROOT, "main");

    let section = doc.create_element("section");
    let h1 = add_element(&mut doc, section, "h1");
    let p = add_element(&mut doc, section, "p");
    assert_eq!(doc.all(), &[root]);

    let _ = doc.append_child(root, section).unwrap();
    assert_eq!(doc.all(), &[root, section, h1, p]);
}

#[test]
fn test_append_rejects_unknown_handle() {
    let mut doc = Document::new();
    let div = add_element(&mut doc, NodeId::ROOT, "div");
    assert_eq!(doc.append(div, [NodeId(99)]), Err(Error::NotANode(99)));
    assert_eq!(doc.append(NodeId(99), ["x"]), Err(Error::NotANode(99)));
}

#[test]
fn test_append_rejects_hierarchy_violations() {
    let mut doc = Document::new();
    let outer = add_element(&mut doc, NodeId::ROOT, "div");
    let inner = add_element(&mut doc, outer, "span");
    let text = doc.create_text_node("leaf");

    for (parent, child) in [(inner, outer), (outer, outer), (outer, NodeId::ROOT)] {
        assert!(matches!(
            doc.append(parent, [child]),
            Err(Error::HierarchyRequest { .. })
        ));
    }
    assert!(matches!(
        doc.append(text, ["x"]),
        Err(Error::HierarchyRequest { .. })
    ));
}

#[test]
fn test_append_validates_before_mutating() {
    let mut doc = Document::new();
    let div = add_element(&mut doc, NodeId::ROOT, "div");
    let p = doc.create_element("p");

    let result = doc.append(div, [p, NodeId::ROOT]);
    assert!(result.is_err());
    assert!(doc.child_nodes(div).is_empty());
    assert_eq!(doc.parent_node(p), None);
}

// ========== remove_child / remove ==========

#[test]
fn test_remove_child_keeps_subtree_intact() {
    let mut doc = Document::new();
    let div = add_element(&mut doc, NodeId::ROOT, "div");
    let ul = add_element(&mut doc, div, "ul");
    let li = add_element(&mut doc, ul, "li");

    assert_eq!(doc.remove_child(div, ul), Ok(ul));

    assert_eq!(doc.parent_node(ul), None);
    assert_eq!(doc.child_nodes(ul), &[li]);
    assert_eq!(doc.parent_node(li), Some(ul));
    assert_eq!(doc.all(), &[div]);
}

#[test]
fn test_remove_child_of_wrong_parent() {
    let mut doc = Document::new();
    let a = add_element(&mut doc, NodeId::ROOT, "a");
    let b = add_element(&mut doc, NodeId::ROOT, "b");
    assert_eq!(
        doc.remove_child(a, b),
        Err(Error::NotAChild {
            parent: a.0,
            child: b.0
        })
    );
}

#[test]
fn test_remove_detached_node_is_noop() {
    let mut doc = Document::new();
    let orphan = doc.create_element("p");
    assert_eq!(doc.remove(orphan), Ok(()));
    assert_eq!(doc.remove(NodeId(1000)), Err(Error::NotANode(1000)));
}

#[test]
fn test_reinsert_removed_subtree_restores_order() {
    let mut doc = Document::new();
    let first = add_element(&mut doc, NodeId::ROOT, "header");
    let list = add_element(&mut doc, NodeId::ROOT, "ul");
    let item = add_element(&mut doc, list, "li");
    let last = add_element(&mut doc, NodeId::ROOT, "footer");

    doc.remove(list).unwrap();
    assert_eq!(doc.all(), &[first, last]);

    doc.append(first, [list]).unwrap();
    assert_eq!(doc.all(), &[first, list, item, last]);
    assert_eq!(doc.all(), walk_elements(&doc).as_slice());
}

// ========== replace_children ==========

#[test]
fn test_replace_children() {
    let mut doc = Document::new();
    let div = add_element(&mut doc, NodeId::ROOT, "div");
    let old = add_element(&mut doc, div, "old");
    let new = doc.create_element("new");

    doc.replace_children(div, [new]).unwrap();

    assert_eq!(doc.child_nodes(div), &[new]);
    assert_eq!(doc.parent_node(old), None);
    assert_eq!(doc.all(), &[div, new]);
}

#[test]
fn test_replace_children_keeps_old_children_on_error() {
    let mut doc = Document::new();
    let div = add_element(&mut doc, NodeId::ROOT, "div");
    let old = add_element(&mut doc, div, "old");

    assert!(doc.replace_children(div, [div]).is_err());
    assert_eq!(doc.child_nodes(div), &[old]);
}

// ========== deep trees ==========

const DEPTH: usize = 50_000;

/// Helper to build a chain of `DEPTH` nested divs under the document.
fn deep_chain(doc: &mut Document) -> Vec<NodeId> {
    let mut chain = Vec::with_capacity(DEPTH);
    let mut parent = NodeId::ROOT;
    for _ in 0..DEPTH {
        parent = add_element(doc, parent, "div");
        chain.push(parent);
    }
    chain
}

#[test]
fn test_sibling_after_deep_chain_is_indexed_last() {
    let mut doc = Document::new();
    let chain = deep_chain(&mut doc);
    let p = add_element(&mut doc, NodeId::ROOT, "p");

    assert_eq!(doc.all().len(), DEPTH + 1);
    assert_eq!(doc.all()[0], chain[0]);
    assert_eq!(doc.all().last(), Some(&p));
}

#[test]
fn test_serialize_deep_chain() {
    let mut doc = Document::new();
    let mut parent = NodeId::ROOT;
    for _ in 0..3_000 {
        parent = add_element(&mut doc, parent, "div");
    }
    doc.append(parent, ["x"]).unwrap();

    let html = doc.inner_html(NodeId::ROOT);
    let lines: Vec<&str> = html.lines().collect();
    assert_eq!(lines.len(), 2 * 3_000 + 1);
    assert_eq!(lines[3_000], format!("{}x", "  ".repeat(3_000)));
    assert_eq!(lines.last(), Some(&"</div>"));
    assert_eq!(doc.to_plain().element_count(), 3_000);
}

#[test]
fn test_deep_chain_moves_and_replaces() {
    let mut doc = Document::new();
    let chain = deep_chain(&mut doc);
    let p = add_element(&mut doc, NodeId::ROOT, "p");

    doc.remove(chain[0]).unwrap();
    assert_eq!(doc.all(), &[p]);
    assert_eq!(doc.get_elements_by_tag_name(chain[0], "div").len(), DEPTH - 1);

    // Text at the bottom of the detached chain, then everything back in.
    doc.append(chain[DEPTH - 1], ["bottom"]).unwrap();
    doc.replace_children(NodeId::ROOT, [chain[0], p]).unwrap();
    assert_eq!(doc.all().len(), DEPTH + 1);
    assert_eq!(doc.all().first(), Some(&chain[0]));
    assert_eq!(doc.all().last(), Some(&p));
    assert_eq!(doc.text_content(NodeId::ROOT), "bottom");
    assert_eq!(doc.get_elements_by_tag_name(chain[0], "div").len(), DEPTH - 1);
}

// ========== attributes ==========

#[test]
fn test_attribute_access_ignores_name_case() {
    let mut doc = Document::new();
    let input = add_element(&mut doc, NodeId::ROOT, "input");
    doc.set_attribute(input, "Type", "text").unwrap();
    doc.set_attribute_ns(input, Some("urn:x"), "id", "name").unwrap();

    assert_eq!(doc.get_attribute(input, "type"), Some("text"));
    assert_eq!(doc.get_attribute_ns(input, None, "TYPE"), Some("text"));
    assert!(doc.has_attribute(input, "ID"));
    assert_eq!(doc.id(input), Some("name"));

    assert_eq!(doc.remove_attribute(input, "type"), Some("text".to_string()));
    assert!(!doc.has_attribute_ns(input, None, "type"));
    assert_eq!(doc.remove_attribute_ns(input, None, "missing"), None);
}

#[test]
fn test_get_element_by_id_tracks_mutations() {
    let mut doc = Document::new();
    let div = add_element(&mut doc, NodeId::ROOT, "div");
    let p = add_element(&mut doc, div, "p");
    doc.set_attribute(p, "id", "target").unwrap();

    assert_eq!(doc.get_element_by_id("target"), Some(p));
    doc.remove(p).unwrap();
    assert_eq!(doc.get_element_by_id("target"), None);
}

#[test]
fn test_node_names() {
    let mut doc = Document::new();
    let el = doc.create_element_ns(Some("http://www.w3.org/2000/svg"), "svg");
    let text = doc.create_text_node("t");
    let comment = doc.create_comment("c");
    assert_eq!(doc.node_name(NodeId::ROOT).as_deref(), Some("#document"));
    assert_eq!(doc.node_name(el).as_deref(), Some("SVG"));
    assert_eq!(doc.tag_name(el), Some("svg"));
    assert_eq!(doc.node_name(text).as_deref(), Some("#text"));
    assert_eq!(doc.node_name(comment).as_deref(), Some("#comment"));
}
