//! Integration tests for the lenient tree builder.

use linden_common::Error;
use linden_dom::{PlainDocument, PlainNode};
use linden_html::{LenientParser, ParseConfig, parse_from_string};

/// Helper to parse with default options
fn parse(html: &str) -> PlainDocument {
    parse_from_string(html, &ParseConfig::default()).unwrap().root
}

/// Helper to collect the tag names of a plain tree in pre-order
fn tag_names(nodes: &[PlainNode]) -> Vec<String> {
    let mut out = Vec::new();
    for node in nodes {
        if let Some(name) = node.tag_name() {
            out.push(name.to_string());
        }
        out.extend(tag_names(node.children()));
    }
    out
}

#[test]
fn test_nested_elements() {
    let doc = parse("<div><p>a</p><p>b</p></div>");
    assert_eq!(tag_names(&doc.children), vec!["div", "p", "p"]);
    assert_eq!(doc.children[0].children().len(), 2);
}

#[test]
fn test_stray_closing_tag_is_ignored() {
    let doc = parse("</span><p>x</p>");
    assert_eq!(tag_names(&doc.children), vec!["p"]);
}

#[test]
fn test_closing_tag_closes_innermost_whatever_its_name() {
    let doc = parse("<a><b></a>c</b>");
    // `</a>` closes <b>, `</b>` then closes <a>.
    assert_eq!(doc.children.len(), 1);
    let a = &doc.children[0];
    assert_eq!(a.tag_name(), Some("a"));
    assert_eq!(a.children()[0].tag_name(), Some("b"));
    assert_eq!(
        a.children()[1],
        PlainNode::Text {
            value: "c".to_string()
        }
    );
}

#[test]
fn test_open_tags_close_at_end_of_input() {
    let doc = parse("<ul><li>one<li>two");
    assert_eq!(tag_names(&doc.children), vec!["ul", "li", "li"]);
    // Without implied end tags the second item nests in the first.
    let first = &doc.children[0].children()[0];
    assert_eq!(first.children().len(), 2);
}

#[test]
fn test_void_and_self_closing() {
    let doc = parse("<p>a<br>b<img src=x /></br></p>");
    let p = &doc.children[0];
    assert_eq!(p.children().len(), 4);
    assert!(matches!(
        &p.children()[1],
        PlainNode::Element { self_closing: true, .. }
    ));
}

#[test]
fn test_doctype_comment_and_charset() {
    let doc = parse("<!DOCTYPE html><!-- top --><meta charset=utf-8>");
    assert_eq!(doc.doctype.as_deref(), Some("<!DOCTYPE html>"));
    assert_eq!(doc.charset.as_deref(), Some("UTF-8"));
    assert_eq!(
        doc.children[0],
        PlainNode::Comment {
            value: " top ".to_string()
        }
    );
}

#[test]
fn test_filters_are_not_applied() {
    let config = ParseConfig::default().with_filter_tags(["script"]);
    let output = parse_from_string("<script>x()</script>", &config).unwrap();
    assert_eq!(output.tags, vec!["script"]);
    assert_eq!(output.root.element_count(), 1);
}

#[test]
fn test_components_and_tags() {
    let output = LenientParser::new(ParseConfig::default())
        .parse("<App><nav-bar></nav-bar><span></span></App>")
        .unwrap();
    assert_eq!(output.components, vec!["App", "nav-bar"]);
    assert_eq!(output.tags, vec!["span"]);
}

#[test]
fn test_only_options_can_fail() {
    let config = ParseConfig::default().with_max_script_size(0);
    assert!(matches!(
        parse_from_string("<p>", &config),
        Err(Error::InvalidOptions(_))
    ));
    assert!(parse_from_string("</a></b><c>", &ParseConfig::default()).is_ok());
}

#[test]
fn test_output_serializes_to_json() {
    let output = parse_from_string("<p id=\"x\">hi</p>", &ParseConfig::default()).unwrap();
    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["tags"][0], "p");
    assert_eq!(json["root"]["children"][0]["tag_name"], "p");
    assert_eq!(json["root"]["children"][0]["attributes"]["id"], "x");

    let back: PlainDocument = serde_json::from_value(json["root"].clone()).unwrap();
    assert_eq!(back, output.root);
}
