//! Integration tests for selector compiling, matching and caching.

use std::collections::HashMap;

use linden_common::Error;
use linden_selector::{
    AttributeSelector, SelectorCache, Selectable, SimpleSelector, compile, compile_cached,
    global_cache,
};

/// Minimal element used to exercise the matcher.
struct TestElement {
    tag: String,
    attrs: HashMap<String, String>,
}

impl Selectable for TestElement {
    fn tag_name(&self) -> &str {
        &self.tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

fn make_element(tag: &str, attrs: &[(&str, &str)]) -> TestElement {
    TestElement {
        tag: tag.to_string(),
        attrs: attrs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect(),
    }
}

fn matches(selector: &str, element: &TestElement) -> bool {
    compile(selector).unwrap().matches(element)
}

#[test]
fn test_parse_compound_parts() {
    let group = compile("div#main.note[data-x=\"1\"][hidden]").unwrap();
    assert_eq!(group.alternatives.len(), 1);
    assert_eq!(
        group.alternatives[0].simple_selectors,
        vec![
            SimpleSelector::Type("div".to_string()),
            SimpleSelector::Id("main".to_string()),
            SimpleSelector::Class("note".to_string()),
            SimpleSelector::Attribute(AttributeSelector::Equals(
                "data-x".to_string(),
                "1".to_string()
            )),
            SimpleSelector::Attribute(AttributeSelector::Exists("hidden".to_string())),
        ]
    );
}

#[test]
fn test_type_selector_ignores_case() {
    let element = make_element("DIV", &[]);
    assert!(matches("div", &element));
    assert!(matches("Div", &element));
    assert!(!matches("span", &element));
}

#[test]
fn test_component_type_selector() {
    let element = make_element("text-element", &[]);
    assert!(matches("text-element", &element));
    assert!(matches("Counter", &make_element("Counter", &[])));
}

#[test]
fn test_id_and_class_are_exact() {
    let element = make_element("p", &[("id", "Intro"), ("class", "lead  wide")]);
    assert!(matches("#Intro", &element));
    assert!(!matches("#intro", &element));
    assert!(matches(".lead", &element));
    assert!(matches(".wide", &element));
    assert!(matches(".lead.wide", &element));
    assert!(!matches(".le", &element));
}

#[test]
fn test_attribute_selectors() {
    let element = make_element("input", &[("TYPE", "text"), ("disabled", "")]);
    assert!(matches("[type]", &element));
    assert!(matches("[type=text]", &element));
    assert!(matches("[type='text']", &element));
    assert!(matches("[ type = \"text\" ]", &element));
    assert!(!matches("[type=Text]", &element));
    assert!(matches("[disabled]", &element));
    assert!(!matches("[readonly]", &element));
}

#[test]
fn test_group_is_or_compound_is_and() {
    let heading = make_element("h1", &[]);
    let para = make_element("p", &[("class", "x")]);
    assert!(matches("p, h1", &heading));
    assert!(matches("p, h1", &para));
    assert!(!matches("p.y, h2", &para));
    assert!(matches("p.y, p.x", &para));
}

#[test]
fn test_whitespace_between_parts_is_ignored() {
    let element = make_element("div", &[("class", "note")]);
    assert!(matches("div .note", &element));
    assert!(!matches("div .other", &element));
}

#[test]
fn test_universal_selector() {
    assert!(matches("*", &make_element("anything", &[])));
}

#[test]
fn test_rejects_unsupported_syntax() {
    for selector in ["", "  ", "p,", "div > p", "a + b", "a ~ b", "a:hover", "[x~=y]", "[x", ".", "#", "[=x]", "%"] {
        assert!(
            matches!(compile(selector), Err(Error::InvalidSelector { .. })),
            "{selector:?} should not compile"
        );
    }
}

#[test]
fn test_cache_counts_hits_and_misses() {
    let mut cache = SelectorCache::new(10);
    let first = cache.compile("p, h1").unwrap();
    let second = cache.compile("p, h1").unwrap();
    assert_eq!(first, second);
    assert_eq!(cache.misses(), 1);
    assert_eq!(cache.hits(), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_key_is_exact_source() {
    let mut cache = SelectorCache::new(10);
    let _ = cache.compile("p,h1").unwrap();
    let _ = cache.compile("p, h1").unwrap();
    assert_eq!(cache.misses(), 2);
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_cache_evicts_oldest_inserted() {
    let mut cache = SelectorCache::new(2);
    let _ = cache.compile("a").unwrap();
    let _ = cache.compile("b").unwrap();
    // A hit on "a" does not make it younger.
    let _ = cache.compile("a").unwrap();
    let _ = cache.compile("c").unwrap();

    assert!(!cache.contains("a"));
    assert!(cache.contains("b"));
    assert!(cache.contains("c"));
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_cache_eviction_keeps_rolling_in_insertion_order() {
    let mut cache = SelectorCache::new(3);
    for selector in ["a", "b", "c", "d", "a", "e"] {
        let _ = cache.compile(selector).unwrap();
    }
    // "a" came back after its eviction, so it is now younger than "c".
    assert!(!cache.contains("b"));
    assert!(!cache.contains("c"));
    assert!(cache.contains("d"));
    assert!(cache.contains("a"));
    assert!(cache.contains("e"));
    assert_eq!(cache.misses(), 6);
    assert_eq!(cache.hits(), 0);
}

#[test]
fn test_cache_does_not_store_invalid_selectors() {
    let mut cache = SelectorCache::new(2);
    assert!(cache.compile("a >").is_err());
    assert!(cache.is_empty());
    assert_eq!(cache.misses(), 1);
}

#[test]
fn test_cache_clear_resets_counters() {
    let mut cache = SelectorCache::default();
    let _ = cache.compile("p").unwrap();
    let _ = cache.compile("p").unwrap();
    cache.clear();
    let stats = cache.stats();
    assert_eq!((stats.hits, stats.misses, stats.len), (0, 0, 0));
    assert_eq!(stats.capacity, 100);
}

#[test]
fn test_zero_capacity_cache_never_stores() {
    let mut cache = SelectorCache::new(0);
    let _ = cache.compile("p").unwrap();
    let _ = cache.compile("p").unwrap();
    assert!(cache.is_empty());
    assert_eq!(cache.misses(), 2);
}

#[test]
fn test_global_cache_is_shared() {
    let selector = "section.global-cache-test";
    let _ = compile_cached(selector).unwrap();
    assert!(global_cache().contains(selector));
}
