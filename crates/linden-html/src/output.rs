//! Parse results and tag-name classification.

use indexmap::IndexSet;
use serde::Serialize;

/// What a tree builder returns: the tree plus the distinct tag names seen,
/// split into components and plain tags, each in first-seen order.
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutput<R> {
    /// The built tree.
    pub root: R,
    /// Names that look like components: capitalized or hyphenated.
    pub components: Vec<String>,
    /// Every other element name.
    pub tags: Vec<String>,
}

/// Whether a tag name is classified as a component: its first character
/// is uppercase or it contains a hyphen.
#[must_use]
pub fn is_component_name(tag_name: &str) -> bool {
    tag_name.chars().next().is_some_and(char::is_uppercase) || tag_name.contains('-')
}

/// First-seen-ordered name sets filled while building.
#[derive(Debug, Default)]
pub(crate) struct NameCollector {
    components: IndexSet<String>,
    tags: IndexSet<String>,
}

impl NameCollector {
    pub(crate) fn record(&mut self, tag_name: &str) {
        let set = if is_component_name(tag_name) {
            &mut self.components
        } else {
            &mut self.tags
        };
        if !set.contains(tag_name) {
            let _ = set.insert(tag_name.to_string());
        }
    }

    pub(crate) fn finish<R>(self, root: R) -> ParseOutput<R> {
        ParseOutput {
            root,
            components: self.components.into_iter().collect(),
            tags: self.tags.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_names() {
        assert!(is_component_name("Counter"));
        assert!(is_component_name("text-element"));
        assert!(!is_component_name("div"));
        assert!(!is_component_name(""));
    }

    #[test]
    fn test_collector_keeps_first_seen_order() {
        let mut names = NameCollector::default();
        for name in ["p", "Card", "div", "p", "x-tab", "Card"] {
            names.record(name);
        }
        let output = names.finish(());
        assert_eq!(output.tags, vec!["p", "div"]);
        assert_eq!(output.components, vec!["Card", "x-tab"]);
    }
}
