//! Lookups over the flat element index and selector queries.
//!
//! Every query method comes in three flavors:
//! - `query_selector(..., "p, h1")` compiles through the process-wide cache
//! - `query_selector_with(..., "p, h1", &mut cache)` uses a caller's cache
//! - `query_all_matching(..., &group)` takes an already compiled group

use std::collections::HashSet;

use linden_common::Result;
use linden_selector::{SelectorCache, SelectorGroup, compile_cached};

use crate::{Document, NodeId};

impl Document {
    /// [§ 4.5 getElementById](https://dom.spec.whatwg.org/#dom-nonelementparentnode-getelementbyid)
    ///
    /// "The getElementById(elementId) method steps are to return the first
    /// element, in tree order, within this's descendants, whose ID is
    /// elementId; otherwise, if there is no such element, null."
    #[must_use]
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.all
            .iter()
            .copied()
            .find(|&e| self.id(e) == Some(id))
    }

    /// Elements under `scope` with the given tag name (ASCII
    /// case-insensitive), in document order. `*` matches every element.
    #[must_use]
    pub fn get_elements_by_tag_name(&self, scope: NodeId, tag_name: &str) -> Vec<NodeId> {
        let elements = self.scoped_elements(scope);
        if tag_name == "*" {
            return elements;
        }
        elements
            .into_iter()
            .filter(|&e| {
                self.tag_name(e)
                    .is_some_and(|name| name.eq_ignore_ascii_case(tag_name))
            })
            .collect()
    }

    /// Elements under `scope` carrying every class in the
    /// whitespace-separated `class_names`.
    #[must_use]
    pub fn get_elements_by_class_name(&self, scope: NodeId, class_names: &str) -> Vec<NodeId> {
        let wanted: Vec<&str> = class_names.split_whitespace().collect();
        if wanted.is_empty() {
            return Vec::new();
        }
        self.scoped_elements(scope)
            .into_iter()
            .filter(|&e| {
                self.as_element(e)
                    .is_some_and(|element| wanted.iter().all(|class| element.has_class(class)))
            })
            .collect()
    }

    /// Whether `other` is a descendant of `node`. A node does not contain
    /// itself.
    #[must_use]
    pub fn contains(&self, node: NodeId, other: NodeId) -> bool {
        self.child_nodes(node).contains(&other) || self.is_descendant_of(other, node)
    }

    // =========================================================================
    // matches
    // =========================================================================

    /// Whether the node is an element matched by the selector group.
    ///
    /// # Errors
    ///
    /// Returns [`linden_common::Error::InvalidSelector`] if the selector does
    /// not compile.
    pub fn matches(&self, node: NodeId, selector: &str) -> Result<bool> {
        let group = compile_cached(selector)?;
        Ok(self.matches_group(node, &group))
    }

    /// [`matches`](Self::matches) with an explicit cache.
    ///
    /// # Errors
    ///
    /// Returns [`linden_common::Error::InvalidSelector`] if the selector does
    /// not compile.
    pub fn matches_with(
        &self,
        node: NodeId,
        selector: &str,
        cache: &mut SelectorCache,
    ) -> Result<bool> {
        let group = cache.compile(selector)?;
        Ok(self.matches_group(node, &group))
    }

    /// Whether the node is an element matched by a compiled group.
    #[must_use]
    pub fn matches_group(&self, node: NodeId, group: &SelectorGroup) -> bool {
        self.as_element(node)
            .is_some_and(|element| group.matches(element))
    }

    // =========================================================================
    // closest
    // =========================================================================

    /// The node itself or its nearest ancestor element matching the selector.
    /// The document is never a candidate.
    ///
    /// # Errors
    ///
    /// Returns [`linden_common::Error::InvalidSelector`] if the selector does
    /// not compile.
    pub fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let group = compile_cached(selector)?;
        Ok(self.closest_matching(node, &group))
    }

    /// [`closest`](Self::closest) with an explicit cache.
    ///
    /// # Errors
    ///
    /// Returns [`linden_common::Error::InvalidSelector`] if the selector does
    /// not compile.
    pub fn closest_with(
        &self,
        node: NodeId,
        selector: &str,
        cache: &mut SelectorCache,
    ) -> Result<Option<NodeId>> {
        let group = cache.compile(selector)?;
        Ok(self.closest_matching(node, &group))
    }

    /// [`closest`](Self::closest) with a compiled group.
    #[must_use]
    pub fn closest_matching(&self, node: NodeId, group: &SelectorGroup) -> Option<NodeId> {
        std::iter::once(node)
            .chain(self.ancestors(node))
            .take_while(|&id| id != NodeId::ROOT)
            .find(|&id| self.matches_group(id, group))
    }

    // =========================================================================
    // querySelector / querySelectorAll
    // =========================================================================

    /// The first element under `scope`, in document order, matching the
    /// selector.
    ///
    /// # Errors
    ///
    /// Returns [`linden_common::Error::InvalidSelector`] if the selector does
    /// not compile.
    pub fn query_selector(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let group = compile_cached(selector)?;
        Ok(self.query_first_matching(scope, &group))
    }

    /// [`query_selector`](Self::query_selector) with an explicit cache.
    ///
    /// # Errors
    ///
    /// Returns [`linden_common::Error::InvalidSelector`] if the selector does
    /// not compile.
    pub fn query_selector_with(
        &self,
        scope: NodeId,
        selector: &str,
        cache: &mut SelectorCache,
    ) -> Result<Option<NodeId>> {
        let group = cache.compile(selector)?;
        Ok(self.query_first_matching(scope, &group))
    }

    /// Every element under `scope`, in document order, matching the
    /// selector.
    ///
    /// # Errors
    ///
    /// Returns [`linden_common::Error::InvalidSelector`] if the selector does
    /// not compile.
    pub fn query_selector_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let group = compile_cached(selector)?;
        Ok(self.query_all_matching(scope, &group))
    }

    /// [`query_selector_all`](Self::query_selector_all) with an explicit
    /// cache.
    ///
    /// # Errors
    ///
    /// Returns [`linden_common::Error::InvalidSelector`] if the selector does
    /// not compile.
    pub fn query_selector_all_with(
        &self,
        scope: NodeId,
        selector: &str,
        cache: &mut SelectorCache,
    ) -> Result<Vec<NodeId>> {
        let group = cache.compile(selector)?;
        Ok(self.query_all_matching(scope, &group))
    }

    /// First element under `scope` matching a compiled group.
    #[must_use]
    pub fn query_first_matching(&self, scope: NodeId, group: &SelectorGroup) -> Option<NodeId> {
        self.scoped_elements(scope)
            .into_iter()
            .find(|&e| self.matches_group(e, group))
    }

    /// Every element under `scope` matching a compiled group.
    #[must_use]
    pub fn query_all_matching(&self, scope: NodeId, group: &SelectorGroup) -> Vec<NodeId> {
        self.scoped_elements(scope)
            .into_iter()
            .filter(|&e| self.matches_group(e, group))
            .collect()
    }

    /// Elements strictly under `scope`, in document order.
    ///
    /// For the document this is the whole flat index. For an indexed element
    /// it is the run of the index that follows it and descends from it.
    /// Detached subtrees are walked directly.
    fn scoped_elements(&self, scope: NodeId) -> Vec<NodeId> {
        if scope == NodeId::ROOT {
            return self.all.clone();
        }
        if self.get(scope).is_some_and(|node| node.indexed)
            && let Some(start) = self.all.iter().position(|&e| e == scope)
        {
            // Parents precede their children in the index, so the run ends
            // at the first element whose parent is not already in scope.
            let mut inside = HashSet::from([scope]);
            return self.all[start + 1..]
                .iter()
                .copied()
                .take_while(|&e| {
                    self.parent_node(e)
                        .is_some_and(|parent| inside.contains(&parent))
                        && inside.insert(e)
                })
                .collect();
        }
        let mut elements = self.subtree_elements(scope);
        if elements.first() == Some(&scope) {
            let _ = elements.remove(0);
        }
        elements
    }
}
