//! Strict tree builder producing a [`Document`].
//!
//! Nesting is validated against a stack of open tag names and the first
//! violation aborts the parse. This is also the only builder that applies
//! the tag and attribute filters of [`ParseConfig`].

use linden_common::warning::warn_once;
use linden_common::{Error, Result};
use linden_dom::{Document, ElementData, NodeId, NodeType, is_void_element};
use linden_tokenizer::{Token, TokenKind, tokenize};

use crate::attributes::parse_attributes;
use crate::config::ParseConfig;
use crate::output::{NameCollector, ParseOutput};

/// Hook run after each element is attached.
///
/// Receives the document, the new element and its parent. The returned
/// handle takes the element's place as the parent of the content that
/// follows, until the element's closing tag.
pub type NodeCallback<'a> = Box<dyn FnMut(&mut Document, NodeId, NodeId) -> NodeId + 'a>;

/// Builds a [`Document`] from markup, rejecting malformed nesting.
///
/// ```
/// use linden_html::{DomParser, ParseConfig};
///
/// let output = DomParser::new(ParseConfig::default())
///     .parse("<ul><li>one</li><li>two</li></ul>")
///     .unwrap();
/// assert_eq!(output.tags, vec!["ul", "li"]);
/// assert_eq!(output.root.all().len(), 3);
/// ```
pub struct DomParser<'a> {
    config: ParseConfig,
    node_callback: Option<NodeCallback<'a>>,
}

impl<'a> DomParser<'a> {
    /// Create a parser with the given options.
    #[must_use]
    pub const fn new(config: ParseConfig) -> Self {
        Self {
            config,
            node_callback: None,
        }
    }

    /// Install a hook that runs after each element is attached.
    #[must_use]
    pub fn with_node_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut Document, NodeId, NodeId) -> NodeId + 'a,
    {
        self.node_callback = Some(Box::new(callback));
        self
    }

    /// Parse `markup` into a document.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidOptions`] if the configuration does not validate
    /// - [`Error::NoOpenTag`] for a closing tag with nothing open
    /// - [`Error::MismatchedTag`] for a closing tag that does not match the
    ///   innermost open tag
    /// - [`Error::UnclosedTag`] when input ends with tags still open
    pub fn parse(&mut self, markup: &str) -> Result<ParseOutput<Document>> {
        self.config.validate()?;
        let tokens = tokenize(markup, &self.config.tokenizer_options());

        let mut builder = TreeBuilder {
            config: &self.config,
            node_callback: self.node_callback.as_mut(),
            tree: Document::new(),
            stack_of_open_elements: vec![NodeId::ROOT],
            open_tag_names: Vec::new(),
            filtered_depth: 0,
            names: NameCollector::default(),
        };
        for token in &tokens {
            builder.process_token(token)?;
        }
        builder.finish()
    }
}

/// Parse `markup` with the strict builder and no node callback.
///
/// # Errors
///
/// Same as [`DomParser::parse`].
pub fn parse_document(markup: &str, config: &ParseConfig) -> Result<ParseOutput<Document>> {
    DomParser::new(config.clone()).parse(markup)
}

/// State of one strict parse.
struct TreeBuilder<'p, 'a> {
    config: &'p ParseConfig,
    node_callback: Option<&'p mut NodeCallback<'a>>,
    tree: Document,

    /// Nodes that receive new content; the last one is the current parent.
    /// The document stays at the bottom.
    stack_of_open_elements: Vec<NodeId>,

    /// Names of every open start tag, filtered ones included.
    open_tag_names: Vec<String>,

    /// Number of open filtered elements. While positive, tokens are
    /// validated but neither attached nor classified.
    filtered_depth: usize,

    names: NameCollector,
}

impl TreeBuilder<'_, '_> {
    fn process_token(&mut self, token: &Token) -> Result<()> {
        match token.kind {
            TokenKind::Tag if token.is_end_tag() => self.handle_end_tag(token.tag_name()),
            TokenKind::Tag => self.handle_start_tag(token),
            TokenKind::Text if self.filtered_depth == 0 => {
                let _ = self.insert(NodeType::Text(token.raw.clone()))?;
                Ok(())
            }
            TokenKind::Comment if self.filtered_depth == 0 => {
                let _ = self.insert(NodeType::Comment(token.comment_data().to_string()))?;
                Ok(())
            }
            TokenKind::Doctype if self.filtered_depth == 0 => {
                self.tree.set_doctype(format!("<{}>", token.raw));
                Ok(())
            }
            TokenKind::Text | TokenKind::Comment | TokenKind::Doctype => Ok(()),
        }
    }

    fn handle_start_tag(&mut self, token: &Token) -> Result<()> {
        let tag_name = token.tag_name();
        if !tag_name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            warn_once("Strict Builder", &format!("ignoring declaration <{}>", token.raw));
            return Ok(());
        }
        let self_closing = token.self_closing || is_void_element(tag_name);
        let filtered = self.config.is_filtered_tag(tag_name);

        if filtered || self.filtered_depth > 0 {
            if !self_closing {
                self.open_tag_names.push(tag_name.to_string());
                if filtered {
                    self.filtered_depth += 1;
                }
            }
            return Ok(());
        }

        self.names.record(tag_name);
        let mut attrs = parse_attributes(token.attribute_source());
        if tag_name.eq_ignore_ascii_case("meta")
            && let Some((_, charset)) = attrs
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case("charset"))
        {
            self.tree.set_charset(charset.trim());
        }
        attrs.retain(|name, _| !self.config.is_filtered_attr(name));

        let mut element = ElementData::new(tag_name, attrs);
        element.self_closing = self_closing;
        let parent = self.current_node();
        let mut node = self.insert(NodeType::Element(element))?;
        if let Some(callback) = self.node_callback.as_mut() {
            node = callback(&mut self.tree, node, parent);
        }

        if !self_closing {
            self.open_tag_names.push(tag_name.to_string());
            self.stack_of_open_elements.push(node);
        }
        Ok(())
    }

    fn handle_end_tag(&mut self, tag_name: &str) -> Result<()> {
        // `</br>` and friends close nothing.
        if is_void_element(tag_name) {
            return Ok(());
        }
        let Some(expected) = self.open_tag_names.pop() else {
            return Err(Error::NoOpenTag {
                found: tag_name.to_string(),
            });
        };
        if !expected.eq_ignore_ascii_case(tag_name) {
            return Err(Error::MismatchedTag {
                expected,
                found: tag_name.to_string(),
            });
        }

        if self.filtered_depth > 0 {
            if self.config.is_filtered_tag(tag_name) {
                self.filtered_depth -= 1;
            }
            return Ok(());
        }
        let _ = self.stack_of_open_elements.pop();
        Ok(())
    }

    fn current_node(&self) -> NodeId {
        self.stack_of_open_elements
            .last()
            .copied()
            .unwrap_or(NodeId::ROOT)
    }

    /// Allocate a node and append it to the current node.
    fn insert(&mut self, node_type: NodeType) -> Result<NodeId> {
        let parent = self.current_node();
        let node = self.tree.alloc(node_type);
        self.tree.append(parent, [node])?;
        Ok(node)
    }

    fn finish(self) -> Result<ParseOutput<Document>> {
        if let Some(tag) = self.open_tag_names.last() {
            return Err(Error::UnclosedTag { tag: tag.clone() });
        }
        Ok(self.names.finish(self.tree))
    }
}
