//! Lenient tree builder producing plain records.
//!
//! Closing tags simply close the innermost open element, whatever its name.
//! A closing tag with nothing open is ignored and tags still open at the
//! end of input are closed implicitly, so the only possible failure is an
//! invalid configuration. Filters are not applied.

use linden_common::Result;
use linden_common::warning::warn_once;
use linden_dom::{PlainDocument, PlainNode, is_void_element};
use linden_tokenizer::{Token, TokenKind, tokenize};

use crate::attributes::parse_attributes;
use crate::config::ParseConfig;
use crate::output::{NameCollector, ParseOutput};

/// Builds a [`PlainDocument`] from markup without nesting checks.
#[derive(Debug, Clone, Default)]
pub struct LenientParser {
    config: ParseConfig,
}

impl LenientParser {
    /// Create a parser with the given options.
    #[must_use]
    pub const fn new(config: ParseConfig) -> Self {
        Self { config }
    }

    /// Parse `markup` into plain records.
    ///
    /// # Errors
    ///
    /// Returns [`linden_common::Error::InvalidOptions`] if the configuration
    /// does not validate.
    pub fn parse(&self, markup: &str) -> Result<ParseOutput<PlainDocument>> {
        self.config.validate()?;
        let tokens = tokenize(markup, &self.config.tokenizer_options());

        let mut builder = PlainBuilder::default();
        for token in &tokens {
            builder.process_token(token);
        }
        Ok(builder.finish())
    }
}

/// Parse `markup` with the lenient builder.
///
/// # Errors
///
/// Same as [`LenientParser::parse`].
pub fn parse_from_string(markup: &str, config: &ParseConfig) -> Result<ParseOutput<PlainDocument>> {
    LenientParser::new(config.clone()).parse(markup)
}

#[derive(Default)]
struct PlainBuilder {
    document: PlainDocument,
    /// Open elements, innermost last. Each collects its children until it
    /// is closed and moved into its parent.
    open_elements: Vec<PlainNode>,
    names: NameCollector,
}

impl PlainBuilder {
    fn process_token(&mut self, token: &Token) {
        match token.kind {
            TokenKind::Doctype => self.document.doctype = Some(format!("<{}>", token.raw)),
            TokenKind::Comment => self.insert(PlainNode::Comment {
                value: token.comment_data().to_string(),
            }),
            TokenKind::Text => self.insert(PlainNode::Text {
                value: token.raw.clone(),
            }),
            TokenKind::Tag if token.is_end_tag() => self.handle_end_tag(token.tag_name()),
            TokenKind::Tag => self.handle_start_tag(token),
        }
    }

    fn handle_start_tag(&mut self, token: &Token) {
        let tag_name = token.tag_name();
        if !tag_name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            warn_once("Lenient Builder", &format!("ignoring declaration <{}>", token.raw));
            return;
        }
        self.names.record(tag_name);

        let attrs = parse_attributes(token.attribute_source());
        if tag_name.eq_ignore_ascii_case("meta")
            && let Some((_, charset)) = attrs
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case("charset"))
        {
            self.document.charset = Some(charset.trim().to_ascii_uppercase());
        }

        let self_closing = token.self_closing || is_void_element(tag_name);
        let element = PlainNode::element(tag_name, attrs, self_closing);
        if self_closing {
            self.insert(element);
        } else {
            self.open_elements.push(element);
        }
    }

    fn handle_end_tag(&mut self, tag_name: &str) {
        if is_void_element(tag_name) {
            return;
        }
        match self.open_elements.pop() {
            Some(element) => self.insert(element),
            None => warn_once(
                "Lenient Builder",
                &format!("ignoring closing tag </{tag_name}> with no open element"),
            ),
        }
    }

    /// Append a finished node to the innermost open element, or to the
    /// document when nothing is open.
    fn insert(&mut self, node: PlainNode) {
        match self.open_elements.last_mut() {
            Some(parent) => parent.push_child(node),
            None => self.document.children.push(node),
        }
    }

    fn finish(mut self) -> ParseOutput<PlainDocument> {
        while let Some(element) = self.open_elements.pop() {
            warn_once(
                "Lenient Builder",
                &format!(
                    "closing <{}> implicitly at end of input",
                    element.tag_name().unwrap_or_default()
                ),
            );
            self.insert(element);
        }
        self.names.finish(self.document)
    }
}
