//! Tree builders for the linden HTML engine.
//!
//! # Scope
//!
//! Both builders tokenize the input once and walk the tokens left to right
//! with an explicit stack of open elements:
//!
//! - **Strict** ([`DomParser`], [`parse_document`]) builds a
//!   [`linden_dom::Document`], validates nesting and aborts on the first
//!   violation. It applies the tag and attribute filters of [`ParseConfig`]
//!   and can run a callback on every attached element.
//! - **Lenient** ([`LenientParser`], [`parse_from_string`]) builds plain
//!   [`linden_dom::PlainDocument`] records, closes whatever is innermost on
//!   each closing tag and never fails on nesting.
//!
//! Both return a [`ParseOutput`] listing the distinct tag names seen, split
//! into components (capitalized or hyphenated names) and plain tags.
//!
//! # Not Implemented
//!
//! - Implicit tag insertion and the WHATWG insertion modes
//! - Character reference decoding
//! - Encoding sniffing

/// Attribute grammar for tag sources.
pub mod attributes;
/// Parse options.
pub mod config;
/// Lenient builder.
pub mod lenient;
/// Parse results and name classification.
pub mod output;
/// Strict builder.
pub mod strict;
/// Debug tree rendering.
pub mod tree_dump;

pub use attributes::parse_attributes;
pub use config::ParseConfig;
pub use lenient::{LenientParser, parse_from_string};
pub use output::{ParseOutput, is_component_name};
pub use strict::{DomParser, NodeCallback, parse_document};
pub use tree_dump::{dump_tree, print_tree};
