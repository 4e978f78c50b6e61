//! Markup tokenizer for the linden HTML engine.
//!
//! # Scope
//!
//! The tokenizer is a single pass, character-level state machine that turns
//! markup into an ordered list of [`Token`]s:
//! - **Tags** carry their raw source between `<` and `>`; attributes are
//!   parsed later by the tree builder
//! - **Raw text** inside `<script>` and `<style>` is kept verbatim, honoring
//!   string and template literals so an embedded `</script>` in a string does
//!   not end the element
//! - **Comments** keep their delimiters; **CDATA** sections are escaped and
//!   emitted as text
//!
//! Input is walked in fixed-size chunks to bound the work done per
//! iteration. Lookahead always reads the full input, so chunk edges never
//! move a token boundary.
//!
//! # Not Implemented
//!
//! - Character reference decoding
//! - Encoding sniffing
//! - WHATWG tokenizer states beyond data, tag and raw text

/// Tokenizer state machine.
pub mod tokenizer;
/// Buffer and emission helpers for the state machine.
mod helpers;
/// Token types produced by the tokenizer.
pub mod token;

pub use tokenizer::{Tokenizer, TokenizerOptions, TokenizerState, tokenize};
pub use token::{Token, TokenKind};

/// Default cap, in bytes, on the content of a single `<script>` or `<style>`.
pub const DEFAULT_MAX_SCRIPT_SIZE: usize = 131_072;

/// Default number of input bytes walked per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 65_536;
