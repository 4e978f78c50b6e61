use strum_macros::Display;

use crate::token::Token;
use crate::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_SCRIPT_SIZE};

/// Tuning knobs for [`tokenize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// Maximum number of bytes kept from one `<script>` or `<style>` body.
    /// Content past the cap is dropped.
    pub max_script_size: usize,
    /// Number of input bytes walked per outer iteration.
    pub chunk_size: usize,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            max_script_size: DEFAULT_MAX_SCRIPT_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// The tokenizer's current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// Character data between tags.
    Data,
    /// Inside `<` ... `>`.
    Tag,
    /// Inside the body of a `<script>` or `<style>` element.
    RawText,
}

/// Character-level markup tokenizer.
///
/// Call [`Tokenizer::run`] once, then [`Tokenizer::into_tokens`]. Most
/// callers want the [`tokenize`] shorthand.
pub struct Tokenizer<'a> {
    pub(crate) input: &'a str,
    pub(crate) options: TokenizerOptions,
    pub(crate) state: TokenizerState,
    /// Byte offset of the next character to consume.
    pub(crate) pos: usize,
    /// Pending character data in the data state.
    pub(crate) text_buffer: String,
    /// Source of the tag being read, without the leading `<`.
    pub(crate) tag_buffer: String,
    /// Whether an `=` has been seen in the current tag; quotes only count
    /// after one.
    pub(crate) seen_equals: bool,
    /// Open quote character in a tag or raw-text body.
    pub(crate) quote: Option<char>,
    /// Inside a backtick template literal in a raw-text body.
    pub(crate) in_template: bool,
    /// The previous raw-text character was a backslash inside a literal.
    pub(crate) escape_next: bool,
    /// Lower-cased name of the raw-text element being read.
    pub(crate) raw_text_tag: String,
    /// Raw-text body, capped at `max_script_size` bytes.
    pub(crate) raw_text_buffer: String,
    pub(crate) raw_text_truncated: bool,
    pub(crate) token_stream: Vec<Token>,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer over `input`. The initial state is [`TokenizerState::Data`].
    #[must_use]
    pub const fn new(input: &'a str, options: TokenizerOptions) -> Self {
        Self {
            input,
            options,
            state: TokenizerState::Data,
            pos: 0,
            text_buffer: String::new(),
            tag_buffer: String::new(),
            seen_equals: false,
            quote: None,
            in_template: false,
            escape_next: false,
            raw_text_tag: String::new(),
            raw_text_buffer: String::new(),
            raw_text_truncated: false,
            token_stream: Vec::new(),
        }
    }

    /// Consume the tokenizer and return the token stream.
    /// Call this after [`Tokenizer::run`].
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.token_stream
    }

    /// Tokenize the whole input.
    ///
    /// The input is walked chunk by chunk. A handler may consume past the end
    /// of the current chunk (a comment, a closing raw-text tag); the next
    /// chunk then starts wherever it stopped.
    pub fn run(&mut self) {
        let len = self.input.len();
        while self.pos < len {
            let chunk_end = self.chunk_end();
            while self.pos < chunk_end {
                let Some(c) = self.input[self.pos..].chars().next() else {
                    break;
                };
                match self.state {
                    TokenizerState::Data => self.handle_data_state(c),
                    TokenizerState::Tag => self.handle_tag_state(c),
                    TokenizerState::RawText => self.handle_raw_text_state(c),
                }
            }
        }
        self.finish();
    }

    /// End of the chunk starting at the current position, moved forward to a
    /// character boundary.
    fn chunk_end(&self) -> usize {
        let len = self.input.len();
        let mut end = self
            .pos
            .saturating_add(self.options.chunk_size.max(1))
            .min(len);
        while !self.input.is_char_boundary(end) {
            end += 1;
        }
        end
    }

    fn handle_data_state(&mut self, c: char) {
        if c != '<' {
            self.text_buffer.push(c);
            self.pos += c.len_utf8();
            return;
        }

        self.flush_text();
        let rest = &self.input[self.pos..];
        if rest.starts_with("<!--") {
            self.consume_comment();
        } else if rest.starts_with("<![CDATA[") {
            self.consume_cdata();
        } else {
            self.tag_buffer.clear();
            self.seen_equals = false;
            self.quote = None;
            self.state = TokenizerState::Tag;
            self.pos += 1;
        }
    }

    fn handle_tag_state(&mut self, c: char) {
        self.pos += c.len_utf8();

        if let Some(quote) = self.quote {
            if c == quote {
                self.quote = None;
            }
            self.tag_buffer.push(c);
            return;
        }

        match c {
            '>' => self.emit_tag(),
            '"' | '\'' if self.seen_equals => {
                self.quote = Some(c);
                self.tag_buffer.push(c);
            }
            '=' => {
                self.seen_equals = true;
                self.tag_buffer.push(c);
            }
            _ => self.tag_buffer.push(c),
        }
    }

    fn handle_raw_text_state(&mut self, c: char) {
        let width = c.len_utf8();

        if self.escape_next {
            self.escape_next = false;
        } else if self.in_template {
            match c {
                '\\' => self.escape_next = true,
                '`' => self.in_template = false,
                _ => {}
            }
        } else if let Some(quote) = self.quote {
            match c {
                '\\' => self.escape_next = true,
                // String literals cannot span lines, so an unbalanced
                // apostrophe in a comment only poisons its own line.
                '\n' => self.quote = None,
                _ if c == quote => self.quote = None,
                _ => {}
            }
        } else {
            match c {
                '`' => self.in_template = true,
                '"' | '\'' => self.quote = Some(c),
                '<' if self.at_raw_text_end() => {
                    self.close_raw_text();
                    return;
                }
                _ => {}
            }
        }

        self.push_raw_text(c);
        self.pos += width;
    }

    /// Flush whatever is still buffered once the input is exhausted.
    fn finish(&mut self) {
        match self.state {
            TokenizerState::Data => self.flush_text(),
            TokenizerState::Tag => {
                let pending = std::mem::take(&mut self.tag_buffer);
                self.text_buffer.push('<');
                self.text_buffer.push_str(&pending);
                self.flush_text();
            }
            TokenizerState::RawText => {
                let body = std::mem::take(&mut self.raw_text_buffer);
                self.emit_raw_text(body);
            }
        }
        self.state = TokenizerState::Data;
    }
}

/// Tokenize `markup` in one call.
///
/// # Example
/// ```
/// use linden_tokenizer::{TokenKind, TokenizerOptions, tokenize};
///
/// let tokens = tokenize("<p>Hi</p>", &TokenizerOptions::default());
/// assert_eq!(tokens.len(), 3);
/// assert_eq!(tokens[1].kind, TokenKind::Text);
/// ```
#[must_use]
pub fn tokenize(markup: &str, options: &TokenizerOptions) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(markup, *options);
    tokenizer.run();
    tokenizer.into_tokens()
}
