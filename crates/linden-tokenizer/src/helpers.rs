//! Helper methods for the tokenizer state machine.
//!
//! This module contains the buffer and emission steps shared by the states:
//! - Text flushing ("emit the pending character data, trimmed")
//! - Lookahead runs for comments and CDATA sections
//! - Tag emission, including the switch into raw-text mode
//! - Raw-text end detection and capped buffering

use linden_common::escape::escape_html;
use linden_common::warning::warn_once;

use crate::token::Token;
use crate::tokenizer::{Tokenizer, TokenizerState};

/// Elements whose content is not tokenized as markup.
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

// =============================================================================
// Text Helpers
// =============================================================================

impl Tokenizer<'_> {
    /// Emit the pending character data as a trimmed text token. Whitespace-only
    /// data is dropped.
    pub(crate) fn flush_text(&mut self) {
        let text = self.text_buffer.trim();
        if !text.is_empty() {
            self.token_stream.push(Token::new_text(text));
        }
        self.text_buffer.clear();
    }
}

// =============================================================================
// Lookahead Runs
// =============================================================================

impl Tokenizer<'_> {
    /// Consume `<!-- ... -->` up to its literal terminator, ignoring any `<`
    /// or `>` inside. An unterminated comment runs to the end of input.
    pub(crate) fn consume_comment(&mut self) {
        let start = self.pos;
        let body = start + "<!--".len();
        let end = self.input[body..]
            .find("-->")
            .map_or(self.input.len(), |i| body + i + "-->".len());
        self.token_stream
            .push(Token::new_comment(&self.input[start..end]));
        self.pos = end;
    }

    /// Consume `<![CDATA[ ... ]]>`. The content is entity-escaped and
    /// re-wrapped before being emitted as text.
    pub(crate) fn consume_cdata(&mut self) {
        let body = self.pos + "<![CDATA[".len();
        let (content_end, end) = self.input[body..].find("]]>").map_or(
            (self.input.len(), self.input.len()),
            |i| (body + i, body + i + "]]>".len()),
        );
        let content = escape_html(&self.input[body..content_end]);
        self.token_stream
            .push(Token::new_text(format!("<![CDATA[{content}]]>")));
        self.pos = end;
    }
}

// =============================================================================
// Tag Emission
// =============================================================================

impl Tokenizer<'_> {
    /// Emit the buffered tag on `>`.
    ///
    /// A trailing `/` marks the tag self-closing and is stripped. Empty tags
    /// are dropped. Sources starting with `!doctype` (any case) become
    /// doctype tokens. A non-self-closing `script` or `style` start tag
    /// switches to raw-text mode.
    pub(crate) fn emit_tag(&mut self) {
        let buffer = std::mem::take(&mut self.tag_buffer);
        self.seen_equals = false;
        self.state = TokenizerState::Data;

        let mut raw = buffer.trim();
        let self_closing = raw.ends_with('/');
        if self_closing {
            raw = raw[..raw.len() - 1].trim_end();
        }
        if raw.is_empty() || raw == "/" {
            return;
        }

        if raw
            .get(.."!doctype".len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("!doctype"))
        {
            self.token_stream.push(Token::new_doctype(raw));
            return;
        }

        let token = Token::new_tag(raw, self_closing);
        if !self_closing && !token.is_end_tag() {
            let name = token.tag_name().to_ascii_lowercase();
            if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                self.enter_raw_text(name);
            }
        }
        self.token_stream.push(token);
    }

    fn enter_raw_text(&mut self, name: String) {
        self.raw_text_tag = name;
        self.raw_text_buffer.clear();
        self.raw_text_truncated = false;
        self.quote = None;
        self.in_template = false;
        self.escape_next = false;
        self.state = TokenizerState::RawText;
    }
}

// =============================================================================
// Raw Text Helpers
// =============================================================================

impl Tokenizer<'_> {
    /// Whether the input at the current position is `</name>` for the open
    /// raw-text element (case-insensitive, whitespace allowed before `>`).
    pub(crate) fn at_raw_text_end(&self) -> bool {
        let Some(after) = self.input[self.pos..].strip_prefix("</") else {
            return false;
        };
        let name_len = self.raw_text_tag.len();
        after
            .get(..name_len)
            .is_some_and(|name| name.eq_ignore_ascii_case(&self.raw_text_tag))
            && after[name_len..].trim_start().starts_with('>')
    }

    /// Emit the raw-text body followed by the closing tag, and return to the
    /// data state.
    pub(crate) fn close_raw_text(&mut self) {
        let rest = &self.input[self.pos..];
        let close_len = rest.find('>').map_or(rest.len(), |i| i + 1);
        let closing = rest[1..close_len - 1].trim().to_string();

        let body = std::mem::take(&mut self.raw_text_buffer);
        self.emit_raw_text(body);
        self.token_stream.push(Token::new_tag(closing, false));

        self.pos += close_len;
        self.state = TokenizerState::Data;
    }

    /// Emit a raw-text body verbatim, unless it is only whitespace.
    pub(crate) fn emit_raw_text(&mut self, body: String) {
        if !body.trim().is_empty() {
            self.token_stream.push(Token::new_text(body));
        }
    }

    /// Append to the raw-text body while it is under `max_script_size`.
    pub(crate) fn push_raw_text(&mut self, c: char) {
        if self.raw_text_buffer.len() + c.len_utf8() <= self.options.max_script_size {
            self.raw_text_buffer.push(c);
        } else if !self.raw_text_truncated {
            self.raw_text_truncated = true;
            warn_once(
                "Tokenizer",
                &format!(
                    "<{}> content exceeds {} bytes; the rest is dropped",
                    self.raw_text_tag, self.options.max_script_size
                ),
            );
        }
    }
}
