use strum_macros::{Display, EnumIter};

/// The lexical category of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum TokenKind {
    /// A start or end tag. End tags keep their leading `/` in [`Token::raw`].
    Tag,
    /// Character data, trimmed outside raw-text elements.
    Text,
    /// A `<!-- ... -->` comment, delimiters included.
    Comment,
    /// A `<!DOCTYPE ...>` declaration.
    Doctype,
}

/// One lexical unit of markup.
///
/// Tokens are produced once per input and consumed in order. They keep no
/// reference to their position in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// The token's source text.
    ///
    /// For tags and doctypes this is everything between `<` and `>`, with a
    /// self-closing `/` removed. For comments it is the whole comment
    /// including delimiters. For text it is the character data.
    pub raw: String,
    /// Whether the tag ended in `/>`.
    pub self_closing: bool,
}

impl Token {
    /// Create a tag token from its raw source (without `<`, `>` or a
    /// trailing self-closing `/`).
    #[must_use]
    pub fn new_tag(raw: impl Into<String>, self_closing: bool) -> Self {
        Self {
            kind: TokenKind::Tag,
            raw: raw.into(),
            self_closing,
        }
    }

    /// Create a text token.
    #[must_use]
    pub fn new_text(raw: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Text,
            raw: raw.into(),
            self_closing: false,
        }
    }

    /// Create a comment token. `raw` keeps the `<!--` and `-->` delimiters.
    #[must_use]
    pub fn new_comment(raw: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Comment,
            raw: raw.into(),
            self_closing: false,
        }
    }

    /// Create a doctype token from the text between `<` and `>`.
    #[must_use]
    pub fn new_doctype(raw: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Doctype,
            raw: raw.into(),
            self_closing: false,
        }
    }

    /// Returns true for an end tag such as `</div>`.
    #[must_use]
    pub fn is_end_tag(&self) -> bool {
        self.kind == TokenKind::Tag && self.raw.starts_with('/')
    }

    /// The tag name as written: everything after an optional leading `/` up
    /// to the first whitespace or `/`.
    ///
    /// Returns an empty string for non-tag tokens.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        if self.kind != TokenKind::Tag {
            return "";
        }
        let body = self.raw.strip_prefix('/').unwrap_or(&self.raw);
        let end = body
            .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
            .unwrap_or(body.len());
        &body[..end]
    }

    /// The part of a tag's source that follows its name, where attributes
    /// live.
    #[must_use]
    pub fn attribute_source(&self) -> &str {
        if self.kind != TokenKind::Tag {
            return "";
        }
        let body = self.raw.strip_prefix('/').unwrap_or(&self.raw);
        &body[self.tag_name().len()..]
    }

    /// The body of a comment token, without its delimiters.
    #[must_use]
    pub fn comment_data(&self) -> &str {
        let body = self.raw.strip_prefix("<!--").unwrap_or(&self.raw);
        body.strip_suffix("-->").unwrap_or(body)
    }
}
