//! CSS selector compiling and matching for the linden HTML engine.
//!
//! Supports a deliberately small subset of
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/):
//!
//! - selector groups: `p, h1` (an element matches if any alternative matches)
//! - compound selectors built from type (`div`), universal (`*`), id
//!   (`#main`), class (`.note`) and attribute (`[href]`, `[type=text]`,
//!   `[lang="en"]`) parts, all of which must match
//!
//! There are no combinators. Whitespace between parts is insignificant, so
//! `div .note` is the same compound as `div.note`; `>`, `+` and `~` are
//! rejected. Pseudo-classes are rejected too.
//!
//! Matching only needs an element's tag name and attributes, which is what
//! the [`Selectable`] trait exposes. Compiled groups are memoized in a
//! [`SelectorCache`].

mod cache;

pub use cache::{CacheStats, DEFAULT_CAPACITY, SelectorCache, compile_cached, global_cache};

use linden_common::{Error, Result};

/// What a selector needs to know about an element.
pub trait Selectable {
    /// The element's tag name as written.
    fn tag_name(&self) -> &str;

    /// Look up an attribute value.
    ///
    /// `name` is always ASCII lowercase; implementors must compare attribute
    /// names ASCII-case-insensitively.
    fn attribute(&self, name: &str) -> Option<&str>;
}

/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSelector {
    /// `[attr]` - "Represents an element with the att attribute"
    Exists(String),
    /// `[attr=value]` - "Represents an element with the att attribute whose
    /// value is exactly 'val'."
    Equals(String, String),
}

/// A single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// Examples: `div`, `p`, `Counter`, `text-element`
    Type(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    ///
    /// Examples: `.highlight`, `.nav-item`
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    ///
    /// Examples: `#main`, `#nav-bar`
    Id(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    Universal,

    /// Attribute presence or equality.
    Attribute(AttributeSelector),
}

impl SimpleSelector {
    /// Check if this simple selector matches the given element.
    pub fn matches<E: Selectable + ?Sized>(&self, element: &E) -> bool {
        match self {
            // Tag names are matched ASCII-case-insensitively.
            Self::Type(name) => element.tag_name().eq_ignore_ascii_case(name),
            Self::Class(class_name) => element
                .attribute("class")
                .is_some_and(|classes| classes.split_whitespace().any(|c| c == class_name)),
            Self::Id(id) => element.attribute("id").is_some_and(|value| value == id),
            Self::Universal => true,
            Self::Attribute(AttributeSelector::Exists(name)) => element.attribute(name).is_some(),
            Self::Attribute(AttributeSelector::Equals(name, expected)) => {
                element.attribute(name).is_some_and(|value| value == expected)
            }
        }
    }
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    /// The list of simple selectors that make up this compound selector.
    pub simple_selectors: Vec<SimpleSelector>,
}

impl CompoundSelector {
    /// All parts must match the element.
    pub fn matches<E: Selectable + ?Sized>(&self, element: &E) -> bool {
        self.simple_selectors
            .iter()
            .all(|simple| simple.matches(element))
    }
}

/// A compiled, comma-separated selector group.
///
/// This is the matcher predicate handed out by [`compile`] and
/// [`SelectorCache::compile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorGroup {
    /// The source text the group was compiled from.
    pub source: String,
    /// One compound selector per comma-separated alternative.
    pub alternatives: Vec<CompoundSelector>,
}

impl SelectorGroup {
    /// Any alternative must match the element.
    pub fn matches<E: Selectable + ?Sized>(&self, element: &E) -> bool {
        self.alternatives
            .iter()
            .any(|compound| compound.matches(element))
    }
}

/// Compile a selector group without caching.
///
/// # Errors
///
/// Returns [`Error::InvalidSelector`] when the group is empty, an
/// alternative is empty, or a part uses unsupported syntax (combinators,
/// pseudo-classes, attribute operators other than `=`).
pub fn compile(raw: &str) -> Result<SelectorGroup> {
    let alternatives = split_group(raw)
        .map_err(|reason| Error::invalid_selector(raw, reason))?
        .into_iter()
        .map(|part| parse_compound(part).map_err(|reason| Error::invalid_selector(raw, reason)))
        .collect::<Result<Vec<_>>>()?;

    Ok(SelectorGroup {
        source: raw.to_string(),
        alternatives,
    })
}

/// Split a group on top-level commas, leaving commas inside `[...]` and
/// quoted attribute values alone.
fn split_group(raw: &str) -> std::result::Result<Vec<&str>, String> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut bracket_depth = 0u32;
    let mut quote: Option<char> = None;

    for (i, c) in raw.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') if bracket_depth > 0 => quote = Some(c),
            (None, '[') => bracket_depth += 1,
            (None, ']') => bracket_depth = bracket_depth.saturating_sub(1),
            (None, ',') if bracket_depth == 0 => {
                parts.push(&raw[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&raw[start..]);

    if parts.iter().all(|part| part.trim().is_empty()) {
        return Err("empty selector".to_string());
    }
    if parts.iter().any(|part| part.trim().is_empty()) {
        return Err("empty alternative in selector group".to_string());
    }
    Ok(parts)
}

/// Check if a character can start an identifier.
/// [§ 4.3.10 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Check if a character can continue an identifier.
/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    is_ident_start_char(c) || c.is_ascii_digit() || c == '-'
}

type Chars<'a> = std::iter::Peekable<std::str::Chars<'a>>;

fn take_ident(chars: &mut Chars<'_>) -> String {
    let mut ident = String::new();
    while let Some(c) = chars.next_if(|&c| is_ident_char(c)) {
        ident.push(c);
    }
    ident
}

fn skip_whitespace(chars: &mut Chars<'_>) {
    while chars.next_if(char::is_ascii_whitespace).is_some() {}
}

fn parse_compound(raw: &str) -> std::result::Result<CompoundSelector, String> {
    let mut chars = raw.trim().chars().peekable();
    let mut simple_selectors = Vec::new();

    while let Some(&c) = chars.peek() {
        match c {
            // Parts are ANDed against the same element; spacing between
            // them carries no meaning.
            _ if c.is_ascii_whitespace() => {
                let _ = chars.next();
            }

            '.' => {
                let _ = chars.next();
                let class_name = take_ident(&mut chars);
                if class_name.is_empty() {
                    return Err("expected a class name after '.'".to_string());
                }
                simple_selectors.push(SimpleSelector::Class(class_name));
            }

            '#' => {
                let _ = chars.next();
                let id = take_ident(&mut chars);
                if id.is_empty() {
                    return Err("expected an id after '#'".to_string());
                }
                simple_selectors.push(SimpleSelector::Id(id));
            }

            '*' => {
                let _ = chars.next();
                simple_selectors.push(SimpleSelector::Universal);
            }

            '[' => {
                let _ = chars.next();
                simple_selectors.push(SimpleSelector::Attribute(parse_attribute(&mut chars)?));
            }

            '>' | '+' | '~' => return Err(format!("combinator '{c}' is not supported")),

            ':' => return Err("pseudo-classes are not supported".to_string()),

            _ if is_ident_start_char(c) || c == '-' => {
                simple_selectors.push(SimpleSelector::Type(take_ident(&mut chars)));
            }

            _ => return Err(format!("unexpected character '{c}'")),
        }
    }

    Ok(CompoundSelector { simple_selectors })
}

/// Parse the inside of `[...]`; the opening bracket is already consumed.
fn parse_attribute(chars: &mut Chars<'_>) -> std::result::Result<AttributeSelector, String> {
    skip_whitespace(chars);
    let mut name = String::new();
    while let Some(c) = chars.next_if(|&c| is_ident_char(c) || c == ':') {
        name.push(c.to_ascii_lowercase());
    }
    if name.is_empty() {
        return Err("expected an attribute name after '['".to_string());
    }
    skip_whitespace(chars);

    match chars.next() {
        Some(']') => Ok(AttributeSelector::Exists(name)),
        Some('=') => {
            let value = parse_attr_value(chars).ok_or("expected an attribute value")?;
            skip_whitespace(chars);
            match chars.next() {
                Some(']') => Ok(AttributeSelector::Equals(name, value)),
                _ => Err("expected ']' after attribute value".to_string()),
            }
        }
        Some(op @ ('~' | '|' | '^' | '$' | '*')) => {
            Err(format!("attribute operator '{op}=' is not supported"))
        }
        _ => Err("unterminated attribute selector".to_string()),
    }
}

fn parse_attr_value(chars: &mut Chars<'_>) -> Option<String> {
    // Skip whitespace before value
    skip_whitespace(chars);

    match chars.peek() {
        Some(&q @ ('"' | '\'')) => {
            let _ = chars.next(); // consume opening quote
            let mut val = String::new();
            for ch in chars.by_ref() {
                if ch == q {
                    return Some(val);
                }
                val.push(ch);
            }
            None // unterminated string
        }
        Some(_) => {
            // Unquoted value
            let mut val = String::new();
            while let Some(ch) = chars.next_if(|&ch| is_ident_char(ch) || ch == '.') {
                val.push(ch);
            }
            if val.is_empty() { None } else { Some(val) }
        }
        None => None,
    }
}
