//! Attribute grammar for tag sources.
//!
//! The tokenizer hands tags over as raw text; this module splits the part
//! after the tag name into name/value pairs:
//!
//! - `name="value"` and `name='value'` keep everything between the quotes
//! - `name=value` runs to the next whitespace
//! - `name` alone gets an empty value
//! - a lone `/` is ignored
//!
//! The first occurrence of a name wins. Names are compared
//! ASCII-case-insensitively for that purpose but stored as written.

use linden_common::warning::warn_once;
use linden_dom::AttributesMap;

type Chars<'a> = std::iter::Peekable<std::str::CharIndices<'a>>;

/// Parse the attribute part of a tag source.
#[must_use]
pub fn parse_attributes(source: &str) -> AttributesMap {
    let mut attrs = AttributesMap::new();
    let mut chars = source.char_indices().peekable();

    loop {
        skip_whitespace(&mut chars);
        let Some(&(start, _)) = chars.peek() else {
            break;
        };

        let mut end = start;
        while let Some((i, c)) = chars.next_if(|&(_, c)| !c.is_whitespace() && c != '=') {
            end = i + c.len_utf8();
        }
        let name = &source[start..end];

        skip_whitespace(&mut chars);
        let value = if chars.next_if(|&(_, c)| c == '=').is_some() {
            skip_whitespace(&mut chars);
            parse_value(source, &mut chars)
        } else {
            ""
        };

        if name.is_empty() || name == "/" {
            continue;
        }
        if attrs.keys().any(|key| key.eq_ignore_ascii_case(name)) {
            warn_once(
                "Attributes",
                &format!("duplicate attribute '{name}' ignored; the first value is kept"),
            );
            continue;
        }
        let _ = attrs.insert(name.to_string(), value.to_string());
    }

    attrs
}

fn skip_whitespace(chars: &mut Chars<'_>) {
    while chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}
}

/// Read a quoted or bare value. An unterminated quote runs to the end.
fn parse_value<'a>(source: &'a str, chars: &mut Chars<'_>) -> &'a str {
    match chars.peek() {
        Some(&(i, quote @ ('"' | '\''))) => {
            let _ = chars.next();
            let start = i + 1;
            for (j, c) in chars.by_ref() {
                if c == quote {
                    return &source[start..j];
                }
            }
            &source[start..]
        }
        Some(&(start, _)) => {
            let mut end = start;
            while let Some((i, c)) = chars.next_if(|&(_, c)| !c.is_whitespace()) {
                end = i + c.len_utf8();
            }
            &source[start..end]
        }
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(source: &str) -> Vec<(String, String)> {
        parse_attributes(source).into_iter().collect()
    }

    fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_value_forms() {
        assert_eq!(
            pairs(r#" a="1 2" b='x "y"' c=bare d"#),
            owned(&[("a", "1 2"), ("b", "x \"y\""), ("c", "bare"), ("d", "")])
        );
    }

    #[test]
    fn test_spaces_around_equals() {
        assert_eq!(pairs(" href = \"/home\" "), owned(&[("href", "/home")]));
    }

    #[test]
    fn test_lone_slash_is_ignored() {
        assert_eq!(pairs(" src=a.png / alt=x"), owned(&[("src", "a.png"), ("alt", "x")]));
    }

    #[test]
    fn test_bare_value_may_contain_slashes() {
        assert_eq!(pairs(" href=/a/b/"), owned(&[("href", "/a/b/")]));
    }

    #[test]
    fn test_first_occurrence_wins() {
        assert_eq!(
            pairs(" ID=first id=second Class=x"),
            owned(&[("ID", "first"), ("Class", "x")])
        );
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        assert_eq!(pairs(" title=\"open"), owned(&[("title", "open")]));
    }

    #[test]
    fn test_empty_source() {
        assert!(parse_attributes("").is_empty());
        assert!(parse_attributes("   ").is_empty());
    }
}
