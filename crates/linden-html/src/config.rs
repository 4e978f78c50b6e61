//! Parse configuration shared by both tree builders.

use linden_common::{Error, Result};
use linden_tokenizer::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_SCRIPT_SIZE, TokenizerOptions};
use serde::{Deserialize, Serialize};

/// Options for a parse.
///
/// Missing fields take their default when deserialized, so a JSON config
/// file only needs the keys it changes:
///
/// ```
/// let config: linden_html::ParseConfig =
///     serde_json::from_str(r#"{ "filter_tags": ["script"] }"#).unwrap();
/// assert_eq!(config.chunk_size, 65_536);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Tag names whose elements are dropped with their whole subtree.
    /// Strict builder only.
    pub filter_tags: Vec<String>,
    /// Attribute names removed from every element, compared
    /// ASCII-case-insensitively. Strict builder only.
    pub filter_attrs: Vec<String>,
    /// Cap in bytes on the content of one `<script>` or `<style>`.
    pub max_script_size: usize,
    /// Input bytes walked per tokenizer chunk.
    pub chunk_size: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            filter_tags: Vec::new(),
            filter_attrs: Vec::new(),
            max_script_size: DEFAULT_MAX_SCRIPT_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ParseConfig {
    /// Replace the filtered tag names.
    #[must_use]
    pub fn with_filter_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the filtered attribute names.
    #[must_use]
    pub fn with_filter_attrs<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter_attrs = attrs.into_iter().map(Into::into).collect();
        self
    }

    /// Set the script and style content cap.
    #[must_use]
    pub const fn with_max_script_size(mut self, max_script_size: usize) -> Self {
        self.max_script_size = max_script_size;
        self
    }

    /// Set the tokenizer chunk size.
    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Check that the options are usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOptions`] when `chunk_size` or
    /// `max_script_size` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidOptions(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.max_script_size == 0 {
            return Err(Error::InvalidOptions(
                "max_script_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The tokenizer settings these options imply.
    #[must_use]
    pub const fn tokenizer_options(&self) -> TokenizerOptions {
        TokenizerOptions {
            max_script_size: self.max_script_size,
            chunk_size: self.chunk_size,
        }
    }

    /// Whether elements named `tag_name` are dropped.
    #[must_use]
    pub fn is_filtered_tag(&self, tag_name: &str) -> bool {
        self.filter_tags
            .iter()
            .any(|tag| tag.eq_ignore_ascii_case(tag_name))
    }

    /// Whether attributes named `name` are dropped.
    #[must_use]
    pub fn is_filtered_attr(&self, name: &str) -> bool {
        self.filter_attrs
            .iter()
            .any(|attr| attr.eq_ignore_ascii_case(name))
    }
}
