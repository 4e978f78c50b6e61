//! Error type shared by every linden crate.
//!
//! All errors are immediate and abort the operation that raised them. Each
//! message starts with the `linden:` domain tag so callers can tell engine
//! errors apart from their own.

use thiserror::Error;

/// Result alias used across the linden crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Every error the tokenizer, tree builders, façade and selector engine raise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A configuration value is unusable (for example a zero chunk size).
    #[error("linden: invalid options: {0}")]
    InvalidOptions(String),

    /// A closing tag arrived while no tag was open.
    #[error("linden: unexpected closing tag </{found}>, no open tag found")]
    NoOpenTag {
        /// Name of the closing tag.
        found: String,
    },

    /// A closing tag does not match the innermost open tag.
    #[error("linden: unexpected closing tag </{found}>, expected </{expected}>")]
    MismatchedTag {
        /// Name of the innermost open tag.
        expected: String,
        /// Name of the closing tag that was found instead.
        found: String,
    },

    /// Input ended while a tag was still open.
    #[error("linden: unclosed tag <{tag}>")]
    UnclosedTag {
        /// Name of the innermost tag left open.
        tag: String,
    },

    /// A handle does not refer to a node of this document.
    #[error("linden: {0} is not a node of this document")]
    NotANode(usize),

    /// A node is not a child of the given parent.
    #[error("linden: node {child} is not a child of node {parent}")]
    NotAChild {
        /// Handle of the presumed parent.
        parent: usize,
        /// Handle of the node that was looked up.
        child: usize,
    },

    /// The requested insertion would produce an invalid tree.
    #[error("linden: cannot insert node {child} into node {parent}: {reason}")]
    HierarchyRequest {
        /// Handle of the target parent.
        parent: usize,
        /// Handle of the node being inserted.
        child: usize,
        /// Why the insertion was refused.
        reason: &'static str,
    },

    /// A selector group could not be compiled.
    #[error("linden: invalid selector {selector:?}: {reason}")]
    InvalidSelector {
        /// The selector group as given.
        selector: String,
        /// What the compiler rejected.
        reason: String,
    },
}

impl Error {
    /// Build an [`Error::InvalidSelector`].
    #[must_use]
    pub fn invalid_selector(selector: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }
}
