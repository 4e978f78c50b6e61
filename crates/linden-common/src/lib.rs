//! Common utilities for the linden HTML engine.
//!
//! This crate provides shared infrastructure used by every linden crate:
//! - **Errors** - the single [`Error`] enum and [`Result`] alias
//! - **Warning System** - colored, deduplicated terminal warnings
//! - **Escaping** - entity escaping for text and attribute values

pub mod error;
pub mod escape;
pub mod warning;

pub use error::{Error, Result};
