//! Script text transformations: statement splitting and parameter binding.
//!
//! These are narrowly-scoped text utilities, not a SQL parser. Scripts
//! are treated as opaque text with one recognized shape: zero or more
//! `SET` configuration statements followed by one reporting query.

pub mod binder;
pub mod splitter;

pub use binder::bind;
pub use splitter::{split, SplitScript};
