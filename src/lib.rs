//! tagmend - Tag maintenance for markdown notes
//!
//! Extracts hashtags and frontmatter tags from a tree of markdown files, filters
//! out false positives such as hex colors, IDs and URL fragments, and rewrites
//! tags in place: batch renames, frontmatter updates and migration of leading
//! hashtag lines into frontmatter.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::TagError;
