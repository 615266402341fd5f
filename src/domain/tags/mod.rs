//! Tag system

pub mod extractor;
pub mod heuristics;
pub mod migration;
pub mod rewrite;
pub mod validator;

// Re-export main types
pub use extractor::TagExtractor;
pub use heuristics::{eq_fold, normalize_tag, normalize_tags, Heuristics};
pub use rewrite::{remove_hashtag, rename_tag, RewriteResult};
pub use validator::{TagIssue, TagValidator, ValidationReport};
