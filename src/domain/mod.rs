//! Domain layer - Tag algorithms and document models

pub mod frontmatter;
pub mod records;
pub mod tags;

pub use frontmatter::{Frontmatter, FrontmatterDocument, TagField};
pub use records::{FileTagRecord, TagInfo};
