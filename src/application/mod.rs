//! Application layer - Use cases and orchestration

pub mod file_tags;
pub mod find_tags;
pub mod list_tags;
pub mod replace_tags;
pub mod untagged;
pub mod update_tags;
pub mod validate_tags;

pub use file_tags::get_tags_for_files;
pub use find_tags::FindTagsService;
pub use list_tags::ListTagsService;
pub use replace_tags::{replace_batch, ReplaceOptions, ReplaceOutcome};
pub use untagged::UntaggedService;
pub use update_tags::{resolve_conflicts, update_tags, UpdateOptions, UpdateOutcome};
pub use validate_tags::validate_tags;

use crate::domain::FileTagRecord;
use crate::error::{Result, TagError};
use crate::infrastructure::TagScan;
use tracing::warn;

/// Drain a scan, logging and skipping entries that could not be read.
/// Only cancellation stops the drain early.
pub(crate) fn for_each_record(scan: TagScan<'_>, mut visit: impl FnMut(FileTagRecord)) -> Result<()> {
    for item in scan {
        match item {
            Ok(record) => visit(record),
            Err(TagError::Cancelled) => return Err(TagError::Cancelled),
            Err(err) => warn!(error = %err, "skipping unreadable entry"),
        }
    }
    Ok(())
}
