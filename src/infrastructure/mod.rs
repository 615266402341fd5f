//! Infrastructure layer - Configuration, scanning and file access

pub mod config;
pub mod scanner;
pub mod vault;

pub use config::{Config, TagPatterns};
pub use scanner::{CancelToken, TagScan, TagScanner};
pub use vault::{NoteRepository, Vault};
