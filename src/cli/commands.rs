//! CLI command definitions

use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tagmend")]
#[command(about = "Find, validate and rewrite tags in markdown notes", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (TOML). Falls back to $TAGMEND_CONFIG, then built-in defaults
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Stop between files once this many seconds have passed
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Vault root shared by commands that walk a directory
#[derive(Args, Debug, Clone)]
pub struct RootArg {
    /// Vault root directory (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find files containing any of the given tags
    Find {
        /// Tags to look for (comma-separated, '#' optional)
        #[arg(long, value_delimiter = ',', required = true)]
        tags: Vec<String>,

        /// Show at most this many files per tag
        #[arg(long)]
        max_results: Option<usize>,

        #[command(flatten)]
        root: RootArg,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show usage counts and files for the given tags
    Info {
        #[arg(long, value_delimiter = ',', required = true)]
        tags: Vec<String>,

        #[command(flatten)]
        root: RootArg,

        #[arg(long)]
        json: bool,
    },

    /// List every tag in the vault
    List {
        /// Only show tags used in at least this many files
        #[arg(long, default_value_t = 0)]
        min_count: usize,

        /// Only show tags whose name contains this text
        #[arg(long)]
        pattern: Option<String>,

        #[command(flatten)]
        root: RootArg,

        #[arg(long)]
        json: bool,
    },

    /// Rename tags across the vault
    #[command(group(ArgGroup::new("pairs").required(true).args(["old", "replacements"])))]
    Replace {
        /// Tag to rename
        #[arg(long, requires = "new", conflicts_with = "replacements")]
        old: Option<String>,

        /// New name for --old
        #[arg(long, requires = "old")]
        new: Option<String>,

        /// Several renames at once: old:new,old2:new2
        #[arg(long)]
        replacements: Option<String>,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        root: RootArg,

        #[arg(long)]
        json: bool,
    },

    /// Add or remove frontmatter tags and migrate leading hashtags
    Update {
        /// Files to update, relative to --root
        #[arg(long, value_delimiter = ',', required = true)]
        files: Vec<PathBuf>,

        #[arg(long, value_delimiter = ',')]
        add: Vec<String>,

        #[arg(long, value_delimiter = ',')]
        remove: Vec<String>,

        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        root: RootArg,

        #[arg(long)]
        json: bool,
    },

    /// List files without any tags
    Untagged {
        #[command(flatten)]
        root: RootArg,

        #[arg(long)]
        json: bool,
    },

    /// Check tags against the extraction rules
    Validate {
        #[arg(long, value_delimiter = ',', required = true)]
        tags: Vec<String>,

        #[arg(long)]
        json: bool,
    },

    /// Show the tags found in specific files
    FileTags {
        #[arg(long, value_delimiter = ',', required = true)]
        files: Vec<PathBuf>,

        #[arg(long)]
        json: bool,
    },
}
