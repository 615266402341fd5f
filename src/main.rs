use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::path::{self, PathBuf};
use std::time::Duration;
use tagmend::application::list_tags::filter_by_pattern;
use tagmend::application::replace_tags::parse_pairs;
use tagmend::application::{
    get_tags_for_files, replace_batch, update_tags, validate_tags, FindTagsService,
    ListTagsService, ReplaceOptions, UntaggedService, UpdateOptions,
};
use tagmend::cli::{output, Cli, Commands, RootArg};
use tagmend::domain::tags::TagValidator;
use tagmend::error::TagError;
use tagmend::infrastructure::{CancelToken, Config, NoteRepository, TagScanner, Vault};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            let (message, code) = describe_error(&err);
            eprintln!("Error: {}", message);
            std::process::exit(code);
        }
    }
}

/// Render an error for stderr and pick the exit code
fn describe_error(err: &anyhow::Error) -> (String, i32) {
    match err.downcast_ref::<TagError>() {
        // context was attached on top of the domain error
        Some(tag_err) if err.to_string() != tag_err.to_string() => (
            format!("{}: {}", err, tag_err.display_with_suggestions()),
            tag_err.exit_code(),
        ),
        Some(tag_err) => (tag_err.display_with_suggestions(), tag_err.exit_code()),
        None => (format!("{:#}", err), 1),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "tagmend=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Run one command and return the process exit code
fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = Config::resolve(cli.config.as_deref()).context("failed to load configuration")?;
    let cancel = match cli.timeout {
        Some(secs) => CancelToken::with_timeout(Duration::from_secs(secs)),
        None => CancelToken::new(),
    };

    match cli.command {
        Commands::Find {
            tags,
            max_results,
            root,
            json,
        } => {
            let vault = open_vault(&root)?;
            let root = vault_root(&vault);
            let service = FindTagsService::new(vault, TagScanner::new(&config)?);
            let mut found = service.find_by_tags(&tags, &cancel)?;
            if let Some(limit) = max_results {
                for files in found.values_mut() {
                    files.truncate(limit);
                }
            }
            emit(json, &found, || output::format_find_results(&found, &root))?;
        }
        Commands::Info { tags, root, json } => {
            let vault = open_vault(&root)?;
            let root = vault_root(&vault);
            let service = FindTagsService::new(vault, TagScanner::new(&config)?);
            let infos = service.tags_info(&tags, &cancel)?;
            emit(json, &infos, || output::format_tag_info(&infos, &root))?;
        }
        Commands::List {
            min_count,
            pattern,
            root,
            json,
        } => {
            let service = ListTagsService::new(open_vault(&root)?, TagScanner::new(&config)?);
            let mut infos = service.execute(min_count, &cancel)?;
            if let Some(pattern) = pattern.filter(|p| !p.is_empty()) {
                infos = filter_by_pattern(infos, &pattern);
            }
            emit(json, &infos, || output::format_tag_list(&infos))?;
        }
        Commands::Replace {
            old,
            new,
            replacements,
            dry_run,
            root,
            json,
        } => {
            let pairs = match (old, new, replacements) {
                (Some(old), Some(new), _) => vec![(old, new)],
                (_, _, Some(raw)) => parse_pairs(&raw)?,
                _ => {
                    return Err(TagError::InvalidArgument(
                        "pass --old and --new, or --replacements".to_string(),
                    )
                    .into())
                }
            };
            let vault = open_vault(&root)?;
            let scanner = TagScanner::new(&config)?;
            let outcome = replace_batch(&vault, &scanner, ReplaceOptions { pairs, dry_run }, &cancel)?;
            let root = vault_root(&vault);
            emit(json, &outcome, || output::format_replace_outcome(&outcome, &root))?;
            if !outcome.failed_files.is_empty() || outcome.cancelled {
                return Ok(1);
            }
        }
        Commands::Update {
            files,
            add,
            remove,
            dry_run,
            root,
            json,
        } => {
            let vault = open_vault(&root)?;
            let options = UpdateOptions {
                add,
                remove,
                files,
                dry_run,
            };
            let outcome = update_tags(&vault, options, &cancel)?;
            emit(json, &outcome, || output::format_update_outcome(&outcome))?;
            if outcome.has_errors() || outcome.cancelled {
                return Ok(1);
            }
        }
        Commands::Untagged { root, json } => {
            let vault = open_vault(&root)?;
            let root = vault_root(&vault);
            let service = UntaggedService::new(vault, TagScanner::new(&config)?);
            let paths = service.execute(&cancel)?;
            emit(json, &paths, || output::format_untagged(&paths, &root))?;
        }
        Commands::Validate { tags, json } => {
            let validator = TagValidator::new(&config);
            let reports = validate_tags(&validator, &tags);
            emit(json, &reports, || output::format_validation(&reports))?;
        }
        Commands::FileTags { files, json } => {
            let scanner = TagScanner::new(&config)?;
            let records = get_tags_for_files(&scanner, &files, &cancel)?;
            emit(json, &records, || output::format_file_tags(&records))?;
        }
    }

    Ok(0)
}

/// Open the vault named by `--root`, defaulting to the current directory
fn open_vault(root: &RootArg) -> Result<Vault, TagError> {
    let dir = match &root.root {
        Some(dir) => path::absolute(dir)?,
        None => std::env::current_dir()?,
    };
    Vault::open(dir)
}

fn vault_root(vault: &Vault) -> PathBuf {
    vault.root().to_path_buf()
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<(), TagError> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        let rendered = text();
        print!("{}", rendered);
        if !rendered.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sourced_error_printed_once() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = anyhow::Error::from(TagError::from(io));

        let (message, code) = describe_error(&err);
        assert_eq!(message.matches("gone").count(), 1);
        assert_eq!(code, 1);
    }

    #[test]
    fn test_context_is_prefixed() {
        let err = anyhow::Error::from(TagError::Config("bad value".to_string()))
            .context("failed to load configuration");

        let (message, code) = describe_error(&err);
        assert!(message.starts_with("failed to load configuration: "));
        assert!(message.contains("bad value"));
        assert_eq!(code, 2);
    }
}
