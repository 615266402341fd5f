//! Tag rewriting in markdown text.
//!
//! Hashtags are rewritten outside fenced code blocks and inline code spans.
//! Frontmatter arrays (`tags: [..]`) and lists (`tags:` + `- item`) are rewritten
//! item by item, keeping each item's quoting.

use super::extractor::{is_bounded, unquote};
use super::heuristics::eq_fold;
use pulldown_cmark::{Event, Parser as MdParser, Tag, TagEnd};
use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::OnceLock;

fn inline_array_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?m)^(?P<head>[ \t]*tags:[ \t]*\[)(?P<items>[^\]]*)(?P<tail>\])").unwrap()
    })
}

fn list_block_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?m)^(?P<head>[ \t]*tags:[ \t]*\r?\n)(?P<items>(?:[ \t]*-[ \t]+[^\n]*(?:\n|$))+)")
            .unwrap()
    })
}

/// Result of a rewrite operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    pub content: String,
    pub replacements: usize,
}

impl RewriteResult {
    fn unchanged(content: &str) -> Self {
        RewriteResult {
            content: content.to_string(),
            replacements: 0,
        }
    }
}

/// Rename `old_tag` to `new_tag` in every notation: hashtags, inline arrays and lists.
/// Matching is case-insensitive.
pub fn rename_tag(markdown: &str, old_tag: &str, new_tag: &str) -> RewriteResult {
    if markdown.is_empty() || old_tag.is_empty() || old_tag == new_tag {
        return RewriteResult::unchanged(markdown);
    }

    let hashtags = rewrite_hashtags(markdown, old_tag, &format!("#{}", new_tag));
    let arrays = rename_in_inline_arrays(&hashtags.content, old_tag, new_tag);
    let lists = rename_in_lists(&arrays.content, old_tag, new_tag);

    RewriteResult {
        content: lists.content,
        replacements: hashtags.replacements + arrays.replacements + lists.replacements,
    }
}

/// Delete `#tag` tokens outside code. Only the token goes; surrounding text stays.
pub fn remove_hashtag(markdown: &str, tag: &str) -> RewriteResult {
    if markdown.is_empty() || tag.is_empty() {
        return RewriteResult::unchanged(markdown);
    }
    rewrite_hashtags(markdown, tag, "")
}

fn rewrite_hashtags(markdown: &str, tag: &str, replacement: &str) -> RewriteResult {
    let excluded = excluded_ranges(markdown);
    let mut replacements = 0usize;
    let mut rewritten = String::with_capacity(markdown.len());
    let mut cursor = 0usize;

    for range in excluded {
        if range.start > cursor {
            let chunk = &markdown[cursor..range.start];
            rewritten.push_str(&rewrite_chunk(chunk, tag, replacement, &mut replacements));
        }

        rewritten.push_str(&markdown[range.start..range.end]);
        cursor = range.end;
    }

    if cursor < markdown.len() {
        let chunk = &markdown[cursor..];
        rewritten.push_str(&rewrite_chunk(chunk, tag, replacement, &mut replacements));
    }

    RewriteResult {
        content: rewritten,
        replacements,
    }
}

fn rewrite_chunk(chunk: &str, tag: &str, replacement: &str, replacements: &mut usize) -> String {
    let bytes = chunk.as_bytes();
    let tag_chars = tag.chars().count();
    let mut rewritten = String::with_capacity(chunk.len());
    let mut cursor = 0usize;

    for (index, _) in chunk.match_indices('#') {
        if index < cursor {
            continue;
        }
        let rest = &chunk[index + 1..];
        let len = rest
            .char_indices()
            .nth(tag_chars)
            .map_or(rest.len(), |(offset, _)| offset);
        let end = index + 1 + len;
        if !eq_fold(&rest[..len], tag) || !is_bounded(bytes, index, end) {
            continue;
        }

        rewritten.push_str(&chunk[cursor..index]);
        rewritten.push_str(replacement);
        cursor = end;
        *replacements += 1;
    }

    rewritten.push_str(&chunk[cursor..]);
    rewritten
}

fn rename_in_inline_arrays(markdown: &str, old_tag: &str, new_tag: &str) -> RewriteResult {
    let mut replacements = 0usize;
    let content = inline_array_regex()
        .replace_all(markdown, |captures: &Captures<'_>| {
            let items: Vec<String> = captures["items"]
                .split(',')
                .map(|item| match rename_item(item, old_tag, new_tag) {
                    Some(renamed) => {
                        replacements += 1;
                        renamed
                    }
                    None => item.to_string(),
                })
                .collect();
            format!("{}{}{}", &captures["head"], items.join(","), &captures["tail"])
        })
        .to_string();

    RewriteResult {
        content,
        replacements,
    }
}

fn rename_in_lists(markdown: &str, old_tag: &str, new_tag: &str) -> RewriteResult {
    let mut replacements = 0usize;
    let content = list_block_regex()
        .replace_all(markdown, |captures: &Captures<'_>| {
            let mut block = captures["head"].to_string();
            for line in captures["items"].split_inclusive('\n') {
                let renamed = line.find('-').and_then(|dash| {
                    rename_item(&line[dash + 1..], old_tag, new_tag)
                        .map(|rest| format!("{}{}", &line[..=dash], rest))
                });
                match renamed {
                    Some(renamed) => {
                        replacements += 1;
                        block.push_str(&renamed);
                    }
                    None => block.push_str(line),
                }
            }
            block
        })
        .to_string();

    RewriteResult {
        content,
        replacements,
    }
}

/// Swap the value inside one array or list item, keeping whitespace and quotes.
fn rename_item(item: &str, old_tag: &str, new_tag: &str) -> Option<String> {
    let value = unquote(item);
    let value = value.strip_prefix('#').unwrap_or(value);
    if value.is_empty() || !eq_fold(value, old_tag) {
        return None;
    }
    let start = item.find(value)?;
    Some(format!(
        "{}{}{}",
        &item[..start],
        new_tag,
        &item[start + value.len()..]
    ))
}

fn excluded_ranges(markdown: &str) -> Vec<Range<usize>> {
    let mut ranges: Vec<Range<usize>> = Vec::new();
    let mut code_block_start: Option<usize> = None;

    for (event, range) in MdParser::new(markdown).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(_)) => {
                code_block_start = Some(range.start);
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(start) = code_block_start.take() {
                    ranges.push(start..range.end);
                }
            }
            Event::Code(_) => {
                ranges.push(range.start..range.end);
            }
            _ => {}
        }
    }

    if let Some(start) = code_block_start.take() {
        ranges.push(start..markdown.len());
    }

    merge_ranges(ranges)
}

fn merge_ranges(mut ranges: Vec<Range<usize>>) -> Vec<Range<usize>> {
    if ranges.is_empty() {
        return ranges;
    }

    ranges.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => {
                last.end = last.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }

    merged
}
