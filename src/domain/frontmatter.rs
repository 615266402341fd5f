//! Frontmatter codec
//!
//! A document may open with a `---` line, a YAML block and a closing `---` line.
//! Only the `tags` field is interpreted; every other field is kept as an opaque
//! YAML value and written back unchanged in value (not in formatting).

use crate::error::{Result, TagError};
use serde_yaml::{Mapping, Value};

const DELIMITER: &str = "---";
const TAGS_KEY: &str = "tags";

/// How the `tags` field was authored
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagField {
    #[default]
    Absent,
    /// `tags: [a, b]`
    Inline(Vec<String>),
    /// `tags:` followed by `- a` lines
    List(Vec<String>),
}

impl TagField {
    pub fn tags(&self) -> &[String] {
        match self {
            TagField::Absent => &[],
            TagField::Inline(tags) | TagField::List(tags) => tags,
        }
    }
}

/// Parsed metadata block
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frontmatter {
    fields: Mapping,
    tags: TagField,
    tags_position: Option<usize>,
}

impl Frontmatter {
    pub fn tag_field(&self) -> &TagField {
        &self.tags
    }

    pub fn tags(&self) -> &[String] {
        self.tags.tags()
    }

    /// Replace the tag list. An empty list drops the field entirely.
    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.tags = if tags.is_empty() {
            TagField::Absent
        } else {
            TagField::List(tags)
        };
    }

    /// Non-tag fields, in their original order
    pub fn fields(&self) -> &Mapping {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.tags == TagField::Absent
    }

    /// Render the header, including both delimiters. Empty metadata renders as "".
    pub fn serialize(&self) -> Result<String> {
        if self.is_empty() {
            return Ok(String::new());
        }

        let mut mapping = Mapping::new();
        let tags_at = self.tags_position.unwrap_or(self.fields.len());
        for (index, (key, value)) in self.fields.iter().enumerate() {
            if index == tags_at {
                self.push_tags(&mut mapping);
            }
            mapping.insert(key.clone(), value.clone());
        }
        if tags_at >= self.fields.len() {
            self.push_tags(&mut mapping);
        }

        let yaml = serde_yaml::to_string(&mapping)?;
        Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n"))
    }

    fn push_tags(&self, mapping: &mut Mapping) {
        let tags = self.tags();
        if tags.is_empty() {
            return;
        }
        let sequence = tags.iter().cloned().map(Value::String).collect();
        mapping.insert(Value::String(TAGS_KEY.to_string()), Value::Sequence(sequence));
    }
}

/// A document split into metadata and body
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrontmatterDocument {
    pub frontmatter: Frontmatter,
    pub body: String,
}

impl FrontmatterDocument {
    /// Split `text` into metadata and body.
    ///
    /// Text without a complete delimited block is all body. A delimited block that is
    /// not a YAML mapping fails with [`TagError::MalformedFrontmatter`].
    pub fn parse(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text.split('\n').collect();
        let is_delimiter = |line: &str| line.trim_end_matches('\r') == DELIMITER;

        if lines.len() < 3 || !is_delimiter(lines[0]) {
            return Ok(Self::body_only(text));
        }

        let Some(end) = lines.iter().skip(1).position(|line| is_delimiter(line)) else {
            return Ok(Self::body_only(text));
        };
        let end = end + 1;

        let block = lines[1..end].join("\n");
        let frontmatter = parse_block(&block)?;

        Ok(FrontmatterDocument {
            frontmatter,
            body: lines[end + 1..].join("\n"),
        })
    }

    fn body_only(text: &str) -> Self {
        FrontmatterDocument {
            frontmatter: Frontmatter::default(),
            body: text.to_string(),
        }
    }

    /// Serialize header and body back into file content
    pub fn render(&self) -> Result<String> {
        Ok(format!("{}{}", self.frontmatter.serialize()?, self.body))
    }
}

fn parse_block(block: &str) -> Result<Frontmatter> {
    if block.trim().is_empty() {
        return Ok(Frontmatter::default());
    }

    let fields: Mapping = serde_yaml::from_str::<Option<Mapping>>(block)
        .map_err(TagError::MalformedFrontmatter)?
        .unwrap_or_default();

    let Some(position) = fields.iter().position(|(k, _)| k.as_str() == Some(TAGS_KEY)) else {
        return Ok(Frontmatter {
            fields,
            ..Frontmatter::default()
        });
    };

    let tags = match fields.get(TAGS_KEY).and_then(tag_values) {
        Some(tags) if authored_inline(block) => TagField::Inline(tags),
        Some(tags) => TagField::List(tags),
        // unrecognised shapes stay opaque
        None => {
            return Ok(Frontmatter {
                fields,
                ..Frontmatter::default()
            })
        }
    };
    let fields = fields
        .into_iter()
        .filter(|(k, _)| k.as_str() != Some(TAGS_KEY))
        .collect();

    Ok(Frontmatter {
        fields,
        tags,
        tags_position: Some(position),
    })
}

fn tag_values(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Sequence(items) => Some(items.iter().filter_map(scalar_text).collect()),
        Value::String(text) => Some(
            text.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        Value::Null => Some(Vec::new()),
        _ => None,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn authored_inline(block: &str) -> bool {
    block.lines().any(|line| {
        line.strip_prefix("tags:")
            .is_some_and(|rest| rest.trim_start().starts_with('['))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_frontmatter_is_all_body() {
        let doc = FrontmatterDocument::parse("# Title\nContent").unwrap();
        assert!(doc.frontmatter.is_empty());
        assert_eq!(doc.body, "# Title\nContent");
        assert_eq!(doc.render().unwrap(), "# Title\nContent");
    }

    #[test]
    fn test_unclosed_block_is_all_body() {
        let text = "---\ntitle: x\nno closing";
        let doc = FrontmatterDocument::parse(text).unwrap();
        assert!(doc.frontmatter.is_empty());
        assert_eq!(doc.body, text);
    }

    #[test]
    fn test_empty_block() {
        let doc = FrontmatterDocument::parse("---\n---\n# Test Document").unwrap();
        assert!(doc.frontmatter.is_empty());
        assert_eq!(doc.body, "# Test Document");
    }

    #[test]
    fn test_inline_tags_are_normalized() {
        let doc =
            FrontmatterDocument::parse("---\ntitle: \"Doc\"\ntags: [\" alpha \", beta]\n---\nBody")
                .unwrap();
        assert_eq!(
            doc.frontmatter.tag_field(),
            &TagField::Inline(vec!["alpha".to_string(), "beta".to_string()])
        );
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn test_list_tags() {
        let doc = FrontmatterDocument::parse("---\ntags:\n  - alpha\n  - beta\n---\nBody").unwrap();
        assert_eq!(
            doc.frontmatter.tag_field(),
            &TagField::List(vec!["alpha".to_string(), "beta".to_string()])
        );
    }

    #[test]
    fn test_malformed_yaml_fails() {
        let result = FrontmatterDocument::parse("---\ntags: [incomplete\n---\nBody");
        assert!(matches!(result, Err(TagError::MalformedFrontmatter(_))));

        let result = FrontmatterDocument::parse("---\n- just\n- a list\n---\nBody");
        assert!(matches!(result, Err(TagError::MalformedFrontmatter(_))));
    }

    #[test]
    fn test_serialize_writes_list_form_and_keeps_fields() {
        let text = "---\ntitle: \"Important Title\"\ntags: [\"existing\"]\nauthor: Test Author\n---\n# Body\n";
        let mut doc = FrontmatterDocument::parse(text).unwrap();
        doc.frontmatter
            .set_tags(vec!["existing".to_string(), "new-tag".to_string()]);

        let rendered = doc.render().unwrap();
        assert_eq!(
            rendered,
            "---\ntitle: Important Title\ntags:\n- existing\n- new-tag\nauthor: Test Author\n---\n# Body\n"
        );
    }

    #[test]
    fn test_clearing_tags_drops_field() {
        let mut doc = FrontmatterDocument::parse("---\ntags: [only]\n---\nBody").unwrap();
        doc.frontmatter.set_tags(Vec::new());
        assert!(doc.frontmatter.is_empty());
        assert_eq!(doc.render().unwrap(), "Body");
    }

    #[test]
    fn test_round_trip_preserves_tags_and_fields() {
        let text = "---\ntitle: Doc\ncount: 3\nnested:\n  key: value\ntags: [b, a]\n---\nBody";
        let first = FrontmatterDocument::parse(text).unwrap();
        let second = FrontmatterDocument::parse(&first.render().unwrap()).unwrap();

        let mut before = first.frontmatter.tags().to_vec();
        let mut after = second.frontmatter.tags().to_vec();
        before.sort();
        after.sort();
        assert_eq!(before, after);
        assert_eq!(first.frontmatter.fields(), second.frontmatter.fields());
        assert_eq!(second.body, "Body");
    }

    #[test]
    fn test_opaque_tags_value_is_preserved() {
        let text = "---\ntags:\n  nested: true\n---\nBody";
        let doc = FrontmatterDocument::parse(text).unwrap();
        assert!(doc.frontmatter.tags().is_empty());
        assert_eq!(doc.frontmatter.fields().len(), 1);
        assert!(doc.render().unwrap().contains("nested: true"));
    }
}
