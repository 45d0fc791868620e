//! Front-matter parsing

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{PostError, Result};

/// Accepts a string or a bare scalar (`date: 2021` or an unquoted timestamp)
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct ScalarString;

    impl<'de> Visitor<'de> for ScalarString {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a number")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(ScalarString)
}

/// Coerces booleans, yes/no style strings and integers to a bool
fn flexible_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct FlexibleBool;

    impl<'de> Visitor<'de> for FlexibleBool {
        type Value = Option<bool>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a boolean, a yes/no string or an integer")
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            match value.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(Some(true)),
                "false" | "no" | "off" | "0" | "" => Ok(Some(false)),
                other => Err(E::custom(format!("`{}` is not a boolean", other))),
            }
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value != 0))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value != 0))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(FlexibleBool)
}

/// Front-matter data of a post.
///
/// Only the keys below are recognized. Anything else in the header is
/// ignored (and logged at debug level), never carried along.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    #[serde(deserialize_with = "scalar_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "flexible_bool")]
    pub draft: Option<bool>,
    pub slug: Option<String>,
    pub image: Option<String>,
    #[serde(rename = "imageStretch", deserialize_with = "flexible_bool")]
    pub image_stretch: Option<bool>,
}

impl FrontMatter {
    /// Split a raw document into front-matter and body.
    ///
    /// `document` names the source in errors. A document without a header
    /// yields the default front-matter and the whole input as body.
    pub fn parse<'a>(document: &str, content: &'a str) -> Result<(Self, &'a str)> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        if let Some(rest) = content.strip_prefix(";;;") {
            return Self::parse_json_block(document, rest);
        }

        let (first_line, rest) = split_line(content);
        let first_line = first_line.trim_end();

        // `----` is a thematic break, not a header
        let Some(lang) = first_line.strip_prefix("---") else {
            return Ok((FrontMatter::default(), content));
        };
        if lang.starts_with('-') {
            return Ok((FrontMatter::default(), content));
        }

        let (block, body) = find_closing(rest, "---")
            .ok_or_else(|| PostError::parse(document, "missing closing `---`"))?;

        let fm = match lang.trim() {
            "" | "yaml" | "yml" => Self::from_yaml(document, block)?,
            "json" => Self::from_json(document, block)?,
            other => {
                return Err(PostError::parse(
                    document,
                    format!("unsupported front-matter language `{}`", other),
                ))
            }
        };

        Ok((fm, body))
    }

    fn parse_json_block<'a>(document: &str, rest: &'a str) -> Result<(Self, &'a str)> {
        let end_pos = rest
            .find(";;;")
            .ok_or_else(|| PostError::parse(document, "missing closing `;;;`"))?;

        let json_content = &rest[..end_pos];
        let remaining = &rest[end_pos + 3..];
        let remaining = remaining
            .strip_prefix("\r\n")
            .or_else(|| remaining.strip_prefix('\n'))
            .unwrap_or(remaining);

        let fm = Self::from_json(document, &format!("{{{}}}", json_content.trim()))?;
        Ok((fm, remaining))
    }

    fn from_yaml(document: &str, block: &str) -> Result<Self> {
        let has_content = block.lines().any(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        });
        if !has_content {
            return Ok(FrontMatter::default());
        }

        let deserializer = serde_yaml::Deserializer::from_str(block);
        serde_ignored::deserialize(deserializer, |path| log_ignored(document, &path))
            .map_err(|e| PostError::parse(document, e.to_string()))
    }

    fn from_json(document: &str, block: &str) -> Result<Self> {
        if block.trim().is_empty() {
            return Ok(FrontMatter::default());
        }

        let mut deserializer = serde_json::Deserializer::from_str(block);
        let fm = serde_ignored::deserialize(&mut deserializer, |path| {
            log_ignored(document, &path)
        })
        .map_err(|e| PostError::parse(document, e.to_string()))?;
        deserializer
            .end()
            .map_err(|e| PostError::parse(document, e.to_string()))?;
        Ok(fm)
    }
}

fn log_ignored(document: &str, path: &serde_ignored::Path) {
    tracing::debug!("Ignoring unknown front-matter key `{}` in {}", path, document);
}

/// Split off the first line (without its terminator)
fn split_line(content: &str) -> (&str, &str) {
    match content.find('\n') {
        Some(pos) => (&content[..pos], &content[pos + 1..]),
        None => (content, ""),
    }
}

/// Find the line that is exactly `delimiter`; returns (block, text after that line)
fn find_closing<'a>(content: &'a str, delimiter: &str) -> Option<(&'a str, &'a str)> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if line.trim_end() == delimiter {
            return Some((&content[..offset], &content[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2021-05-18
draft: true
image: /img/cover.png
imageStretch: true
---

This is the content.
"#;

        let (fm, body) = FrontMatter::parse("hello", content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello World"));
        assert_eq!(fm.date.as_deref(), Some("2021-05-18"));
        assert_eq!(fm.draft, Some(true));
        assert_eq!(fm.image.as_deref(), Some("/img/cover.png"));
        assert_eq!(fm.image_stretch, Some(true));
        assert_eq!(body, "\nThis is the content.\n");
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just markdown\n\nNo header here.";
        let (fm, body) = FrontMatter::parse("plain", content).unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_thematic_break_is_not_a_header() {
        let content = "----\nSome text\n---\n";
        let (fm, body) = FrontMatter::parse("hr", content).unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_unterminated_block_is_error() {
        let content = "---\ntitle: Oops\n\nBody without a closing delimiter\n";
        let err = FrontMatter::parse("broken-post", content).unwrap_err();
        match err {
            PostError::Parse { document, .. } => assert_eq!(document, "broken-post"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let content = "---\ntitle: [unclosed\n---\nbody";
        assert!(matches!(
            FrontMatter::parse("bad-yaml", content),
            Err(PostError::Parse { .. })
        ));
    }

    #[test]
    fn test_empty_block() {
        let (fm, body) = FrontMatter::parse("empty", "---\n---\nBody").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let content = "---\ntitle: Tagged\ntags:\n  - rust\nlayout: post\n---\nBody";
        let (fm, body) = FrontMatter::parse("tagged", content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Tagged"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_draft_coercion() {
        let (fm, _) = FrontMatter::parse("a", "---\ndraft: \"yes\"\n---\n").unwrap();
        assert_eq!(fm.draft, Some(true));

        let (fm, _) = FrontMatter::parse("b", "---\ndraft: 0\n---\n").unwrap();
        assert_eq!(fm.draft, Some(false));

        let (fm, _) = FrontMatter::parse("c", "---\ndraft:\n---\n").unwrap();
        assert_eq!(fm.draft, None);

        assert!(FrontMatter::parse("d", "---\ndraft: maybe\n---\n").is_err());
    }

    #[test]
    fn test_numeric_date_kept_as_written() {
        let (fm, _) = FrontMatter::parse("year", "---\ndate: 2021\n---\n").unwrap();
        assert_eq!(fm.date.as_deref(), Some("2021"));
    }

    #[test]
    fn test_json_language_tag() {
        let content = "---json\n{\"title\": \"From JSON\", \"draft\": false}\n---\nBody";
        let (fm, body) = FrontMatter::parse("json", content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("From JSON"));
        assert_eq!(fm.draft, Some(false));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_unknown_language_tag_is_error() {
        assert!(FrontMatter::parse("toml", "---toml\ntitle = \"x\"\n---\n").is_err());
    }

    #[test]
    fn test_json_semicolon_block() {
        let content = ";;;\n\"title\": \"Semicolons\", \"slug\": \"semi\"\n;;;\nBody";
        let (fm, body) = FrontMatter::parse("semi", content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Semicolons"));
        assert_eq!(fm.slug.as_deref(), Some("semi"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "---\r\ntitle: Windows\r\n---\r\nBody\r\n";
        let (fm, body) = FrontMatter::parse("crlf", content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Windows"));
        assert_eq!(body, "Body\r\n");
    }
}
