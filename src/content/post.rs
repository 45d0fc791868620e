//! Post records and field derivation

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::str::FromStr;
use tokio::sync::OnceCell;

use super::{FrontMatter, MarkdownRenderer, PostDate};
use crate::error::{PostError, Result};

lazy_static! {
    /// `YYYY-MM-DD.<name>`
    static ref DATE_PREFIX: Regex = Regex::new(r"^(\d{4}-\d{2}-\d{2})\.(.+)$").unwrap();
}

/// A blog post
#[derive(Debug, Clone)]
pub struct PostRecord {
    /// Route identifier, always starting with `/`
    pub slug: String,

    pub title: String,

    /// Publication date
    pub date: PostDate,

    pub draft: bool,

    /// Raw markdown body
    pub content: String,

    pub image: Option<String>,

    pub image_stretch: Option<bool>,

    /// Identifying name of the source document
    pub source: String,

    rendered: OnceCell<String>,
}

impl PostRecord {
    /// Rendered HTML of `content`, produced on first call
    pub async fn rendered_content(&self, renderer: &MarkdownRenderer) -> &str {
        self.rendered
            .get_or_init(|| async {
                tracing::debug!("Rendering {}", self.slug);
                renderer.render(&self.content).await
            })
            .await
    }

    /// Whether the body has been rendered yet
    pub fn is_rendered(&self) -> bool {
        self.rendered.initialized()
    }

    /// Project the requested fields
    pub fn project(&self, fields: &[Field]) -> PostFields {
        let mut out = PostFields::default();
        for field in fields {
            match field {
                Field::Slug => out.slug = Some(self.slug.clone()),
                Field::Title => out.title = Some(self.title.clone()),
                Field::Date => out.date = Some(self.date),
                Field::Draft => out.draft = Some(self.draft),
                Field::Content => out.content = Some(self.content.clone()),
                Field::Image => out.image = self.image.clone(),
                Field::ImageStretch => out.image_stretch = self.image_stretch,
            }
        }
        out
    }
}

/// Field names a presentation layer may ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Slug,
    Title,
    Date,
    Draft,
    Content,
    Image,
    ImageStretch,
}

/// A post restricted to a set of fields. Absent fields are not serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<PostDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_stretch: Option<bool>,
}

/// Where a post's date came from, before validation
#[derive(Debug, Clone, PartialEq)]
pub enum DateField {
    Resolved(PostDate),
    Missing,
    Invalid(String),
}

/// A post whose fields have been derived but whose date is not yet checked
#[derive(Debug, Clone)]
pub struct DerivedPost {
    pub source: String,
    pub slug: String,
    pub title: String,
    pub date: DateField,
    pub draft: bool,
    pub content: String,
    pub image: Option<String>,
    pub image_stretch: Option<bool>,
}

impl DerivedPost {
    /// Require a usable date
    pub fn into_record(self) -> Result<PostRecord> {
        let date = match self.date {
            DateField::Resolved(date) => date,
            DateField::Missing => {
                return Err(PostError::validation(&self.source, "no date"));
            }
            DateField::Invalid(raw) => {
                return Err(PostError::validation(
                    &self.source,
                    format!("unparseable date `{}`", raw),
                ));
            }
        };

        Ok(PostRecord {
            slug: self.slug,
            title: self.title,
            date,
            draft: self.draft,
            content: self.content,
            image: self.image,
            image_stretch: self.image_stretch,
            source: self.source,
            rendered: OnceCell::new(),
        })
    }
}

/// Derive slug, title, date and draft state for one document.
///
/// A `YYYY-MM-DD.` prefix on the identifying name is authoritative for the
/// date and is stripped before the slug and title are derived.
pub fn derive(name: &str, fm: FrontMatter, body: &str) -> DerivedPost {
    let (prefix_date, stem) = match DATE_PREFIX.captures(name) {
        Some(caps) => {
            let date = caps.get(1).map(|m| m.as_str());
            let rest = caps.get(2).map_or(name, |m| m.as_str());
            (date, rest)
        }
        None => (None, name),
    };

    let date = match prefix_date.or(fm.date.as_deref()) {
        Some(raw) => match PostDate::parse(raw) {
            Some(date) => DateField::Resolved(date),
            None => DateField::Invalid(raw.to_string()),
        },
        None => DateField::Missing,
    };

    let slug = match fm.slug.as_deref().map(str::trim) {
        Some(slug) if !slug.is_empty() => normalize_slug(slug),
        _ => normalize_slug(stem),
    };

    let title = match fm.title {
        Some(title) if !title.trim().is_empty() => title,
        _ => title_from_name(stem),
    };

    DerivedPost {
        source: name.to_string(),
        slug,
        title,
        date,
        draft: fm.draft.unwrap_or(false),
        content: body.to_string(),
        image: fm.image,
        image_stretch: fm.image_stretch,
    }
}

/// Ensure a single leading `/`
pub fn normalize_slug(slug: &str) -> String {
    format!("/{}", slug.trim_start_matches('/'))
}

/// `my-first-post` -> `My First Post`
pub fn title_from_name(name: &str) -> String {
    let last = name.rsplit('.').next().unwrap_or(name);
    last.split('-')
        .filter(|token| !token.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fm_with(f: impl FnOnce(&mut FrontMatter)) -> FrontMatter {
        let mut fm = FrontMatter::default();
        f(&mut fm);
        fm
    }

    #[test]
    fn test_title_from_name() {
        assert_eq!(title_from_name("my-first-post"), "My First Post");
        assert_eq!(title_from_name("testing"), "Testing");
        assert_eq!(title_from_name("double--dash"), "Double Dash");
        assert_eq!(title_from_name("über-cool"), "Über Cool");
    }

    #[test]
    fn test_date_prefix_is_authoritative() {
        let fm = fm_with(|fm| fm.date = Some("1999-01-01".to_string()));
        let post = derive("2021-05-18.testing", fm, "Body").into_record().unwrap();
        assert_eq!(post.slug, "/testing");
        assert_eq!(post.title, "Testing");
        assert_eq!(post.date.to_iso_string(), "2021-05-18T00:00:00.000Z");
        assert_eq!(post.content, "Body");
        assert_eq!(post.source, "2021-05-18.testing");
    }

    #[test]
    fn test_metadata_overrides() {
        let fm = fm_with(|fm| {
            fm.title = Some("Custom Title".to_string());
            fm.slug = Some("custom".to_string());
            fm.date = Some("2021-06-01".to_string());
            fm.draft = Some(true);
            fm.image = Some("/cover.jpg".to_string());
        });
        let post = derive("my-first-post", fm, "").into_record().unwrap();
        assert_eq!(post.slug, "/custom");
        assert_eq!(post.title, "Custom Title");
        assert!(post.draft);
        assert_eq!(post.image.as_deref(), Some("/cover.jpg"));
        assert_eq!(post.image_stretch, None);
    }

    #[test]
    fn test_defaults_from_name() {
        let fm = fm_with(|fm| fm.date = Some("2021-01-01".to_string()));
        let post = derive("my-first-post", fm, "").into_record().unwrap();
        assert_eq!(post.slug, "/my-first-post");
        assert_eq!(post.title, "My First Post");
        assert!(!post.draft);
    }

    #[test]
    fn test_missing_date_fails_validation() {
        let derived = derive("undated", FrontMatter::default(), "");
        assert_eq!(derived.date, DateField::Missing);
        assert!(matches!(
            derived.into_record(),
            Err(PostError::Validation { document, .. }) if document == "undated"
        ));
    }

    #[test]
    fn test_invalid_date_fails_validation() {
        let fm = fm_with(|fm| fm.date = Some("next tuesday".to_string()));
        let derived = derive("vague", fm, "");
        assert_eq!(derived.date, DateField::Invalid("next tuesday".to_string()));
        assert!(derived.into_record().is_err());

        // An impossible prefix date does not fall back to metadata
        let fm = fm_with(|fm| fm.date = Some("2021-01-01".to_string()));
        assert!(derive("2021-13-45.bad", fm, "").into_record().is_err());
    }

    #[test]
    fn test_project_fields() {
        let fm = fm_with(|fm| fm.date = Some("2021-05-18".to_string()));
        let post = derive("hello-world", fm, "Body").into_record().unwrap();
        let projected = post.project(&[Field::Title, Field::Slug]);
        assert_eq!(projected.title.as_deref(), Some("Hello World"));
        assert_eq!(projected.slug.as_deref(), Some("/hello-world"));
        assert_eq!(projected.content, None);
        assert_eq!(projected.date, None);

        let json = serde_json::to_string(&post.project(&[Field::Date, Field::ImageStretch]))
            .unwrap();
        assert_eq!(json, r#"{"date":"2021-05-18T00:00:00.000Z"}"#);
    }

    #[test]
    fn test_parse_field_names() {
        assert_eq!("imageStretch".parse::<Field>(), Ok(Field::ImageStretch));
        assert_eq!("title".parse::<Field>(), Ok(Field::Title));
        assert!("tags".parse::<Field>().is_err());
    }

    #[tokio::test]
    async fn test_rendered_content_is_lazy() {
        let fm = fm_with(|fm| fm.date = Some("2021-05-18".to_string()));
        let post = derive("lazy", fm, "# Hi").into_record().unwrap();
        assert!(!post.is_rendered());

        let renderer = MarkdownRenderer::new();
        let html = post.rendered_content(&renderer).await.to_string();
        assert!(html.contains("<h1>Hi</h1>"));
        assert!(post.is_rendered());
        assert_eq!(post.content, "# Hi");
        assert_eq!(post.rendered_content(&renderer).await, html);
    }
}
