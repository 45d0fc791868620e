//! Post collection - the ordered set of posts a site is built from

use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

use super::loader::{self, Document};
use super::post::{self, Field, PostFields, PostRecord};
use super::{FrontMatter, MarkdownRenderer, PostDate};
use crate::config::Mode;
use crate::error::{PostError, Result};

/// All posts of a site, newest first
#[derive(Debug, Clone)]
pub struct PostCollection {
    posts: Vec<PostRecord>,
    mode: Mode,
}

/// One line of the "Recent Posts" listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingEntry {
    pub title: String,
    pub slug: String,
    pub date: PostDate,
}

/// Everything the single-post view needs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub slug: String,
    pub title: String,
    pub date: PostDate,
    pub image: Option<String>,
    pub image_stretch: Option<bool>,
    /// Rendered HTML body
    pub content: String,
}

impl PostCollection {
    /// Build the collection from raw documents.
    ///
    /// Any malformed header or undated post aborts the build. Drafts are
    /// dropped in production before dates are checked. Posts are ordered by
    /// date descending; posts sharing a date keep their document order.
    pub fn build(documents: &[Document], mode: Mode) -> Result<Self> {
        let mut posts = Vec::with_capacity(documents.len());

        for doc in documents {
            let (fm, body) = FrontMatter::parse(&doc.name, &doc.raw)?;
            let derived = post::derive(&doc.name, fm, body);

            if derived.draft && !mode.includes_drafts() {
                tracing::debug!("Skipping draft {}", doc.name);
                continue;
            }

            posts.push(derived.into_record()?);
        }

        posts.sort_by(|a, b| b.date.cmp(&a.date));

        let mut seen = HashSet::new();
        for post in &posts {
            if !seen.insert(post.slug.as_str()) {
                tracing::warn!(
                    "Duplicate slug {} in {}; lookups resolve to the first post",
                    post.slug,
                    post.source
                );
            }
        }

        tracing::info!("Built {} posts ({} mode)", posts.len(), mode);
        Ok(Self { posts, mode })
    }

    /// Read the posts directory and build the collection
    pub async fn load(dir: &Path, mode: Mode) -> Result<Self> {
        let documents = loader::load_documents(dir).await?;
        Self::build(&documents, mode)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PostRecord> {
        self.posts.iter()
    }

    /// Every post, restricted to the requested fields
    pub fn all(&self, fields: &[Field]) -> Vec<PostFields> {
        self.posts.iter().map(|post| post.project(fields)).collect()
    }

    /// Look up a post by slug; the leading `/` is optional
    pub fn by_slug(&self, slug: &str) -> Result<&PostRecord> {
        let slug = post::normalize_slug(slug);
        self.posts
            .iter()
            .find(|post| post.slug == slug)
            .ok_or(PostError::NotFound(slug))
    }

    /// The `n` most recent posts for the listing view
    pub fn recent(&self, n: usize) -> Vec<ListingEntry> {
        self.posts
            .iter()
            .take(n)
            .map(|post| ListingEntry {
                title: post.title.clone(),
                slug: post.slug.clone(),
                date: post.date,
            })
            .collect()
    }

    /// Render one post for display. Only this post's body is rendered.
    pub async fn post_page(&self, slug: &str, renderer: &MarkdownRenderer) -> Result<PostPage> {
        let post = self.by_slug(slug)?;
        let content = post.rendered_content(renderer).await.to_string();

        Ok(PostPage {
            slug: post.slug.clone(),
            title: post.title.clone(),
            date: post.date,
            image: post.image.clone(),
            image_stretch: post.image_stretch,
            content,
        })
    }
}

/// Slugs of every non-draft post, one per route to pre-generate
pub fn paths(collection: &PostCollection) -> Vec<String> {
    collection
        .iter()
        .filter(|post| !post.draft)
        .map(|post| post.slug.clone())
        .collect()
}
