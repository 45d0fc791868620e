//! postline: the content pipeline behind a markdown blog
//!
//! Reads a directory of markdown posts with front-matter, derives each
//! post's slug, title and date, and builds a date-ordered collection for
//! listing pages, single-post pages and static route generation. Post
//! bodies are rendered to HTML on demand, with code highlighting and emoji
//! shortcodes.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;

use anyhow::Result;
use std::path::Path;

pub use config::{Mode, SiteConfig};
pub use content::{MarkdownRenderer, PostCollection};
pub use error::PostError;

/// A blog site on disk
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Directory holding the post documents
    pub posts_dir: std::path::PathBuf,
}

impl Site {
    /// Open a site directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            tracing::debug!("Loading config from {:?}", config_path);
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let posts_dir = base_dir.join(&config.posts_dir);

        Ok(Self {
            config,
            base_dir,
            posts_dir,
        })
    }

    /// Build the post collection for `mode`
    pub async fn collection(&self, mode: Mode) -> Result<PostCollection> {
        Ok(PostCollection::load(&self.posts_dir, mode).await?)
    }

    /// Renderer configured from the site's settings
    pub fn renderer(&self) -> MarkdownRenderer {
        MarkdownRenderer::from_config(&self.config)
    }
}
