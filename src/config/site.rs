//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title, shown by the listing command
    pub title: String,

    /// Directory holding the post documents, relative to the base dir
    pub posts_dir: String,

    /// Number of entries in the "Recent Posts" listing
    pub recent_posts: usize,

    /// Moment.js-style format for listing dates
    pub date_format: String,

    #[serde(default)]
    pub highlight: HighlightConfig,

    /// Substitute `:shortcode:` emoji in rendered posts
    pub emoji: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "I'd Rather Be Running".to_string(),
            posts_dir: "posts".to_string(),
            recent_posts: 5,
            date_format: "YYYY-MM-DD".to_string(),
            highlight: HighlightConfig::default(),
            emoji: true,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// syntect theme name
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}
