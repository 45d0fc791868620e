//! Render a single post

use anyhow::{bail, Result};

use crate::config::{Mode, SiteConfig};
use crate::content::PostPage;
use crate::helpers::{full_date, html_escape};
use crate::Site;

/// Print the rendered post for `slug`
pub async fn run(site: &Site, mode: Mode, slug: &str, json: bool) -> Result<()> {
    let collection = site.collection(mode).await?;
    let renderer = site.renderer();

    let page = match collection.post_page(slug, &renderer).await {
        Ok(page) => page,
        Err(e) if e.is_not_found() => bail!("404: {}", e),
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print!("{}", format_page(&site.config, &page));
    }

    Ok(())
}

/// Plain HTML fragment for a post: header, optional cover image, body.
///
/// Metadata is escaped; `content` is already rendered HTML and goes in as is.
pub fn format_page(config: &SiteConfig, page: &PostPage) -> String {
    let mut out = format!(
        "<h1 class=\"title\">{}</h1>\n<small>{}</small>\n<hr />\n",
        html_escape(&page.title),
        full_date(&page.date)
    );

    if let Some(image) = &page.image {
        let image = html_escape(image);
        if page.image_stretch.unwrap_or(false) {
            out.push_str(&format!("<img src=\"{}\" width=\"100%\" />\n", image));
        } else {
            out.push_str(&format!(
                "<div class=\"cover\"><img src=\"{}\" alt=\"{}\" /></div>\n",
                image,
                html_escape(&config.title)
            ));
        }
    }

    out.push_str(&page.content);
    out
}
