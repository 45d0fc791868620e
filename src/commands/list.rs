//! List the most recent posts

use anyhow::Result;

use crate::config::{Mode, SiteConfig};
use crate::content::ListingEntry;
use crate::helpers::format_date;
use crate::Site;

/// Print the "Recent Posts" listing
pub async fn run(site: &Site, mode: Mode, limit: Option<usize>, json: bool) -> Result<()> {
    let collection = site.collection(mode).await?;
    let entries = collection.recent(limit.unwrap_or(site.config.recent_posts));

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!("{}", format_listing(&site.config, &entries));
    }

    Ok(())
}

/// `date - title [slug]` lines under the site title
pub fn format_listing(config: &SiteConfig, entries: &[ListingEntry]) -> String {
    let mut out = format!("{}\n\nRecent Posts ({}):\n", config.title, entries.len());
    for entry in entries {
        out.push_str(&format!(
            "  {} - {} [{}]\n",
            format_date(&entry.date, &config.date_format),
            entry.title,
            entry.slug
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostDate;

    #[test]
    fn test_format_listing() {
        let config = SiteConfig::default();
        let entries = vec![ListingEntry {
            title: "Testing".to_string(),
            slug: "/testing".to_string(),
            date: PostDate::parse("2021-05-18").unwrap(),
        }];
        assert_eq!(
            format_listing(&config, &entries),
            "I'd Rather Be Running\n\nRecent Posts (1):\n  2021-05-18 - Testing [/testing]\n"
        );
    }
}
