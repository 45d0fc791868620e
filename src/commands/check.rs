//! Validate the posts directory

use anyhow::Result;

use crate::config::Mode;
use crate::Site;

/// Build the collection and report what it holds
pub async fn run(site: &Site, mode: Mode) -> Result<()> {
    let start = std::time::Instant::now();
    let collection = site.collection(mode).await?;

    let drafts = collection.iter().filter(|post| post.draft).count();
    println!(
        "{} posts OK ({} drafts, {} mode) in {:.2}s",
        collection.len(),
        drafts,
        mode,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
