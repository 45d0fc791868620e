//! Print every route to pre-generate

use anyhow::Result;

use crate::config::Mode;
use crate::content;
use crate::Site;

/// One slug per line
pub async fn run(site: &Site, mode: Mode) -> Result<()> {
    let collection = site.collection(mode).await?;
    for slug in content::paths(&collection) {
        println!("{}", slug);
    }
    Ok(())
}
