//! Configuration module

mod mode;
mod site;

pub use mode::Mode;
pub use site::HighlightConfig;
pub use site::SiteConfig;
