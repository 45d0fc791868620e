//! Content module - front-matter, post derivation, collections and rendering

pub mod collection;
mod date;
mod emoji;
mod frontmatter;
pub mod loader;
mod markdown;
pub mod post;

pub use collection::{paths, ListingEntry, PostCollection, PostPage};
pub use date::PostDate;
pub use frontmatter::FrontMatter;
pub use loader::Document;
pub use markdown::MarkdownRenderer;
pub use post::{derive, DateField, DerivedPost, Field, PostFields, PostRecord};
