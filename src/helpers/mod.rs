//! Presentation helpers for command output

mod date;
mod html;

pub use date::*;
pub use html::*;
