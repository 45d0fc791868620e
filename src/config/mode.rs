//! Build mode

use std::fmt;
use std::str::FromStr;

/// Whether drafts belong in the output.
///
/// The collection builder takes this as an explicit argument; nothing in the
/// content pipeline reads the environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Production,
    Development,
}

impl Mode {
    /// Draft posts are only listed in development
    pub fn includes_drafts(self) -> bool {
        self == Mode::Development
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Mode::Production),
            "development" | "dev" => Ok(Mode::Development),
            other => Err(format!(
                "unknown mode `{}` (expected production or development)",
                other
            )),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Production => f.write_str("production"),
            Mode::Development => f.write_str("development"),
        }
    }
}
