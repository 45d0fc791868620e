//! Emoji shortcode substitution

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::borrow::Cow;

lazy_static! {
    static ref SHORTCODE: Regex = Regex::new(r":([a-z0-9_+\-]+):").unwrap();
}

/// Replace `:shortcode:` tokens with their glyphs. Unknown codes stay as written.
pub fn replace_shortcodes(text: &str) -> Cow<'_, str> {
    if !text.contains(':') {
        return Cow::Borrowed(text);
    }

    SHORTCODE.replace_all(text, |caps: &Captures| match emojis::get_by_shortcode(&caps[1]) {
        Some(emoji) => emoji.as_str().to_string(),
        None => caps[0].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_shortcodes() {
        assert_eq!(replace_shortcodes("Ship it :tada:"), "Ship it 🎉");
        assert_eq!(replace_shortcodes(":smile::rocket:"), "😄🚀");
    }

    #[test]
    fn test_unknown_shortcode_left_alone() {
        assert_eq!(replace_shortcodes("a :not_an_emoji_code: b"), "a :not_an_emoji_code: b");
        assert_eq!(replace_shortcodes("12:30:45"), "12:30:45");
    }

    #[test]
    fn test_no_colon_borrows() {
        assert!(matches!(replace_shortcodes("plain"), Cow::Borrowed("plain")));
    }
}
