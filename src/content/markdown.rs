//! Markdown rendering with syntax highlighting and emoji shortcodes
//!
//! Raw HTML in the source passes through untouched: post bodies are trusted,
//! authored content. Never feed untrusted input to this renderer.

use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd, TextMergeStream};
use std::borrow::Cow;
use std::sync::Arc;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use tokio::task::JoinError;

use super::emoji;
use crate::config::SiteConfig;
use crate::helpers::html_escape;

/// Markdown renderer with syntax highlighting.
///
/// Cloning is cheap; syntax and theme sets are shared.
#[derive(Clone)]
pub struct MarkdownRenderer {
    highlighter: Arc<Highlighter>,
    emoji: bool,
}

struct Highlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", false)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        Self {
            highlighter: Arc::new(Highlighter {
                syntax_set: SyntaxSet::load_defaults_newlines(),
                theme_set: ThemeSet::load_defaults(),
                theme_name: theme.to_string(),
                line_numbers,
            }),
            emoji: true,
        }
    }

    /// Create from the site's highlight and emoji settings
    pub fn from_config(config: &SiteConfig) -> Self {
        Self::with_options(&config.highlight.theme, config.highlight.line_number)
            .with_emoji(config.emoji)
    }

    /// Toggle `:shortcode:` substitution
    pub fn with_emoji(mut self, enabled: bool) -> Self {
        self.emoji = enabled;
        self
    }

    /// Render markdown to HTML on the blocking pool
    pub async fn render(&self, markdown: &str) -> String {
        let renderer = self.clone();
        let owned = markdown.to_string();
        let joined = tokio::task::spawn_blocking(move || renderer.render_sync(&owned)).await;
        match finished(joined) {
            Some(html) => html,
            // Cancelled with the runtime; render on this thread instead
            None => self.render_sync(markdown),
        }
    }

    /// Render markdown to HTML.
    ///
    /// Code blocks are highlighted before emoji substitution runs, so
    /// shortcodes inside code stay literal. Never fails: syntax the parser
    /// does not recognize comes out as text.
    pub fn render_sync(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES;
        let parser = Parser::new_ext(markdown, options);

        let events = self.highlight_code_blocks(parser);

        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        if self.emoji {
            let events = TextMergeStream::new(events.into_iter()).map(substitute_emoji);
            html::push_html(&mut html_output, events);
        } else {
            html::push_html(&mut html_output, events.into_iter());
        }

        html_output
    }

    /// Replace every code block with pre-rendered highlighted HTML
    fn highlight_code_blocks<'a>(&self, parser: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
        let mut events = Vec::new();
        let mut in_code_block = false;
        let mut code_block_lang: Option<String> = None;
        let mut code_block_content = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_block_lang = match kind {
                        CodeBlockKind::Fenced(info) => fence_language(&info),
                        CodeBlockKind::Indented => None,
                    };
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let highlighted = self
                        .highlighter
                        .highlight(&code_block_content, code_block_lang.as_deref());
                    events.push(Event::Html(highlighted.into()));
                    in_code_block = false;
                    code_block_lang = None;
                }
                Event::Text(text) if in_code_block => {
                    code_block_content.push_str(&text);
                }
                _ => events.push(event),
            }
        }

        events
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Highlight a code block
    fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        match self.highlight_lines(code, lang) {
            Some(lines) if self.line_numbers => add_line_numbers(&lines, lang),
            Some(lines) => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                html_escape(lang),
                lines.concat()
            ),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                html_escape(lang),
                html_escape(code)
            ),
        }
    }

    /// One HTML fragment per source line, each keeping its line ending
    fn highlight_lines(&self, code: &str, lang: &str) -> Option<Vec<String>> {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())?;

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut lines = Vec::new();
        for line in LinesWithEndings::from(code) {
            let regions = match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(regions) => regions,
                Err(e) => {
                    tracing::debug!("Highlighting `{}` failed: {}", lang, e);
                    return None;
                }
            };
            lines.push(styled_line_to_highlighted_html(&regions, IncludeBackground::No).ok()?);
        }
        Some(lines)
    }
}

/// Output of a blocking task. Panics are re-raised; cancellation gives `None`.
fn finished<T>(joined: Result<T, JoinError>) -> Option<T> {
    match joined {
        Ok(value) => Some(value),
        Err(e) => match e.try_into_panic() {
            Ok(panic) => std::panic::resume_unwind(panic),
            Err(e) => {
                tracing::debug!("Render task did not finish: {}", e);
                None
            }
        },
    }
}

/// Add a line-number gutter to highlighted lines
fn add_line_numbers(lines: &[String], lang: &str) -> String {
    // Highlighted lines keep their own line endings
    let gutter: Vec<String> = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect();

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
        html_escape(lang),
        gutter.join("\n"),
        lines.concat()
    )
}

/// First word of a fence info string: "rust,ignore" -> "rust"
fn fence_language(info: &str) -> Option<String> {
    info.split(|c: char| c.is_whitespace() || c == ',' || c == '{')
        .next()
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}

fn substitute_emoji(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Text(text) => {
            let replaced = match emoji::replace_shortcodes(&text) {
                Cow::Owned(s) => Some(s),
                Cow::Borrowed(_) => None,
            };
            match replaced {
                Some(s) => Event::Text(s.into()),
                None => Event::Text(text),
            }
        }
        other => other,
    }
}
