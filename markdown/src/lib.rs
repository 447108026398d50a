//! Renders post and project bodies from Markdown to HTML, highlighting fenced
//! code blocks and resolving image paths against the storage prefix.

use pulldown_cmark::html::push_html;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, TextMergeStream};
use std::sync::LazyLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use syntect::parsing::SyntaxSet;
use thiserror::Error;

const THEME: &str = "base16-eighties.dark";

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEMES: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

#[derive(Debug, Error)]
pub enum MarkdownError {
    #[error("highlighting failed: {0}")]
    Highlight(#[from] syntect::Error),
    #[error("missing highlight theme '{0}'")]
    MissingTheme(&'static str),
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn image_html(src: &str, alt: &str) -> String {
    let is_svg = src
        .rsplit('.')
        .next()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    let style = if is_svg {
        "filter: invert(100%); width: 100%;"
    } else {
        "width: 100%;"
    };
    format!(
        r#"<div style="display: flex; justify-content: center;"><img src="{}" alt="{}" loading="lazy" style="{style}"></div>"#,
        escape_attribute(src),
        escape_attribute(alt),
    )
}

fn highlight_code_block(content: &str, language: &str, theme: &Theme) -> Result<String, MarkdownError> {
    let syntaxes = &*SYNTAXES;
    let syntax = syntaxes
        .find_syntax_by_token(language)
        .unwrap_or_else(|| syntaxes.find_syntax_plain_text());
    let mut highlighter = HighlightLines::new(syntax, theme);

    let mut html = String::with_capacity(content.len() * 3);
    html.push_str(r#"<pre style="background-color: #2b303b; padding: 8px; border-radius: 8px"><code>"#);
    for line in content.lines() {
        let ranges = highlighter.highlight_line(line, syntaxes)?;
        html.push_str(&styled_line_to_highlighted_html(&ranges, IncludeBackground::No)?);
        html.push('\n');
    }
    html.push_str("</code></pre>");
    Ok(html)
}

/// Renders `markdown` to HTML.
///
/// `resolve_image` maps every image destination to the URL that ends up in
/// the `src` attribute; returning `None` drops the image.
pub fn render(
    markdown: &str,
    resolve_image: impl Fn(&str) -> Option<String>,
) -> Result<String, MarkdownError> {
    let theme = THEMES.themes.get(THEME).ok_or(MarkdownError::MissingTheme(THEME))?;

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut events = Vec::new();
    let mut code_language: Option<String> = None;
    let mut code = String::new();
    let mut in_code_block = false;
    // Destination and collected alt text of the image being read.
    let mut image: Option<(String, String)> = None;

    for event in TextMergeStream::new(Parser::new_ext(markdown, options)) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                in_code_block = true;
                code.clear();
                code_language = match kind {
                    CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_owned),
                    CodeBlockKind::Indented => None,
                };
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                let language = code_language.take().unwrap_or_else(|| "plaintext".to_owned());
                events.push(Event::Html(CowStr::from(highlight_code_block(&code, &language, theme)?)));
            }
            Event::Text(text) if in_code_block => code.push_str(&text),
            Event::Start(Tag::Image { dest_url, .. }) => {
                image = Some((dest_url.into_string(), String::new()));
            }
            Event::End(TagEnd::Image) => {
                if let Some((dest, alt)) = image.take()
                    && let Some(src) = resolve_image(&dest)
                {
                    events.push(Event::Html(CowStr::from(image_html(&src, &alt))));
                }
            }
            Event::Text(text) | Event::Code(text) if image.is_some() => {
                if let Some((_, alt)) = image.as_mut() {
                    alt.push_str(&text);
                }
            }
            _ if image.is_some() => {}
            other => events.push(other),
        }
    }

    let mut html = String::new();
    push_html(&mut html, events.into_iter());
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passthrough(path: &str) -> Option<String> {
        Some(path.to_owned())
    }

    #[test]
    fn test_render_basic() {
        let html = render("# Hello World\n\nThis is a test.", passthrough).unwrap();
        assert!(html.contains("<h1"));
        assert!(html.contains("Hello World"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_code_block() {
        let markdown = "```rust\nfn main() {\n    println!(\"Hello, world!\");\n}\n```";
        let html = render(markdown, passthrough).unwrap();
        assert!(html.contains("<pre"));
        assert!(html.contains("<code"));
        assert!(html.contains("main"));
        assert!(html.contains("style=\"color:"));
    }

    #[test]
    fn test_render_unknown_language_falls_back_to_plain_text() {
        let html = render("```nosuchlang\nlet x = 1;\n```", passthrough).unwrap();
        assert!(html.contains("<pre"));
        assert!(html.contains("x"));
    }

    #[test]
    fn test_render_empty() {
        assert!(render("", passthrough).unwrap().trim().is_empty());
    }

    #[test]
    fn test_render_formatting_and_tables() {
        let html = render("**bold** and *italic*\n\n| a | b |\n|---|---|\n| 1 | 2 |", passthrough).unwrap();
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>italic</em>"));
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_images_are_resolved_with_alt_text() {
        let html = render("![A *cover*](covers/a.png)", |path| Some(format!("/storage/{path}"))).unwrap();
        assert!(html.contains(r#"src="/storage/covers/a.png""#));
        assert!(html.contains(r#"alt="A cover""#));
        assert!(!html.contains("<em>"));
    }

    #[test]
    fn test_svg_images_are_inverted() {
        let html = render("![logo](logo.SVG)", passthrough).unwrap();
        assert!(html.contains("invert(100%)"));
    }

    #[test]
    fn test_unresolved_images_are_dropped() {
        let html = render("before ![gone](x.png) after", |_| None).unwrap();
        assert!(!html.contains("<img"));
        assert!(html.contains("before"));
        assert!(html.contains("after"));
    }

    #[test]
    fn test_image_attributes_are_escaped() {
        let html = render(r#"![say "hi"](a.png)"#, passthrough).unwrap();
        assert!(html.contains("alt=\"say &quot;hi&quot;\""));
    }
}
