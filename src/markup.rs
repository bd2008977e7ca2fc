//! Inline markup rendering for untrusted text fields.
//!
//! `title` and `description` properties come straight from authors. They are
//! rendered through [`WikiTextRenderer`], which escapes all HTML first and then
//! expands a small inline subset of wiki markup. Links are expanded first;
//! emphasis is then applied to text only, never inside a generated tag.
//!
//! | Markup | Output |
//! |--------|--------|
//! | `'''bold'''` | `<b>bold</b>` |
//! | `''italic''` | `<i>italic</i>` |
//! | `[[Page]]`, `[[Page\|label]]` | internal link |
//! | `[https://example.org label]` | external link |

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::geo::sanitize::TextRenderer;

// Group 1 consumes a whole tag so emphasis cannot start or end inside one.
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(<[^>]*>)|'''((?:<[^>]*>|[^<])+?)'''").unwrap());
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(<[^>]*>)|''((?:<[^>]*>|[^<])+?)''").unwrap());
static INTERNAL_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]|]+)(?:\|([^\[\]]*))?\]\]").unwrap());
static EXTERNAL_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[((?:https?:)?//[^\s\[\]]+)(?:\s+([^\[\]]*))?\]").unwrap());

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap emphasis matched by `pattern` in `<tag>`, leaving tags untouched.
fn emphasize(html: &str, pattern: &Regex, tag: &str) -> String {
    pattern
        .replace_all(html, |caps: &Captures| match caps.get(2) {
            Some(inner) => format!("<{tag}>{}</{tag}>", inner.as_str()),
            None => caps[0].to_owned(),
        })
        .into_owned()
}

/// Renders the inline wiki subset to safe HTML.
#[derive(Debug, Clone)]
pub struct WikiTextRenderer {
    /// Prefix for internal link targets, e.g. `/wiki/`
    article_path: String,
}

impl WikiTextRenderer {
    pub fn new(article_path: impl Into<String>) -> Self {
        Self {
            article_path: article_path.into(),
        }
    }

    fn internal_link(&self, caps: &Captures) -> String {
        let target = caps[1].trim();
        let label = caps.get(2).map_or(target, |m| m.as_str().trim());
        let label = if label.is_empty() { target } else { label };
        format!(
            "<a href=\"{}{}\" title=\"{target}\">{label}</a>",
            self.article_path,
            target.replace(' ', "_")
        )
    }
}

impl Default for WikiTextRenderer {
    fn default() -> Self {
        Self::new("/wiki/")
    }
}

impl TextRenderer for WikiTextRenderer {
    fn render(&self, text: &str) -> String {
        let html = escape_html(text);
        let html = INTERNAL_LINK.replace_all(&html, |caps: &Captures| self.internal_link(caps));
        let html = EXTERNAL_LINK.replace_all(&html, |caps: &Captures| {
            let url = &caps[1];
            let label = caps.get(2).map_or("", |m| m.as_str().trim());
            let label = if label.is_empty() { url } else { label };
            format!("<a rel=\"nofollow\" class=\"external text\" href=\"{url}\">{label}</a>")
        });
        let html = emphasize(&html, &BOLD, "b");
        let html = emphasize(&html, &ITALIC, "i");
        html.trim().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str) -> String {
        WikiTextRenderer::default().render(text)
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">&</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn test_script_is_neutralized() {
        let html = render("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_bold_and_italic() {
        assert_eq!(render("'''big''' and ''slanted''"), "<b>big</b> and <i>slanted</i>");
    }

    #[test]
    fn test_emphasis_stays_out_of_attributes() {
        assert_eq!(
            render("[[A''b'']]"),
            "<a href=\"/wiki/A''b''\" title=\"A''b''\">A<i>b</i></a>"
        );
        assert_eq!(
            render("[https://example.org/'''x''' '''Bold''']"),
            "<a rel=\"nofollow\" class=\"external text\" href=\"https://example.org/'''x'''\"><b>Bold</b></a>"
        );
    }

    #[test]
    fn test_emphasis_around_link() {
        assert_eq!(
            render("''see [[A]]''"),
            "<i>see <a href=\"/wiki/A\" title=\"A\">A</a></i>"
        );
    }

    #[test]
    fn test_internal_links() {
        assert_eq!(
            render("[[Eiffel Tower]]"),
            "<a href=\"/wiki/Eiffel_Tower\" title=\"Eiffel Tower\">Eiffel Tower</a>"
        );
        assert_eq!(
            render("[[Eiffel Tower|the tower]]"),
            "<a href=\"/wiki/Eiffel_Tower\" title=\"Eiffel Tower\">the tower</a>"
        );
    }

    #[test]
    fn test_external_links() {
        assert_eq!(
            render("[https://example.org Example]"),
            "<a rel=\"nofollow\" class=\"external text\" href=\"https://example.org\">Example</a>"
        );
        // Unsupported protocols stay literal text
        assert_eq!(render("[javascript:alert(1) x]"), "[javascript:alert(1) x]");
    }

    #[test]
    fn test_custom_article_path() {
        let renderer = WikiTextRenderer::new("/w/index.php?title=");
        assert!(renderer.render("[[A]]").contains("href=\"/w/index.php?title=A\""));
    }
}
