//! Content normalization applied before snapshots are compared.
//!
//! A [`Sanitizer`] turns a raw page body into the canonical string that gets
//! stored and compared.  It must be pure and deterministic: the same input
//! always yields the same output, otherwise an unchanged page would be
//! reported as changed.
//!
//! Which normalization runs is chosen in the configuration file through
//! [`SanitizeMode`].

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

/// Trait that every normalization strategy implements.
pub trait Sanitizer: Send {
    /// Map raw content onto its canonical form.
    fn sanitize(&self, raw: &str) -> String;
}

/// Selects a [`Sanitizer`] from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SanitizeMode {
    /// Compare bodies byte for byte.
    Raw,
    /// Ignore differences in whitespace only.
    Whitespace,
    /// Drop scripts, styles and comments, then ignore whitespace.
    #[default]
    Html,
}

impl SanitizeMode {
    pub fn build(self) -> Box<dyn Sanitizer> {
        match self {
            Self::Raw => Box::new(Raw),
            Self::Whitespace => Box::new(CollapseWhitespace),
            Self::Html => Box::new(StripHtml),
        }
    }
}

/// Identity transformation.
pub struct Raw;

impl Sanitizer for Raw {
    fn sanitize(&self, raw: &str) -> String {
        raw.to_string()
    }
}

/// Trims the content and folds every whitespace run into one space.
pub struct CollapseWhitespace;

impl Sanitizer for CollapseWhitespace {
    fn sanitize(&self, raw: &str) -> String {
        collapse_whitespace(raw)
    }
}

/// Removes the parts of an HTML page that tend to change on every request
/// without the visible content changing: inline `<script>` and `<style>`
/// blocks (nonces, analytics payloads, build hashes) and `<!-- -->` comments.
pub struct StripHtml;

static VOLATILE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<!--.*?-->")
        .expect("volatile block pattern is valid")
});

impl Sanitizer for StripHtml {
    fn sanitize(&self, raw: &str) -> String {
        // Removing one block can splice two fragments into a new one
        // (`<scr<script></script>ipt>`), so repeat until nothing matches.
        let mut content = raw.to_string();
        loop {
            match VOLATILE_BLOCK.replace_all(&content, "") {
                Cow::Borrowed(_) => break,
                Cow::Owned(next) => content = next,
            }
        }
        collapse_whitespace(&content)
    }
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <style nonce="a1">body { color: red; }</style>
    <script src="/app.js?v=123"></script>
    <script>window.__TOKEN__ = "f00d";</script>
  </head>
  <body>
    <!-- rendered at 12:00:01 -->
    <h1>Release   notes</h1>
    <p>Version 2.0 is out.</p>
  </body>
</html>"#;

    fn all() -> Vec<Box<dyn Sanitizer>> {
        vec![
            SanitizeMode::Raw.build(),
            SanitizeMode::Whitespace.build(),
            SanitizeMode::Html.build(),
        ]
    }

    #[test]
    fn every_sanitizer_is_deterministic() {
        for s in all() {
            assert_eq!(s.sanitize(PAGE), s.sanitize(PAGE));
        }
    }

    #[test]
    fn every_sanitizer_is_idempotent() {
        let inputs = [PAGE, "", "   ", "<scr<script>x</script>ipt>alert(1)</script>", "a\t\nb"];
        for s in all() {
            for input in inputs {
                let once = s.sanitize(input);
                assert_eq!(s.sanitize(&once), once, "input: {input:?}");
            }
        }
    }

    #[test]
    fn raw_keeps_content_verbatim() {
        assert_eq!(Raw.sanitize(" a \n b "), " a \n b ");
    }

    #[test]
    fn whitespace_is_collapsed_and_trimmed() {
        assert_eq!(CollapseWhitespace.sanitize("\n  a \t\t b\r\n c  "), "a b c");
    }

    #[test]
    fn html_drops_scripts_styles_and_comments() {
        let out = StripHtml.sanitize(PAGE);
        assert!(!out.contains("__TOKEN__"));
        assert!(!out.contains("color: red"));
        assert!(!out.contains("rendered at"));
        assert!(out.contains("<h1>Release notes</h1> <p>Version 2.0 is out.</p>"));
    }

    #[test]
    fn html_ignores_volatile_differences() {
        let a = "<p>Hi</p><script>var t = 1;</script><!-- 1 -->";
        let b = "<p>Hi</p>\n<SCRIPT type=\"x\">var t = 2;</SCRIPT>\n<!-- 2 -->";
        assert_eq!(StripHtml.sanitize(a), StripHtml.sanitize(b));
    }

    #[test]
    fn html_still_sees_visible_changes() {
        assert_ne!(StripHtml.sanitize("<p>Hi</p>"), StripHtml.sanitize("<p>Bye</p>"));
    }

    #[test]
    fn html_removes_blocks_spliced_together_by_removal() {
        assert_eq!(StripHtml.sanitize("<scr<script>x</script>ipt>alert(1)</script>ok"), "ok");
    }

    #[test]
    fn mode_parses_from_lowercase_names() {
        let mode: SanitizeMode = serde_json::from_str("\"whitespace\"").unwrap();
        assert_eq!(mode, SanitizeMode::Whitespace);
        assert_eq!(SanitizeMode::default(), SanitizeMode::Html);
    }
}
