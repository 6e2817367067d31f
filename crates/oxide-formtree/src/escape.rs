//! Escaping and sanitizing of user-controlled text.
//!
//! The engine never emits text itself: every label, attribute value and
//! posted value passes through an [`Escaper`] on its way into markup or into
//! the values tree.

use std::sync::LazyLock;

use regex::Regex;

/// Escapes text for markup and sanitizes posted input.
pub trait Escaper: Send + Sync {
    /// Escapes a value placed inside a double-quoted attribute.
    fn escape_attr(&self, value: &str) -> String;

    /// Escapes text placed between tags.
    fn escape_text(&self, value: &str) -> String;

    /// Reduces posted input to plain printable text.
    fn sanitize_plain_text(&self, value: &str) -> String;

    /// Strips dangerous markup from posted input while keeping safe HTML.
    fn sanitize_rich_text(&self, value: &str) -> String;
}

/// Entity-escaping, regex-sanitizing default [`Escaper`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlEscaper;

impl Escaper for HtmlEscaper {
    fn escape_attr(&self, value: &str) -> String {
        html_escape(value)
    }

    fn escape_text(&self, value: &str) -> String {
        html_escape(value)
    }

    fn sanitize_plain_text(&self, value: &str) -> String {
        let without_blocks = SCRIPT_STYLE_BLOCK.replace_all(value, "");
        let stripped = strip_until_stable(&TAG, &without_blocks);
        WHITESPACE.replace_all(&stripped, " ").trim().to_string()
    }

    fn sanitize_rich_text(&self, value: &str) -> String {
        let passes: [&Regex; 4] = [&DANGEROUS_BLOCK, &DANGEROUS_TAG, &EVENT_ATTR, &JAVASCRIPT_URL];
        let mut current = value.to_string();
        loop {
            let next = passes.iter().fold(current.clone(), |acc, pattern| {
                pattern.replace_all(&acc, "").into_owned()
            });
            if next == current {
                return current;
            }
            current = next;
        }
    }
}

/// Escapes HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

static SCRIPT_STYLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("valid script/style pattern")
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[a-zA-Z/!?][^<>]*>").expect("valid tag pattern"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n\t ]+").expect("valid whitespace pattern"));

static DANGEROUS_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<iframe\b[^>]*>.*?</iframe\s*>|<object\b[^>]*>.*?</object\s*>",
    )
    .expect("valid dangerous block pattern")
});

static DANGEROUS_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(?:script|style|iframe|object|embed)\b[^>]*>")
        .expect("valid dangerous tag pattern")
});

static EVENT_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+on[a-z]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#)
        .expect("valid event attribute pattern")
});

static JAVASCRIPT_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript\s*:").expect("valid javascript url pattern"));

/// Nested tags like `<<b>i>` reassemble after one pass.
fn strip_until_stable(pattern: &Regex, input: &str) -> String {
    let mut current = input.to_string();
    while pattern.is_match(&current) {
        current = pattern.replace_all(&current, "").into_owned();
    }
    current
}
