//! Single-element markup builder.

use crate::attrs::Attrs;
use crate::escape::Escaper;

/// What follows the open tag.
///
/// `SelfClosing` and `Html(String::new())` are different on purpose: the
/// first renders `<input />`, the second `<textarea></textarea>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagContent {
    /// No content at all: `<tag ... />`.
    #[default]
    SelfClosing,
    /// Open tag only; the caller emits the children and the close tag.
    OpenOnly,
    /// Open tag, the given markup verbatim, close tag.
    Html(String),
}

impl TagContent {
    /// Content from already-escaped markup.
    pub fn html(markup: impl Into<String>) -> Self {
        Self::Html(markup.into())
    }
}

/// Returns the markup of one element.
///
/// Attribute values are escaped with `escaper`; content is inserted as given.
/// An empty tag name produces nothing.
pub fn make_tag(tag: &str, attrs: &Attrs, content: TagContent, escaper: &dyn Escaper) -> String {
    if tag.is_empty() {
        return String::new();
    }

    let mut html = format!("<{tag}");
    for (name, value) in attrs.iter() {
        html.push_str(&format!(r#" {name}="{}""#, escaper.escape_attr(value)));
    }

    match content {
        TagContent::SelfClosing => html.push_str(" />"),
        TagContent::OpenOnly => html.push('>'),
        TagContent::Html(inner) => {
            html.push('>');
            html.push_str(&inner);
            html.push_str(&format!("</{tag}>"));
        }
    }

    html
}
