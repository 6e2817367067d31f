//! `<option>` and `<optgroup>` markup for select boxes.

use serde_json::Value;

use crate::attrs::Attrs;
use crate::element::{scalar_string, Element, OptionEntry, Options};
use crate::engine::FormEngine;
use crate::tag::{make_tag, TagContent};

impl FormEngine {
    /// Renders the options of a select box.
    ///
    /// Groups become `<optgroup>` elements with their options rendered
    /// recursively; selection follows the element's current value, which may
    /// be a list for multi-selects. With `labels_as_values` the label doubles
    /// as the submitted value, except for the blank option.
    pub fn render_options(&self, options: &Options, element: &Element) -> String {
        let escaper = self.escaper();
        let mut markup = String::new();

        for (value, entry) in options {
            match entry {
                OptionEntry::Group(group) => {
                    let attrs = Attrs::new().with("label", value.as_str());
                    markup.push_str(&make_tag(
                        "optgroup",
                        &attrs,
                        TagContent::html(self.render_options(group, element)),
                        escaper,
                    ));
                }
                OptionEntry::Label(label) => {
                    let value = if element.labels_as_values && !value.is_empty() {
                        label
                    } else {
                        value
                    };

                    let mut attrs = Attrs::new().with("value", value.as_str());
                    if is_selected(element, value) {
                        attrs.set("selected", "selected");
                    }
                    markup.push_str(&make_tag(
                        "option",
                        &attrs,
                        TagContent::html(escaper.escape_text(label)),
                        escaper,
                    ));
                }
            }
        }

        markup
    }
}

fn is_selected(element: &Element, value: &str) -> bool {
    match &element.value {
        None | Some(Value::Null) => false,
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(scalar_string)
            .any(|item| item == value),
        Some(current) => scalar_string(current).is_some_and(|current| current == value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::options;

    #[test]
    fn test_single_selection() {
        let choices = options([("", "- select -"), ("r", "Red"), ("b", "Blue")]);
        let element = Element::select(choices.clone()).value("b");
        let html = FormEngine::new().render_options(&choices, &element);
        assert_eq!(html.matches("selected=").count(), 1);
        assert!(html.contains(r#"<option value="b" selected="selected">Blue</option>"#));
        assert!(html.contains(r#"<option value="r">Red</option>"#));
    }

    #[test]
    fn test_groups_share_selection() {
        let mut choices = options([("x", "Top")]);
        choices.insert(
            "Warm".to_string(),
            OptionEntry::Group(options([("r", "Red"), ("o", "Orange")])),
        );
        let element = Element::select(choices.clone())
            .multi_select()
            .value(vec!["x", "o"]);
        let html = FormEngine::new().render_options(&choices, &element);
        assert!(html.contains(r#"<optgroup label="Warm">"#));
        assert!(html.contains(r#"<option value="o" selected="selected">Orange</option>"#));
        assert!(html.contains(r#"<option value="x" selected="selected">Top</option>"#));
        assert!(html.contains(r#"<option value="r">Red</option>"#));
    }

    #[test]
    fn test_labels_as_values() {
        let choices = options([("", "- select -"), ("1", "Small")]);
        let element = Element::select(choices.clone())
            .labels_as_values()
            .value("Small");
        let html = FormEngine::new().render_options(&choices, &element);
        assert!(html.contains(r#"<option value="">- select -</option>"#));
        assert!(html.contains(r#"<option value="Small" selected="selected">Small</option>"#));
    }

    #[test]
    fn test_labels_are_escaped() {
        let choices = options([("a", "<b>A</b>")]);
        let html = FormEngine::new().render_options(&choices, &Element::select(choices.clone()));
        assert!(html.contains("&lt;b&gt;A&lt;/b&gt;"));
    }
}
