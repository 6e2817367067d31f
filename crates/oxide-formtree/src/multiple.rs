//! Repeatable sub-forms.
//!
//! A `multiple` element carries a prototype sub-form. It renders as a
//! client-side template (one blank instance whose identifiers contain
//! [`INDEX_PLACEHOLDER`](crate::element::INDEX_PLACEHOLDER)) followed by one
//! list item per existing entry. The form script clones the template,
//! substitutes the placeholder and keeps the indices dense.

use ironhtml::html;
use ironhtml::typed::Element as Tag;
use ironhtml_elements::{Div, Li, Ol, Script, Span};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::element::{Element, InstanceIndex};
use crate::engine::FormEngine;
use crate::error::{FormError, Result};

impl FormEngine {
    /// Renders the template and the existing instances of a repeatable
    /// element.
    ///
    /// `values` is the element's slot in the values tree: a sequence of
    /// entries, or an object whose keys are non-negative integers. Entries
    /// under any other key are skipped. Returns an empty string when the
    /// element has no prototype.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::MissingKey`] when the prototype has a child
    /// without a key.
    pub fn render_multiple(&self, element: &Element, values: Option<&Value>) -> Result<String> {
        let Some(prototype) = element.repeatable.as_deref() else {
            return Ok(String::new());
        };
        let config = self.config();

        let mut prototype = prototype.clone();
        prototype.key = element.key.clone();
        prototype.slug = element.slug.clone();
        prototype.name = element.name.clone();
        prototype.element_type = None;

        let controls = format!(
            "{}{}",
            Tag::<Span>::new()
                .class("remove-multiple-item")
                .text(&element.remove_link)
                .render(),
            Tag::<Span>::new().class("sort-multiple-item").render(),
        );
        let item_class = config.prefixed("multiple-item");

        let mut template = prototype.clone();
        template.index = Some(InstanceIndex::Template);
        let blank: Map<String, Value> = prototype
            .children
            .keys()
            .map(|key| (key.clone(), Value::String(String::new())))
            .collect();
        let template_item = Tag::<Li>::new()
            .class(&item_class)
            .raw(&controls)
            .raw(self.render_form(&template, &blank)?)
            .render();

        let entries = existing_entries(values);
        debug!(key = %element.key, entries = entries.len(), "rendering repeatable element");

        let nothing = Map::new();
        let mut instances = Vec::with_capacity(entries.len());
        for (index, entry) in entries {
            let mut instance = prototype.clone();
            instance.index = Some(InstanceIndex::Position(index));
            let item_values = entry.as_object().unwrap_or(&nothing);
            instances.push(self.render_form(&instance, item_values)?);
        }

        let add_text = &element.add_link;
        let add_link = html! {
            a.class("add-multiple-item") { #add_text }
        };

        let wrapper_class = format!(
            "{} {}",
            config.prefixed("multiple"),
            config.prefixed(&format!("multiple-{}", element.key))
        );
        let template_class = config.prefixed("multiple-template");
        let list_class = config.prefixed("multiple-list");
        Ok(Tag::<Div>::new()
            .class(&wrapper_class)
            .child::<Script, _>(|s| {
                s.attr("type", "text/html")
                    .class(&template_class)
                    .raw(&template_item)
            })
            .child::<Ol, _>(|ol| {
                instances.iter().fold(ol.class(&list_class), |ol, instance| {
                    ol.child::<Li, _>(|li| li.class(&item_class).raw(&controls).raw(instance))
                })
            })
            .raw(add_link.render())
            .render())
    }
}

/// Entries of a repeatable slot with their positions.
fn existing_entries(values: Option<&Value>) -> Vec<(usize, &Value)> {
    match values {
        Some(Value::Array(items)) => items.iter().enumerate().collect(),
        Some(Value::Object(map)) => map
            .iter()
            .filter_map(|(key, entry)| match key.parse::<usize>() {
                Ok(index) => Some((index, entry)),
                Err(_) => {
                    let err = FormError::InvalidRepeatableIndex(key.clone());
                    warn!(%err, "skipping repeatable entry");
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    }
}
