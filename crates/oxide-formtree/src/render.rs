//! Schema to markup.
//!
//! [`FormEngine::render_form`] walks the children of a form;
//! [`FormEngine::render_element`] renders one element and then walks its own
//! children as a nested sub-form. Rendering only reads the values tree.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::attrs::Attrs;
use crate::element::{options, scalar_string, Element, ElementType, LabelPosition, OptionEntry};
use crate::engine::FormEngine;
use crate::error::{FormError, Result};
use crate::hooks::Asset;
use crate::naming::{child_elements, derive_child_identity};
use crate::tag::{make_tag, TagContent};
use crate::widgets::AttachmentKind;

/// Input tag produced by the type dispatch.
#[derive(Debug, Default)]
struct BuiltInput {
    tag: String,
    content: TagContent,
    /// Widget markup emitted right after the tag.
    widget: String,
}

impl FormEngine {
    /// Renders a form with the given values.
    ///
    /// A form without child elements renders nothing at all.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::MissingKey`] when any element lacks a key; no
    /// partial markup is returned.
    pub fn render_form(&self, form: &Element, values: &Map<String, Value>) -> Result<String> {
        self.walk_form(form.clone(), values, form)
    }

    /// Renders one element, its input, and its nested children.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::MissingKey`] when the element or a descendant
    /// lacks a key.
    pub fn render_element(&self, element: &Element, values: &Map<String, Value>) -> Result<String> {
        self.render_node(element.clone(), values, element)
    }

    fn walk_form(
        &self,
        mut form: Element,
        values: &Map<String, Value>,
        root: &Element,
    ) -> Result<String> {
        let config = self.config();

        form.class.push(config.class_prefix.clone());
        if let Some(id) = form.id.clone() {
            form.class.push(config.prefixed(&id));
            form.attrs.set("id", id);
        }

        let mut form = self.hooks().apply_before_render_form(form);

        let children = child_elements(&mut form);
        if children.is_empty() {
            return Ok(String::new());
        }
        debug!(slug = %form.slug, children = children.len(), "rendering form");

        form.attrs.set("class", form.class.join(" "));

        let nested = Map::new();
        let value_root = if form.is_type(&ElementType::Composite) && !form.key.is_empty() {
            values
                .get(&form.key)
                .and_then(Value::as_object)
                .unwrap_or(&nested)
        } else {
            values
        };

        let mut markup = String::new();
        for (key, child) in children {
            let child = derive_child_identity(&form, child, &key);
            markup.push_str(&self.render_node(child, value_root, root)?);
        }

        self.hooks().enqueue(Asset::FormScripts);

        Ok(self.wrap(&form.container, &form.attrs, markup))
    }

    fn render_node(
        &self,
        element: Element,
        values: &Map<String, Value>,
        root: &Element,
    ) -> Result<String> {
        if element.key.is_empty() {
            return Err(FormError::missing_key(element.slug));
        }

        let config = self.config();
        let escaper = self.escaper();

        let mut element = self.hooks().apply_prepare_element(element, root);

        if !element.is_button() && element.value.is_none() {
            element.value = values
                .get(&element.key)
                .filter(|v| !v.is_null())
                .cloned()
                .or_else(|| element.default.clone());
        }

        let input_id = element
            .id
            .clone()
            .unwrap_or_else(|| config.prefixed(&element.slug));

        element
            .container_classes
            .push(config.prefixed(&format!("key-{}", element.key)));
        element
            .container_classes
            .push(config.prefixed(&format!("slug-{}", element.slug)));

        let built = self.dispatch(&mut element, &input_id, values)?;

        let mut element = self.hooks().apply_element_rendered(element, root);

        let label = element
            .label
            .as_ref()
            .map(|text| {
                let attrs = Attrs::new()
                    .with("class", config.prefixed("label"))
                    .with("for", input_id.as_str());
                make_tag("label", &attrs, TagContent::html(escaper.escape_text(text)), escaper)
            })
            .unwrap_or_default();

        if !element.class.is_empty() {
            element.attrs.set("class", element.class.join(" "));
        }

        let mut markup = String::new();
        if element.is_type(&ElementType::Markup) {
            markup.push_str(&element.markup);
        } else if !built.tag.is_empty() {
            if element.label_position == LabelPosition::Before {
                markup.push_str(&label);
            }
            markup.push_str(&make_tag(&built.tag, &element.attrs, built.content, escaper));
            markup.push_str(&built.widget);
            if element.label_position == LabelPosition::After {
                markup.push_str(&label);
            }
        }

        if let Some(description) = &element.description {
            let attrs = Attrs::new().with("class", "description");
            markup.push_str(&make_tag(
                "p",
                &attrs,
                TagContent::html(escaper.escape_text(description)),
                escaper,
            ));
        }

        let container = element.container.clone();
        let container_attrs = Attrs::new().with("class", element.container_classes.join(" "));

        markup.push_str(&self.walk_form(element, values, root)?);

        Ok(self.wrap(&container, &container_attrs, markup))
    }

    /// Builds the input tag of a typed element.
    fn dispatch(
        &self,
        element: &mut Element,
        input_id: &str,
        values: &Map<String, Value>,
    ) -> Result<BuiltInput> {
        let config = self.config();
        let escaper = self.escaper();

        let rich_text_fallback =
            element.is_type(&ElementType::RichText) && !self.widgets().can_rich_edit();
        if rich_text_fallback {
            element.element_type = Some(ElementType::Textarea);
            element.allow_html = true;
        }

        let Some(element_type) = element.element_type.clone() else {
            return Ok(BuiltInput::default());
        };
        trace!(key = %element.key, %element_type, "dispatching element");

        let attrs = &mut element.attrs;
        attrs.set("id", input_id);
        attrs.set("name", element.name.as_str());
        attrs.set("type", element_type.as_str());
        if rich_text_fallback {
            attrs.set_default("rows", config.textarea_fallback_rows.to_string());
        }

        element.container_classes.push(config.prefixed("element"));
        element
            .container_classes
            .push(config.prefixed(&format!("type-{element_type}")));
        element.class.push(config.prefixed("input"));

        let current = element
            .value
            .as_ref()
            .and_then(scalar_string)
            .unwrap_or_default();
        if !current.is_empty() {
            element.attrs.set("value", current.as_str());
        }
        if let Some(placeholder) = &element.placeholder {
            element.attrs.set("placeholder", placeholder.as_str());
        }
        if let Some(size) = element.size {
            element.attrs.set("size", size.to_string());
        }
        if let Some(rule) = &element.conditional {
            if !rule.element.is_empty() && !rule.action.is_empty() && !rule.value.is_empty() {
                element
                    .attrs
                    .set("data-conditional-element", rule.element.as_str());
                element
                    .attrs
                    .set("data-conditional-action", rule.action.as_str());
                element
                    .attrs
                    .set("data-conditional-value", rule.value.as_str());
            }
        }

        let mut built = BuiltInput {
            tag: "input".to_string(),
            ..BuiltInput::default()
        };

        match element_type.clone() {
            t if t.is_button() => {
                built.tag = "button".to_string();
                element.attrs.remove("value");
                built.content = TagContent::html(escaper.escape_text(&current));
            }

            ElementType::Checkbox => {
                element.attrs.set("value", element.checked.as_str());
                element.label_position = LabelPosition::After;

                let checked = element.value.as_ref().is_some_and(|v| {
                    matches!(v, Value::Bool(true))
                        || scalar_string(v).as_deref() == Some(element.checked.as_str())
                });
                if checked {
                    element.attrs.set("checked", "checked");
                }
            }

            ElementType::Radio => {
                if element.options.is_empty() {
                    element.options = options([("0", "No"), ("1", "Yes")]);
                }

                built.tag = "div".to_string();
                element.class.push(config.prefixed("radio-group"));
                element.label_position = LabelPosition::After;
                for attr in ["value", "type", "name"] {
                    element.attrs.remove(attr);
                }

                let mut content = String::new();
                for (value, entry) in &element.options {
                    let OptionEntry::Label(label) = entry else {
                        continue;
                    };
                    let radio_id = format!("{}-{value}", element.slug);
                    let mut radio = Attrs::new()
                        .with("type", "radio")
                        .with("id", radio_id.as_str())
                        .with("name", element.name.as_str())
                        .with("value", value.as_str());
                    if element.value.is_some() && *value == current {
                        radio.set("checked", "checked");
                    }

                    let input = make_tag("input", &radio, TagContent::SelfClosing, escaper);
                    content.push_str(&make_tag(
                        "label",
                        &Attrs::new().with("for", radio_id),
                        TagContent::html(input + &escaper.escape_text(label)),
                        escaper,
                    ));
                }
                built.content = TagContent::html(content);
            }

            ElementType::Textarea => {
                built.tag = "textarea".to_string();
                built.content = TagContent::html(escaper.escape_text(&current));
                element.attrs.remove("value");
                element.attrs.remove("type");
            }

            ElementType::Select => {
                built.tag = "select".to_string();
                element.attrs.remove("value");
                element.attrs.remove("type");
                element.attrs.remove("placeholder");

                if element.multi_select {
                    element.attrs.set("multiple", "multiple");
                    element.attrs.append("name", "[]");
                    element.value = Some(Value::Array(
                        string_list(element.value.as_ref())
                            .into_iter()
                            .map(Value::String)
                            .collect(),
                    ));
                }

                let mut choices = crate::element::Options::new();
                if !element.required {
                    let blank = element
                        .placeholder
                        .clone()
                        .unwrap_or_else(|| config.select_placeholder.clone());
                    choices.insert(String::new(), OptionEntry::Label(blank));
                }
                for (value, entry) in &element.options {
                    if !choices.contains_key(value) {
                        choices.insert(value.clone(), entry.clone());
                    }
                }

                built.content = TagContent::html(self.render_options(&choices, element));
            }

            ElementType::Composite => {
                for attr in ["value", "name", "type"] {
                    element.attrs.remove(attr);
                }
                built.tag = String::new();
            }

            ElementType::Multiple => {
                built.tag = "div".to_string();
                for attr in ["value", "type", "name"] {
                    element.attrs.remove(attr);
                }
                built.content =
                    TagContent::html(self.render_multiple(element, values.get(&element.key))?);
            }

            ElementType::Image | ElementType::Attachment => {
                let kind = if element_type == ElementType::Image {
                    AttachmentKind::Image
                } else {
                    AttachmentKind::Attachment
                };
                self.hooks().enqueue(Asset::Media);

                element.class.push("select-attachment-field".to_string());
                if kind == AttachmentKind::Image {
                    element.class.push("select-image-field".to_string());
                }
                element.attrs.set("type", "text");
                element.attrs.set("data-attachment-type", kind.as_str());

                built.widget = self
                    .widgets()
                    .attachment_picker(&current, &element.name, kind);
            }

            ElementType::RichText => {
                let editor_id = config.prefixed(&format!("mce-{}", element.slug));
                self.hooks().enqueue(Asset::Editor);

                built.tag = "div".to_string();
                element.class.push(config.prefixed("mce-area"));
                element.attrs.set("id", editor_id.as_str());
                for attr in ["value", "type", "name"] {
                    element.attrs.remove(attr);
                }
                built.content = TagContent::html(self.widgets().rich_text_editor(
                    &current,
                    &editor_id,
                    &element.name,
                ));
                element.id = Some(editor_id);
            }

            ElementType::PostSelect => {
                element.class.push(config.prefixed("post-select"));
                element.attrs.set("type", "hidden");
                element
                    .attrs
                    .set("data-post-type", element.post_types.join(" "));

                if !current.is_empty() {
                    if let Some(title) = self.records().post_title(&current) {
                        element.attrs.set("data-title", title);
                    }
                }
            }

            ElementType::TermSelect => {
                let taxonomy = element.taxonomy.clone().unwrap_or_default();
                element.class.push(config.prefixed("term-select"));
                element.attrs.set("type", "hidden");
                element.attrs.set("data-taxonomy", taxonomy.as_str());

                if let Ok(id) = current.trim().parse::<u64>() {
                    if let Some(name) = self.records().term_name(id, &taxonomy) {
                        element.attrs.set("data-name", name);
                    }
                }
            }

            ElementType::Markup => {
                built.tag = String::new();
            }

            ElementType::Input(_) | ElementType::Button | ElementType::Submit => {}
        }

        Ok(built)
    }

    /// Wraps markup in a container tag; an empty tag name leaves it bare.
    pub(crate) fn wrap(&self, container: &str, attrs: &Attrs, markup: String) -> String {
        if container.is_empty() {
            return markup;
        }
        make_tag(container, attrs, TagContent::Html(markup), self.escaper())
    }
}

/// Coerces a select value into a list of strings.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        None => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter_map(scalar_string).collect(),
        Some(Value::Object(map)) => map.values().filter_map(scalar_string).collect(),
        Some(other) => scalar_string(other).into_iter().collect(),
    }
}
