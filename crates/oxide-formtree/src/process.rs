//! Posted input to values.
//!
//! The processor walks the same schema the renderer walks and reads the
//! input tree the rendered names produce once posted. Every value it writes
//! is sanitized according to its element type.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::element::{is_truthy, scalar_string, Element, ElementType};
use crate::engine::FormEngine;
use crate::error::{FormError, Result};
use crate::escape::Escaper;
use crate::naming::child_elements;
use crate::posted::unslash;

impl FormEngine {
    /// Extracts the values of `form` from `input` into `values`.
    ///
    /// The caller's input is left untouched; with
    /// [`FormConfig::unslash_input`](crate::FormConfig) set, backslash
    /// escaping is removed from a copy once, before the walk.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::MissingKey`] when an element lacks a key.
    /// `values` may then hold the entries written before the failure.
    pub fn process_form(
        &self,
        form: &Element,
        values: &mut Map<String, Value>,
        input: &Value,
    ) -> Result<()> {
        let mut input = input.clone();
        if self.config().unslash_input {
            unslash(&mut input);
        }
        self.process_walk(form.clone(), values, &mut input)
    }

    /// Extracts the value of a single element, then of its children.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::MissingKey`] when the element or a descendant
    /// lacks a key.
    pub fn process_element(
        &self,
        element: &Element,
        values: &mut Map<String, Value>,
        input: &Value,
    ) -> Result<()> {
        let mut input = input.clone();
        self.process_node(element.clone(), values, &mut input)
    }

    fn process_walk(
        &self,
        mut form: Element,
        values: &mut Map<String, Value>,
        input: &mut Value,
    ) -> Result<()> {
        self.hooks()
            .apply_before_process_form(&mut form, values, input);

        let children = child_elements(&mut form);
        if !children.is_empty() {
            debug!(slug = %form.slug, children = children.len(), "processing form");
        }

        for (_, child) in children {
            self.process_node(child, values, input)?;
        }
        Ok(())
    }

    fn process_node(
        &self,
        mut element: Element,
        values: &mut Map<String, Value>,
        input: &mut Value,
    ) -> Result<()> {
        if element.key.is_empty() {
            return Err(FormError::missing_key(element.slug));
        }

        let key = element.key.clone();
        let escaper = self.escaper();
        let raw = input.get(key.as_str()).filter(|v| !v.is_null()).cloned();
        trace!(%key, present = raw.is_some(), "processing element");

        match element.element_type.clone() {
            Some(t) if t == ElementType::Checkbox || t.is_button() => {
                element.value = Some(Value::Bool(raw.as_ref().is_some_and(is_truthy)));
            }
            Some(ElementType::Composite) => {}
            Some(ElementType::Select) if element.multi_select => {
                element.value = Some(Value::Array(selected_list(raw, escaper)));
            }
            Some(ElementType::Multiple) => {
                let mut items = Vec::new();
                if let (Some(Value::Array(entries)), Some(prototype)) =
                    (raw, element.repeatable.as_deref())
                {
                    for mut entry in entries {
                        let mut item_values = Map::new();
                        self.process_walk(prototype.clone(), &mut item_values, &mut entry)?;
                        items.push(Value::Object(item_values));
                    }
                }
                values.insert(key.clone(), Value::Array(items));
            }
            element_type => {
                if let Some(raw) = raw {
                    let rich = element.allow_html || element_type == Some(ElementType::RichText);
                    element.value = Some(if rich {
                        sanitize_strings(raw, &|s: &str| escaper.sanitize_rich_text(s))
                    } else {
                        sanitize_strings(raw, &|s: &str| escaper.sanitize_plain_text(s))
                    });
                }
            }
        }

        if let Some(value) = element.value.clone() {
            values.insert(key.clone(), value);
        }

        self.hooks()
            .apply_element_processed(&mut element, values, input);

        if element.is_type(&ElementType::Composite) {
            let slot = values
                .entry(key.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }

            let mut absent = Value::Null;
            let nested_input = match input.get_mut(key.as_str()) {
                Some(nested) => nested,
                None => &mut absent,
            };
            if let Value::Object(nested_values) = slot {
                self.process_walk(element, nested_values, nested_input)?;
            }
            Ok(())
        } else {
            self.process_walk(element, values, input)
        }
    }
}

/// Applies `sanitize` to every string of a posted value.
fn sanitize_strings(value: Value, sanitize: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize(&s)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| sanitize_strings(item, sanitize))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, sanitize_strings(v, sanitize)))
                .collect(),
        ),
        other => other,
    }
}

/// Coerces a multi-select post into a list of plain-text strings.
fn selected_list(raw: Option<Value>, escaper: &dyn Escaper) -> Vec<Value> {
    let items: Vec<Value> = match raw {
        None => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(Value::Object(map)) => map.into_iter().map(|(_, v)| v).collect(),
        Some(other) => vec![other],
    };
    items
        .iter()
        .filter_map(scalar_string)
        .map(|s| Value::String(escaper.sanitize_plain_text(&s)))
        .collect()
}
