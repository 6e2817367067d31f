//! Loading schemas from their JSON representation.
//!
//! In JSON, element attributes are keys starting with `#` and every other
//! key is a child element:
//!
//! ```json
//! {
//!   "#id": "profile",
//!   "name": { "#type": "text", "#label": "Name" },
//!   "address": {
//!     "#type": "composite",
//!     "street": { "#type": "text" }
//!   }
//! }
//! ```
//!
//! The JSON is converted into [`Element`]s once; the walks only see typed
//! fields.

use serde_json::{Map, Value};
use tracing::debug;

use crate::attrs::Attrs;
use crate::element::{
    scalar_string, Conditional, Element, ElementType, LabelPosition, OptionEntry, Options,
};
use crate::error::{FormError, Result};

/// Reserved-key prefix.
const RESERVED: char = '#';

/// JSON schema loader.
#[derive(Debug, Clone, Copy)]
pub struct Schema;

impl Schema {
    /// Parses schema JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Json`] for malformed JSON and the errors of
    /// [`Schema::from_json`] otherwise.
    pub fn from_str(text: &str) -> Result<Element> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(&value)
    }

    /// Converts a JSON schema into an element tree.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidSchema`] when the schema or one of its
    /// children is not an object or an attribute has the wrong shape, and
    /// [`FormError::MissingKey`] when `#key` is not a scalar.
    pub fn from_json(value: &Value) -> Result<Element> {
        let Value::Object(map) = value else {
            return Err(FormError::InvalidSchema(
                "schema must be a JSON object".to_string(),
            ));
        };
        load_element(map, "")
    }
}

fn load_element(map: &Map<String, Value>, path: &str) -> Result<Element> {
    let mut element = Element::new();

    for (key, value) in map {
        let Some(attribute) = key.strip_prefix(RESERVED) else {
            let child_path = if path.is_empty() {
                key.clone()
            } else {
                format!("{path}.{key}")
            };
            let Value::Object(child) = value else {
                return Err(FormError::InvalidSchema(format!(
                    "child `{child_path}` must be an object"
                )));
            };
            element
                .children
                .insert(key.clone(), load_element(child, &child_path)?);
            continue;
        };

        apply_attribute(&mut element, attribute, value, path)?;
    }

    Ok(element)
}

fn apply_attribute(element: &mut Element, attribute: &str, value: &Value, path: &str) -> Result<()> {
    match attribute {
        "key" => {
            element.key = scalar_string(value).ok_or_else(|| FormError::missing_key(path))?;
        }
        "type" => element.element_type = Some(ElementType::parse(&text(value, attribute, path)?)),
        "id" => element.id = Some(text(value, attribute, path)?),
        "slug" => element.slug = text(value, attribute, path)?,
        "name" => element.name = text(value, attribute, path)?,
        "label" => element.label = Some(text(value, attribute, path)?),
        "label_position" => {
            element.label_position = match text(value, attribute, path)?.as_str() {
                "after" => LabelPosition::After,
                _ => LabelPosition::Before,
            };
        }
        "description" => element.description = Some(text(value, attribute, path)?),
        "placeholder" => element.placeholder = Some(text(value, attribute, path)?),
        "default" => element.default = Some(value.clone()),
        "value" => element.value = Some(value.clone()),
        "size" => {
            element.size = Some(
                value
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
                    .ok_or_else(|| invalid(attribute, path, "a positive integer"))?,
            );
        }
        "options" => element.options = load_options(value, path)?,
        "labels_as_values" => element.labels_as_values = flag(value),
        "checked" => element.checked = text(value, attribute, path)?,
        "required" => element.required = flag(value),
        "multiple" => match value {
            Value::Object(prototype) => {
                element.repeatable = Some(Box::new(load_element(prototype, path)?));
            }
            other => element.multi_select = flag(other),
        },
        "container" => element.container = text(value, attribute, path)?,
        "container_classes" => element.container_classes = classes(value, attribute, path)?,
        "class" => element.class = classes(value, attribute, path)?,
        "attrs" => {
            let Value::Object(attrs) = value else {
                return Err(invalid(attribute, path, "an object"));
            };
            element.attrs = attrs
                .iter()
                .filter_map(|(k, v)| scalar_string(v).map(|v| (k.clone(), v)))
                .collect::<Attrs>();
        }
        "markup" => element.markup = text(value, attribute, path)?,
        "allow_html" => element.allow_html = flag(value),
        "conditional" => {
            let Value::Object(rule) = value else {
                return Err(invalid(attribute, path, "an object"));
            };
            let part = |name: &str| rule.get(name).and_then(scalar_string).unwrap_or_default();
            element.conditional = Some(Conditional {
                element: part("element"),
                value: part("value"),
                action: part("action"),
            });
        }
        "add_link" => element.add_link = text(value, attribute, path)?,
        "remove_link" => element.remove_link = text(value, attribute, path)?,
        "post_type" => element.post_types = classes(value, attribute, path)?,
        "taxonomy" => element.taxonomy = Some(text(value, attribute, path)?),
        unknown => debug!(attribute = unknown, path, "ignoring unknown schema attribute"),
    }
    Ok(())
}

fn invalid(attribute: &str, path: &str, expected: &str) -> FormError {
    let at = if path.is_empty() { "<root>" } else { path };
    FormError::InvalidSchema(format!("`#{attribute}` of `{at}` must be {expected}"))
}

fn text(value: &Value, attribute: &str, path: &str) -> Result<String> {
    scalar_string(value).ok_or_else(|| invalid(attribute, path, "a scalar"))
}

fn flag(value: &Value) -> bool {
    crate::element::is_truthy(value)
}

/// A scalar becomes a one-element list.
fn classes(value: &Value, attribute: &str, path: &str) -> Result<Vec<String>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| text(item, attribute, path))
            .collect(),
        Value::Null => Ok(Vec::new()),
        scalar => Ok(vec![text(scalar, attribute, path)?]),
    }
}

fn load_options(value: &Value, path: &str) -> Result<Options> {
    let entry = |label: &Value| -> Result<OptionEntry> {
        match label {
            Value::Object(_) | Value::Array(_) => Ok(OptionEntry::Group(load_options(label, path)?)),
            scalar => Ok(OptionEntry::Label(text(scalar, "options", path)?)),
        }
    };

    match value {
        Value::Object(map) => map
            .iter()
            .map(|(k, label)| Ok((k.clone(), entry(label)?)))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, label)| Ok((index.to_string(), entry(label)?)))
            .collect(),
        _ => Err(invalid("options", path, "an object or an array")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_children_and_attributes() {
        let form = Schema::from_json(&json!({
            "#id": "profile",
            "name": {"#type": "text", "#label": "Name", "#class": "wide"},
            "address": {
                "#type": "composite",
                "street": {"#type": "text"},
                "zip": {"#type": "text", "#size": 5}
            }
        }))
        .unwrap();

        assert_eq!(form.id.as_deref(), Some("profile"));
        let keys: Vec<_> = form.children.keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "address"]);

        let name = &form.children["name"];
        assert_eq!(name.element_type, Some(ElementType::Input("text".to_string())));
        assert_eq!(name.class, ["wide"]);

        let address = &form.children["address"];
        assert!(address.is_type(&ElementType::Composite));
        assert_eq!(address.children["zip"].size, Some(5));
    }

    #[test]
    fn test_multiple_overload() {
        let form = Schema::from_json(&json!({
            "tags": {"#type": "select", "#multiple": true, "#options": ["a", "b"]},
            "items": {"#type": "multiple", "#multiple": {"a": {"#type": "text"}}}
        }))
        .unwrap();

        let tags = &form.children["tags"];
        assert!(tags.multi_select);
        assert!(tags.repeatable.is_none());
        assert_eq!(tags.options.keys().collect::<Vec<_>>(), ["0", "1"]);

        let items = &form.children["items"];
        assert!(!items.multi_select);
        let prototype = items.repeatable.as_deref().unwrap();
        assert!(prototype.children.contains_key("a"));
    }

    #[test]
    fn test_option_groups() {
        let form = Schema::from_json(&json!({
            "color": {"#type": "select", "#options": {"x": "Other", "Warm": {"r": "Red"}}}
        }))
        .unwrap();
        let options = &form.children["color"].options;
        assert_eq!(options["x"], OptionEntry::Label("Other".to_string()));
        assert!(matches!(&options["Warm"], OptionEntry::Group(g) if g.contains_key("r")));
    }

    #[test]
    fn test_non_scalar_key_is_missing_key() {
        let err = Schema::from_json(&json!({"a": {"#key": ["x"]}})).unwrap_err();
        assert!(matches!(err, FormError::MissingKey { .. }));
    }

    #[test]
    fn test_invalid_schemas() {
        assert!(matches!(
            Schema::from_json(&json!(["x"])),
            Err(FormError::InvalidSchema(_))
        ));
        assert!(matches!(
            Schema::from_json(&json!({"a": "text"})),
            Err(FormError::InvalidSchema(_))
        ));
        assert!(matches!(Schema::from_str("{"), Err(FormError::Json(_))));
    }

    #[test]
    fn test_unknown_attributes_are_ignored() {
        let form = Schema::from_str(r##"{"#weight": 3, "a": {"#type": "text"}}"##).unwrap();
        assert_eq!(form.children.len(), 1);
    }
}
