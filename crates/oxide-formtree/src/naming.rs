//! Element defaulting and hierarchical identifiers.
//!
//! `name` is the bracketed wire path used when the tree is posted
//! (`address[street]`, `items[0][title]`); `slug` is the hyphenated DOM
//! path (`address-street`, `items-0-title`). They are derived side by side
//! so DOM ids never have to follow the wire format.

use indexmap::IndexMap;

use crate::element::{Element, ElementType};

/// Fills the identifiers of an element found under `map_key`.
///
/// Each of `key`, `slug` and `name` that is empty becomes `map_key`.
pub fn with_defaults(mut element: Element, map_key: &str) -> Element {
    for field in [&mut element.key, &mut element.slug, &mut element.name] {
        if field.is_empty() {
            *field = map_key.to_string();
        }
    }
    element
}

/// Takes the children of a form with their identifiers defaulted.
pub fn child_elements(form: &mut Element) -> IndexMap<String, Element> {
    std::mem::take(&mut form.children)
        .into_iter()
        .map(|(key, child)| {
            let child = with_defaults(child, &key);
            (key, child)
        })
        .collect()
}

/// Derives a child's `name` and `slug` from its parent form.
pub fn derive_child_identity(parent: &Element, mut child: Element, key: &str) -> Element {
    match &parent.index {
        Some(index) if !parent.name.is_empty() => {
            child.name = format!("{}[{index}][{key}]", parent.name);
            child.slug = format!("{}-{index}-{key}", parent.slug);
        }
        _ => {
            if !parent.slug.is_empty() {
                child.slug = format!("{}-{}", parent.slug, child.slug);
            }
        }
    }

    if parent.is_type(&ElementType::Composite) && !parent.name.is_empty() {
        child.name = format!("{}[{}]", parent.name, child.key);
    }

    child
}
