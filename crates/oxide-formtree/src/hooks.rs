//! Extension points invoked during the render and process walks.
//!
//! Each slot holds callbacks run in registration order. Filters receive a
//! value and return the (possibly rewritten) value the walk continues with;
//! per-key filters run after the generic ones and are looked up by the key
//! the generic filters returned.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::element::Element;

/// Filter over a form about to be rendered.
pub type FormFilter = Arc<dyn Fn(Element) -> Element + Send + Sync>;

/// Filter over an element; the second argument is the root form.
pub type ElementFilter = Arc<dyn Fn(Element, &Element) -> Element + Send + Sync>;

/// Callback over the mutable `(element, values, input)` triple of the processor.
pub type ProcessHook = Arc<dyn Fn(&mut Element, &mut Map<String, Value>, &mut Value) + Send + Sync>;

/// Callback notified of assets a rendered form needs.
pub type AssetHook = Arc<dyn Fn(Asset) + Send + Sync>;

/// Client-side assets requested by rendered markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    /// Form script and stylesheet (repeatable groups, autocompletes).
    FormScripts,
    /// Media library used by attachment pickers.
    Media,
    /// Rich-text editor.
    Editor,
}

/// Registered extension points.
#[derive(Clone, Default)]
pub struct Hooks {
    before_render_form: Vec<FormFilter>,
    prepare_element: Vec<ElementFilter>,
    prepare_element_key: HashMap<String, Vec<ElementFilter>>,
    element_rendered: Vec<ElementFilter>,
    element_rendered_key: HashMap<String, Vec<ElementFilter>>,
    before_process_form: Vec<ProcessHook>,
    element_processed: Vec<ProcessHook>,
    enqueue: Vec<AssetHook>,
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("before_render_form", &self.before_render_form.len())
            .field("prepare_element", &self.prepare_element.len())
            .field("element_rendered", &self.element_rendered.len())
            .field("before_process_form", &self.before_process_form.len())
            .field("element_processed", &self.element_processed.len())
            .field("enqueue", &self.enqueue.len())
            .finish_non_exhaustive()
    }
}

impl Hooks {
    /// Creates an empty hook registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrites a form before its children are rendered.
    #[must_use]
    pub fn before_render_form(
        mut self,
        f: impl Fn(Element) -> Element + Send + Sync + 'static,
    ) -> Self {
        self.before_render_form.push(Arc::new(f));
        self
    }

    /// Rewrites every element before its value is resolved.
    #[must_use]
    pub fn prepare_element(
        mut self,
        f: impl Fn(Element, &Element) -> Element + Send + Sync + 'static,
    ) -> Self {
        self.prepare_element.push(Arc::new(f));
        self
    }

    /// Rewrites elements with the given key before their value is resolved.
    #[must_use]
    pub fn prepare_element_key(
        mut self,
        key: impl Into<String>,
        f: impl Fn(Element, &Element) -> Element + Send + Sync + 'static,
    ) -> Self {
        self.prepare_element_key
            .entry(key.into())
            .or_default()
            .push(Arc::new(f));
        self
    }

    /// Rewrites every element after its input tag is built.
    #[must_use]
    pub fn element_rendered(
        mut self,
        f: impl Fn(Element, &Element) -> Element + Send + Sync + 'static,
    ) -> Self {
        self.element_rendered.push(Arc::new(f));
        self
    }

    /// Rewrites elements with the given key after their input tag is built.
    #[must_use]
    pub fn element_rendered_key(
        mut self,
        key: impl Into<String>,
        f: impl Fn(Element, &Element) -> Element + Send + Sync + 'static,
    ) -> Self {
        self.element_rendered_key
            .entry(key.into())
            .or_default()
            .push(Arc::new(f));
        self
    }

    /// Inspects or rewrites a form, its values and its input before processing.
    #[must_use]
    pub fn before_process_form(
        mut self,
        f: impl Fn(&mut Element, &mut Map<String, Value>, &mut Value) + Send + Sync + 'static,
    ) -> Self {
        self.before_process_form.push(Arc::new(f));
        self
    }

    /// Inspects or rewrites state after an element wrote its value.
    #[must_use]
    pub fn element_processed(
        mut self,
        f: impl Fn(&mut Element, &mut Map<String, Value>, &mut Value) + Send + Sync + 'static,
    ) -> Self {
        self.element_processed.push(Arc::new(f));
        self
    }

    /// Receives the assets each rendered form needs.
    #[must_use]
    pub fn on_enqueue(mut self, f: impl Fn(Asset) + Send + Sync + 'static) -> Self {
        self.enqueue.push(Arc::new(f));
        self
    }

    pub(crate) fn apply_before_render_form(&self, form: Element) -> Element {
        self.before_render_form.iter().fold(form, |form, f| f(form))
    }

    pub(crate) fn apply_prepare_element(&self, element: Element, root: &Element) -> Element {
        apply_keyed(
            &self.prepare_element,
            &self.prepare_element_key,
            element,
            root,
        )
    }

    pub(crate) fn apply_element_rendered(&self, element: Element, root: &Element) -> Element {
        apply_keyed(
            &self.element_rendered,
            &self.element_rendered_key,
            element,
            root,
        )
    }

    pub(crate) fn apply_before_process_form(
        &self,
        form: &mut Element,
        values: &mut Map<String, Value>,
        input: &mut Value,
    ) {
        for f in &self.before_process_form {
            f(form, values, input);
        }
    }

    pub(crate) fn apply_element_processed(
        &self,
        element: &mut Element,
        values: &mut Map<String, Value>,
        input: &mut Value,
    ) {
        for f in &self.element_processed {
            f(element, values, input);
        }
    }

    pub(crate) fn enqueue(&self, asset: Asset) {
        for f in &self.enqueue {
            f(asset);
        }
    }
}

fn apply_keyed(
    generic: &[ElementFilter],
    keyed: &HashMap<String, Vec<ElementFilter>>,
    element: Element,
    root: &Element,
) -> Element {
    let element = generic.iter().fold(element, |el, f| f(el, root));
    match keyed.get(&element.key) {
        Some(filters) => filters.iter().fold(element, |el, f| f(el, root)),
        None => element,
    }
}
