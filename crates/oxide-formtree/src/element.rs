//! Schema elements.
//!
//! A form is an [`Element`] whose children are elements. An element with an
//! [`ElementType`] renders an input; one without is a pure container whose
//! children render as a nested sub-form.

use std::fmt;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use crate::attrs::Attrs;

/// Token rendered in place of the index inside the client-side template of a
/// repeatable group. The browser runtime substitutes the real position.
pub const INDEX_PLACEHOLDER: &str = "%INDEX%";

/// Ordered select/radio options: option value to label or nested group.
pub type Options = IndexMap<String, OptionEntry>;

/// One entry of an [`Options`] map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionEntry {
    /// A selectable option with its display label.
    Label(String),
    /// An `<optgroup>`; the map key is the group label.
    Group(Options),
}

impl From<&str> for OptionEntry {
    fn from(label: &str) -> Self {
        Self::Label(label.to_string())
    }
}

impl From<String> for OptionEntry {
    fn from(label: String) -> Self {
        Self::Label(label)
    }
}

impl From<Options> for OptionEntry {
    fn from(group: Options) -> Self {
        Self::Group(group)
    }
}

/// Builds an [`Options`] map from `(value, label)` pairs.
pub fn options<K, V, I>(pairs: I) -> Options
where
    K: Into<String>,
    V: Into<OptionEntry>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// The input type of an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// `<button>`.
    Button,
    /// Submit button.
    Submit,
    /// Boolean checkbox.
    Checkbox,
    /// Radio button group built from the options.
    Radio,
    /// Multi-line text.
    Textarea,
    /// Select box, optionally multi-select.
    Select,
    /// Non-input element whose children post as a nested object.
    Composite,
    /// Repeatable sub-form.
    Multiple,
    /// Image attachment picker.
    Image,
    /// Attachment picker.
    Attachment,
    /// Rich-text editor (`mce`).
    RichText,
    /// Remote post autocomplete.
    PostSelect,
    /// Remote taxonomy term autocomplete.
    TermSelect,
    /// Literal markup block.
    Markup,
    /// Any other `<input>` type (`text`, `email`, `hidden`, ...).
    Input(String),
}

static BUTTON_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"button$|^submit$").expect("valid button type pattern"));

impl ElementType {
    /// Parses a schema type name.
    pub fn parse(name: &str) -> Self {
        match name {
            "button" => Self::Button,
            "submit" => Self::Submit,
            "checkbox" => Self::Checkbox,
            "radio" => Self::Radio,
            "textarea" => Self::Textarea,
            "select" => Self::Select,
            "composite" => Self::Composite,
            "multiple" => Self::Multiple,
            "image" => Self::Image,
            "attachment" => Self::Attachment,
            "mce" => Self::RichText,
            "post_select" => Self::PostSelect,
            "term_select" => Self::TermSelect,
            "markup" => Self::Markup,
            other => Self::Input(other.to_string()),
        }
    }

    /// Returns the schema type name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Button => "button",
            Self::Submit => "submit",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Composite => "composite",
            Self::Multiple => "multiple",
            Self::Image => "image",
            Self::Attachment => "attachment",
            Self::RichText => "mce",
            Self::PostSelect => "post_select",
            Self::TermSelect => "term_select",
            Self::Markup => "markup",
            Self::Input(name) => name,
        }
    }

    /// Buttons display their own value and never read one from the values tree.
    pub fn is_button(&self) -> bool {
        BUTTON_TYPE.is_match(self.as_str())
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the label goes relative to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelPosition {
    #[default]
    Before,
    After,
}

/// Position of one instance inside a repeatable group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceIndex {
    /// An existing entry of the values sequence.
    Position(usize),
    /// The client-side template, rendered with [`INDEX_PLACEHOLDER`].
    Template,
}

impl fmt::Display for InstanceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(index) => write!(f, "{index}"),
            Self::Template => f.write_str(INDEX_PLACEHOLDER),
        }
    }
}

/// Client-side show/hide rule driven by another element's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conditional {
    /// Slug of the element being watched.
    pub element: String,
    /// Value that triggers the action.
    pub value: String,
    /// Action to take (`show`, `hide`).
    pub action: String,
}

/// A node of the form schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Slot of this element in the values tree.
    pub key: String,
    /// Explicit id of the input.
    pub id: Option<String>,
    /// Input type; `None` for pure containers.
    pub element_type: Option<ElementType>,
    /// Hyphenated DOM identifier path.
    pub slug: String,
    /// Bracketed wire name.
    pub name: String,
    pub label: Option<String>,
    pub label_position: LabelPosition,
    pub description: Option<String>,
    pub placeholder: Option<String>,
    /// Value used when the values tree has none.
    pub default: Option<Value>,
    /// Bound value; takes precedence over the values tree when preset.
    pub value: Option<Value>,
    pub size: Option<u32>,
    pub options: Options,
    /// Use option labels as the posted values.
    pub labels_as_values: bool,
    /// Value posted by a checked checkbox.
    pub checked: String,
    /// Recognized but not enforced; suppresses the blank select option.
    pub required: bool,
    /// Select box accepts several values.
    pub multi_select: bool,
    /// Prototype of a repeatable group.
    pub repeatable: Option<Box<Element>>,
    /// Set while rendering one instance of a repeatable group.
    pub index: Option<InstanceIndex>,
    /// Wrapper tag name.
    pub container: String,
    pub container_classes: Vec<String>,
    /// Attributes of the input tag.
    pub attrs: Attrs,
    /// Classes of the input tag.
    pub class: Vec<String>,
    /// Literal markup for [`ElementType::Markup`].
    pub markup: String,
    /// Sanitize posted values as rich text.
    pub allow_html: bool,
    pub conditional: Option<Conditional>,
    pub add_link: String,
    pub remove_link: String,
    /// Post types searched by [`ElementType::PostSelect`].
    pub post_types: Vec<String>,
    /// Taxonomy searched by [`ElementType::TermSelect`].
    pub taxonomy: Option<String>,
    /// Child elements in schema order.
    pub children: IndexMap<String, Element>,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            key: String::new(),
            id: None,
            element_type: None,
            slug: String::new(),
            name: String::new(),
            label: None,
            label_position: LabelPosition::Before,
            description: None,
            placeholder: None,
            default: None,
            value: None,
            size: None,
            options: Options::new(),
            labels_as_values: false,
            checked: "1".to_string(),
            required: false,
            multi_select: false,
            repeatable: None,
            index: None,
            container: "div".to_string(),
            container_classes: Vec::new(),
            attrs: Attrs::new(),
            class: Vec::new(),
            markup: String::new(),
            allow_html: false,
            conditional: None,
            add_link: "Add item".to_string(),
            remove_link: "Remove item".to_string(),
            post_types: Vec::new(),
            taxonomy: None,
            children: IndexMap::new(),
        }
    }
}

impl Element {
    /// Creates an empty container element (a form).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an element of the given type.
    pub fn of_type(element_type: ElementType) -> Self {
        Self {
            element_type: Some(element_type),
            ..Self::default()
        }
    }

    /// Creates an `<input>` of the given HTML type.
    pub fn input(input_type: &str) -> Self {
        Self::of_type(ElementType::parse(input_type))
    }

    /// Creates a text input.
    pub fn text() -> Self {
        Self::input("text")
    }

    /// Creates a textarea.
    pub fn textarea() -> Self {
        Self::of_type(ElementType::Textarea)
    }

    /// Creates a checkbox.
    pub fn checkbox() -> Self {
        Self::of_type(ElementType::Checkbox)
    }

    /// Creates a select box with the given options.
    pub fn select(options: Options) -> Self {
        Self {
            options,
            ..Self::of_type(ElementType::Select)
        }
    }

    /// Creates a radio group with the given options.
    pub fn radio(options: Options) -> Self {
        Self {
            options,
            ..Self::of_type(ElementType::Radio)
        }
    }

    /// Creates a composite element; add its fields with [`Element::child`].
    pub fn composite() -> Self {
        Self::of_type(ElementType::Composite)
    }

    /// Creates a repeatable group of `prototype` sub-forms.
    pub fn repeatable(prototype: Element) -> Self {
        Self {
            repeatable: Some(Box::new(prototype)),
            ..Self::of_type(ElementType::Multiple)
        }
    }

    /// Creates a submit button showing `label`.
    pub fn submit(label: impl Into<String>) -> Self {
        Self {
            value: Some(Value::String(label.into())),
            ..Self::of_type(ElementType::Submit)
        }
    }

    /// Creates a literal markup block.
    pub fn markup(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            ..Self::of_type(ElementType::Markup)
        }
    }

    /// Returns whether this element renders an input.
    pub fn is_field(&self) -> bool {
        self.element_type.is_some()
    }

    /// Returns whether this element is of the given type.
    pub fn is_type(&self, element_type: &ElementType) -> bool {
        self.element_type.as_ref() == Some(element_type)
    }

    /// Returns whether this element is a button.
    pub fn is_button(&self) -> bool {
        self.element_type.as_ref().is_some_and(ElementType::is_button)
    }

    /// Sets the key.
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Sets the input id.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Renders the label after the input.
    #[must_use]
    pub fn label_after(mut self) -> Self {
        self.label_position = LabelPosition::After;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the placeholder.
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Presets the bound value.
    #[must_use]
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the text field size.
    #[must_use]
    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Adds an option.
    #[must_use]
    pub fn option(mut self, value: impl Into<String>, label: impl Into<OptionEntry>) -> Self {
        self.options.insert(value.into(), label.into());
        self
    }

    /// Uses option labels as their values.
    #[must_use]
    pub fn labels_as_values(mut self) -> Self {
        self.labels_as_values = true;
        self
    }

    /// Sets the value posted by a checked checkbox.
    #[must_use]
    pub fn checked_value(mut self, checked: impl Into<String>) -> Self {
        self.checked = checked.into();
        self
    }

    /// Marks the element required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Lets a select box accept several values.
    #[must_use]
    pub fn multi_select(mut self) -> Self {
        self.multi_select = true;
        self
    }

    /// Sets the wrapper tag.
    #[must_use]
    pub fn container(mut self, tag: impl Into<String>) -> Self {
        self.container = tag.into();
        self
    }

    /// Adds a class to the wrapper.
    #[must_use]
    pub fn container_class(mut self, class: impl Into<String>) -> Self {
        self.container_classes.push(class.into());
        self
    }

    /// Adds a class to the input.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class.push(class.into());
        self
    }

    /// Sets an input attribute.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.set(key, value);
        self
    }

    /// Sanitizes posted values as rich text.
    #[must_use]
    pub fn allow_html(mut self) -> Self {
        self.allow_html = true;
        self
    }

    /// Shows or hides this element depending on another element's value.
    #[must_use]
    pub fn conditional(
        mut self,
        element: impl Into<String>,
        value: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        self.conditional = Some(Conditional {
            element: element.into(),
            value: value.into(),
            action: action.into(),
        });
        self
    }

    /// Sets the "add" link text of a repeatable group.
    #[must_use]
    pub fn add_link(mut self, text: impl Into<String>) -> Self {
        self.add_link = text.into();
        self
    }

    /// Sets the "remove" link text of a repeatable group.
    #[must_use]
    pub fn remove_link(mut self, text: impl Into<String>) -> Self {
        self.remove_link = text.into();
        self
    }

    /// Restricts a post select to a post type.
    #[must_use]
    pub fn post_type(mut self, post_type: impl Into<String>) -> Self {
        self.post_types.push(post_type.into());
        self
    }

    /// Sets the taxonomy of a term select.
    #[must_use]
    pub fn taxonomy(mut self, taxonomy: impl Into<String>) -> Self {
        self.taxonomy = Some(taxonomy.into());
        self
    }

    /// Adds a child element under `key`.
    #[must_use]
    pub fn child(mut self, key: impl Into<String>, element: Element) -> Self {
        self.children.insert(key.into(), element);
        self
    }
}

/// String form of a scalar value; `None` for null, arrays and objects.
///
/// Booleans follow form-post conventions: `true` is `"1"`, `false` is `""`.
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Truthiness of a posted value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
