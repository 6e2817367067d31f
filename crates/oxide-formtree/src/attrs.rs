//! Insertion-ordered HTML attribute maps.

use indexmap::IndexMap;

/// Attributes applied to a rendered tag.
///
/// Attributes render in insertion order, so the same schema always produces
/// byte-identical markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs {
    attrs: IndexMap<String, String>,
}

impl Attrs {
    /// Creates new empty attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute, keeping its original position when it already exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    /// Sets an attribute only when it is not already present.
    pub fn set_default(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.entry(key.into()).or_insert_with(|| value.into());
    }

    /// Gets an attribute.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Returns whether an attribute is present.
    pub fn contains(&self, key: &str) -> bool {
        self.attrs.contains_key(key)
    }

    /// Removes an attribute, preserving the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.attrs.shift_remove(key)
    }

    /// Appends a suffix to an existing attribute value.
    pub fn append(&mut self, key: &str, suffix: &str) {
        if let Some(value) = self.attrs.get_mut(key) {
            value.push_str(suffix);
        }
    }

    /// Returns whether there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Iterates over attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Builder method to set an attribute.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (k, v) in iter {
            attrs.set(k, v);
        }
        attrs
    }
}
