//! Element Attributes
//!
//! Ordered attribute store: iteration and serialization follow insertion
//! order, lookups go through a name → position index.

use std::collections::HashMap;

use hnode_html::escape::needs_escaping;

use crate::{DomError, DomResult};

/// Single attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Ordered attribute collection
#[derive(Debug, Clone, Default)]
pub struct AttributeStore {
    attributes: Vec<Attr>,
    by_name: HashMap<String, usize>,
}

/// Reject names that would corrupt serialized markup
pub(crate) fn validate_name(name: &str) -> DomResult<()> {
    if name.is_empty() || needs_escaping(name) {
        return Err(DomError::InvalidAttributeName(name.to_string()));
    }
    Ok(())
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Get attribute value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(name)
            .and_then(|&i| self.attributes.get(i))
            .map(|a| a.value.as_str())
    }

    /// Position of `name` in iteration order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Set attribute, returning its position
    ///
    /// An existing name keeps its position; a new name is appended.
    pub fn set(&mut self, name: &str, value: &str) -> DomResult<usize> {
        if let Some(&index) = self.by_name.get(name) {
            self.attributes[index].value = value.to_string();
            return Ok(index);
        }

        validate_name(name)?;
        let index = self.attributes.len();
        self.by_name.insert(name.to_string(), index);
        self.attributes.push(Attr::new(name, value));
        Ok(index)
    }

    /// Remove attribute by name, returning its former position and value
    pub fn remove(&mut self, name: &str) -> Option<(usize, String)> {
        let index = self.by_name.remove(name)?;
        // Update indices for items after removed
        for idx in self.by_name.values_mut() {
            if *idx > index {
                *idx -= 1;
            }
        }
        Some((index, self.attributes.remove(index).value))
    }

    /// Check if attribute exists
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Get attribute names
    pub fn names(&self) -> Vec<&str> {
        self.attributes.iter().map(|a| a.name.as_str()).collect()
    }

    /// Iterate over attributes
    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.attributes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every name must be found at the position it iterates at
    fn assert_consistent(attrs: &AttributeStore) {
        for (i, attr) in attrs.iter().enumerate() {
            assert_eq!(attrs.position(&attr.name), Some(i), "stale index for {}", attr.name);
            assert_eq!(attrs.get(&attr.name), Some(attr.value.as_str()));
        }
        assert_eq!(attrs.by_name.len(), attrs.len());
    }

    #[test]
    fn test_set_get_attribute() {
        let mut attrs = AttributeStore::new();
        attrs.set("class", "btn").unwrap();
        attrs.set("id", "submit").unwrap();

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("class"), Some("btn"));
        assert_eq!(attrs.get("id"), Some("submit"));
        assert_eq!(attrs.get("missing"), None);
    }

    #[test]
    fn test_set_existing_keeps_order() {
        let mut attrs = AttributeStore::new();
        attrs.set("a", "1").unwrap();
        attrs.set("b", "2").unwrap();
        assert_eq!(attrs.set("a", "3").unwrap(), 0);

        assert_eq!(attrs.names(), vec!["a", "b"]);
        assert_eq!(attrs.get("a"), Some("3"));
    }

    #[test]
    fn test_remove_attribute() {
        let mut attrs = AttributeStore::new();
        attrs.set("foo", "bar").unwrap();

        assert!(attrs.contains("foo"));
        assert_eq!(attrs.remove("foo"), Some((0, "bar".to_string())));
        assert!(!attrs.contains("foo"));
        assert_eq!(attrs.remove("foo"), None);
    }

    #[test]
    fn test_interleaved_set_remove_keeps_indices() {
        let mut attrs = AttributeStore::new();
        for name in ["a", "b", "c", "d", "e"] {
            attrs.set(name, name).unwrap();
        }
        attrs.remove("b");
        assert_consistent(&attrs);
        attrs.set("f", "f").unwrap();
        attrs.remove("a");
        assert_consistent(&attrs);
        attrs.set("c", "C").unwrap();
        attrs.remove("e");
        attrs.set("b", "b").unwrap();
        assert_consistent(&attrs);

        assert_eq!(attrs.names(), vec!["c", "d", "f", "b"]);
        assert_eq!(attrs.get("c"), Some("C"));
    }

    #[test]
    fn test_invalid_names_rejected() {
        let mut attrs = AttributeStore::new();
        assert!(matches!(
            attrs.set("data>yo", "value"),
            Err(DomError::InvalidAttributeName(name)) if name == "data>yo"
        ));
        assert!(attrs.set("", "value").is_err());
        assert!(attrs.set("a\"b", "value").is_err());
        assert!(attrs.is_empty());
    }
}
