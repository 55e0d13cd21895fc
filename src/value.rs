//! Tree model for converted XML documents

use indexmap::map::{IntoIter, Iter, IterMut, Keys, Values};
use indexmap::IndexMap;
use std::ops::Index;

/// Reserved key holding the comments attached to a node map
pub const COMMENT_KEY: &str = "#comment";

/// Prefix distinguishing attribute keys from tag keys in a node map
pub const ATTRIBUTE_PREFIX: char = '@';

/// One parsed XML value
///
/// An element's content is exactly one of these variants; attribute values
/// are `Text` (quoted) or `Bool(true)` (bare attribute name).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// A self-closing element with no content (serializes as `<tag />`)
    #[default]
    Empty,
    /// A bare attribute without `=value`
    Bool(bool),
    /// Element body text; the empty string is valid and distinct from `Empty`
    Text(String),
    /// Repeated sibling occurrences, one node map per occurrence
    Sequence(Sequence),
    /// An element with children, attributes, or comments
    Element(Element),
}

impl Value {
    /// Returns true if this value is an empty element
    pub fn is_empty_element(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns true if this value is a boolean
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    /// Returns true if this value is body text
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Returns true if this value is a sequence of occurrences
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    /// Returns true if this value is an element map
    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element(_))
    }

    /// Returns the boolean if this is a boolean, None otherwise
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the body text if this is text, None otherwise
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the sequence if this is a sequence, None otherwise
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Self::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// Returns the element map if this is an element, None otherwise
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(map) => Some(map),
            _ => None,
        }
    }

    /// Returns a mutable reference to the sequence if this is a sequence
    pub fn as_sequence_mut(&mut self) -> Option<&mut Sequence> {
        match self {
            Self::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// Returns a mutable reference to the element map if this is an element
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(map) => Some(map),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<Sequence> for Value {
    fn from(value: Sequence) -> Self {
        Self::Sequence(value)
    }
}

impl From<Element> for Value {
    fn from(value: Element) -> Self {
        Self::Element(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Self::Sequence(Sequence(values))
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self::Element(Element(map))
    }
}

/// An order-preserving element map (tag, attribute, and comment keys)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element(pub(crate) IndexMap<String, Value>);

impl Element {
    /// Creates a new empty element map
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Creates a new element map with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    /// Returns the number of entries in the map
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the map contains no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a reference to the value for the key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the value for the key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    /// Inserts an entry, returning the previous value if the key existed
    ///
    /// An existing key keeps its position, so entry order is stable under
    /// overwrites.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes a key, preserving the order of the remaining entries
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    /// Returns true if the map contains the key
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns an iterator over the keys
    pub fn keys(&self) -> Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values
    pub fn values(&self) -> Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over key-value pairs in insertion order
    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Returns an iterator that allows modifying each value
    pub fn iter_mut(&mut self) -> IterMut<'_, String, Value> {
        self.0.iter_mut()
    }

    /// Clears the map
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl Index<&str> for Element {
    type Output = Value;

    #[allow(clippy::indexing_slicing)]
    fn index(&self, key: &str) -> &Self::Output {
        &self.0[key]
    }
}

impl<'a> IntoIterator for &'a Element {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Element {
    type Item = (String, Value);
    type IntoIter = IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<IndexMap<String, Value>> for Element {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Element {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(IndexMap::from_iter(iter))
    }
}

/// A list of per-occurrence node maps for repeated siblings
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sequence(pub(crate) Vec<Value>);

impl Sequence {
    /// Creates a new empty sequence
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns the number of occurrences
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the sequence contains no occurrences
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a reference to the occurrence at the given index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Returns a mutable reference to the occurrence at the given index
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.0.get_mut(index)
    }

    /// Returns a mutable reference to the last occurrence
    pub fn last_mut(&mut self) -> Option<&mut Value> {
        self.0.last_mut()
    }

    /// Appends an occurrence
    pub fn push(&mut self, value: impl Into<Value>) {
        self.0.push(value.into());
    }

    /// Returns an iterator over the occurrences
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    /// Returns an iterator that allows modifying each occurrence
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Value> {
        self.0.iter_mut()
    }
}

impl Index<usize> for Sequence {
    type Output = Value;

    #[allow(clippy::indexing_slicing)]
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Sequence {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<Vec<Value>> for Sequence {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl FromIterator<Value> for Sequence {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(Vec::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_is_methods() {
        assert!(Value::Empty.is_empty_element());
        assert!(!Value::Empty.is_text());
        assert!(Value::Bool(true).is_bool());
        assert!(Value::Text("x".to_string()).is_text());
        assert!(Value::Sequence(Sequence::new()).is_sequence());
        assert!(Value::Element(Element::new()).is_element());
    }

    #[test]
    fn test_value_as_methods() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Empty.as_bool(), None);
        assert_eq!(Value::Text("0".to_string()).as_text(), Some("0"));
        assert_eq!(Value::Empty.as_text(), None);
        assert!(Value::Element(Element::new()).as_element().is_some());
        assert!(Value::Sequence(Sequence::new()).as_sequence().is_some());
    }

    #[test]
    fn test_value_from_impls() {
        let v: Value = "hello".into();
        assert!(matches!(v, Value::Text(s) if s == "hello"));

        let v: Value = true.into();
        assert!(matches!(v, Value::Bool(true)));

        let v: Value = vec![Value::Empty, Value::Empty].into();
        assert!(matches!(v, Value::Sequence(seq) if seq.len() == 2));

        let v: Value = Element::new().into();
        assert!(matches!(v, Value::Element(_)));
    }

    #[test]
    fn test_default_is_empty() {
        assert_eq!(Value::default(), Value::Empty);
        assert_eq!(std::mem::take(&mut Value::Text("x".into())), Value::Text("x".into()));
    }

    #[test]
    fn test_element_basics() {
        let mut map = Element::new();
        assert!(map.is_empty());

        map.insert("node", "foo");
        map.insert("@lang", "en");
        assert_eq!(map.len(), 2);
        assert!(map.contains_key("@lang"));
        assert_eq!(map.get("node"), Some(&Value::Text("foo".to_string())));
        assert_eq!(map.get("missing"), None);

        let removed = map.remove("node");
        assert_eq!(removed, Some(Value::Text("foo".to_string())));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_element_order_preservation() {
        let mut map = Element::new();
        map.insert("first", "1");
        map.insert("@attr", "2");
        map.insert("third", "3");

        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["first", "@attr", "third"]);

        // overwriting keeps the original position
        map.insert("first", "changed");
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["first", "@attr", "third"]);
    }

    #[test]
    fn test_element_remove_keeps_order() {
        let mut map = Element::new();
        map.insert("a", "1");
        map.insert("b", "2");
        map.insert("c", "3");
        map.remove("a");

        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn test_element_index_and_iter() {
        let mut map = Element::new();
        map.insert("name", "Waffles");
        assert_eq!(map["name"], Value::Text("Waffles".to_string()));

        let collected: Element = map.clone().into_iter().collect();
        assert_eq!(collected, map);
    }

    #[test]
    fn test_sequence_basics() {
        let mut seq = Sequence::new();
        assert!(seq.is_empty());

        seq.push(Element::new());
        seq.push(Element::new());
        assert_eq!(seq.len(), 2);
        assert!(seq.get(0).is_some());
        assert!(seq.get(2).is_none());
        assert!(seq.last_mut().is_some());
    }

    #[test]
    fn test_sequence_iter() {
        let seq: Sequence = vec![Value::Text("a".into()), Value::Text("b".into())].into();
        let texts: Vec<_> = seq.iter().filter_map(Value::as_text).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }
}
