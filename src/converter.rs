//! Facade tying parser, tree model, and serializer together

use std::fmt;

use tracing::{debug, instrument};

use crate::error::{Error, ErrorKind, Result};
use crate::formatter::format_document;
use crate::parser::Parser;
use crate::value::{Element, Value};

/// An XML document held as an ordered map, convertible back to text
///
/// The converter owns the tree; it never validates or re-parses the map
/// between mutations, only when serialization is requested.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Converter {
    xml: String,
    data: Element,
    declaration: Option<String>,
    doctype: Option<String>,
}

impl Converter {
    /// Build a converter from XML text
    ///
    /// Parses when the trimmed input starts with `<`; any other input is
    /// held verbatim with an empty map, leaving the caller free to decide
    /// what the text was supposed to be.
    pub fn from_xml(input: &str) -> Result<Self> {
        if !input.trim_start().starts_with('<') {
            return Ok(Self {
                xml: input.to_string(),
                ..Self::default()
            });
        }
        let document = Parser::new(input).parse()?;
        Ok(Self {
            xml: input.to_string(),
            data: document.data,
            declaration: document.declaration,
            doctype: document.doctype,
        })
    }

    /// Build a converter around an already constructed map; no parsing
    pub fn from_map(data: Element) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Load and parse an XML document from a file
    #[instrument]
    pub fn from_path(path: &str) -> Result<Self> {
        debug!("loading xml document");
        let content = std::fs::read_to_string(path).map_err(|err| {
            Error::with_message(
                ErrorKind::Io {
                    path: path.to_string(),
                },
                0,
                format!("cannot read `{path}`: {err}"),
            )
        })?;
        Self::from_xml(&content)
    }

    /// The whole tree
    pub fn data(&self) -> &Element {
        &self.data
    }

    /// Mutable access to the whole tree
    pub fn data_mut(&mut self) -> &mut Element {
        &mut self.data
    }

    /// The raw input text the converter was built from (empty when it was
    /// built from a map)
    pub fn xml(&self) -> &str {
        &self.xml
    }

    /// The captured `<?...?>` declaration content, verbatim
    pub fn declaration(&self) -> Option<&str> {
        self.declaration.as_deref()
    }

    /// The captured doctype text
    pub fn doctype(&self) -> Option<&str> {
        self.doctype.as_deref()
    }

    /// XML version from the declaration, defaulting to `1.0`
    pub fn version(&self) -> String {
        self.declaration_field("version")
            .unwrap_or_else(|| "1.0".to_string())
    }

    /// Document encoding from the declaration, defaulting to `utf-8`
    pub fn encoding(&self) -> String {
        self.declaration_field("encoding")
            .unwrap_or_else(|| "utf-8".to_string())
    }

    /// Value for a top-level key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Mutable value for a top-level key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.data.get_mut(key)
    }

    /// Insert or overwrite a top-level entry; an existing key keeps its
    /// position
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.data.insert(key, value)
    }

    /// Remove a top-level entry, preserving the order of the rest
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    /// True if a top-level entry exists for the key
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Number of top-level entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the top-level map is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate top-level entries in insertion order
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.data.iter()
    }

    /// Serialize the held tree, including the declaration line
    pub fn to_xml(&self) -> String {
        format_document(&self.data, self.declaration.as_deref())
    }

    fn declaration_field(&self, field: &str) -> Option<String> {
        let declaration = self.declaration.as_deref()?;
        let marker = format!("{field}=\"");
        let start = declaration.find(&marker)? + marker.len();
        let rest = &declaration[start..];
        let end = rest.find('"')?;
        Some(rest[..end].to_string())
    }
}

impl fmt::Display for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml())
    }
}

impl From<Element> for Converter {
    fn from(data: Element) -> Self {
        Self::from_map(data)
    }
}

impl<'a> IntoIterator for &'a Converter {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
