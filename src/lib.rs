//! xmlmap - Convert XML documents to an ordered map model and back
//!
//! Parses configuration-style XML (manifests, language files, templates)
//! into an ordered nested-map tree that application code can index,
//! mutate, and re-serialize, without pulling in a full DOM/schema stack.
//!
//! # Quick Start
//!
//! ```
//! use xmlmap::{from_str, Value};
//! # fn main() -> Result<(), xmlmap::Error> {
//! let doc = from_str("<greeting><word lang=\"en\">hello</word></greeting>")?;
//! let word = doc
//!     .get("greeting")
//!     .and_then(Value::as_element)
//!     .and_then(|greeting| greeting.get("word"))
//!     .and_then(Value::as_text)
//!     .unwrap_or_default();
//! assert_eq!(word, "hello");
//! # Ok(())
//! # }
//! ```
//!
//! Attributes live next to their tag under `@`-prefixed keys, comments
//! under the reserved `#comment` key, and repeated siblings become a
//! sequence of per-occurrence maps. `Display` on [`Converter`] renders the
//! tree back to indented XML.

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Result};

pub mod stream;
pub use stream::Stream;

pub mod value;
pub use value::{Element, Sequence, Value, ATTRIBUTE_PREFIX, COMMENT_KEY};

pub mod parser;
pub use parser::{Document, Parser};

pub mod formatter;
pub use formatter::{format_document, format_element, DEFAULT_DECLARATION};

pub mod converter;
pub use converter::Converter;

/// Parse XML text into a converter
pub fn from_str(input: &str) -> Result<Converter> {
    Converter::from_xml(input)
}

/// Load and parse an XML file into a converter
pub fn from_path(path: &str) -> Result<Converter> {
    Converter::from_path(path)
}
