//! Single-pass XML parser building the ordered tree model

use tracing::{debug, trace, warn};

use crate::error::{Error, ErrorKind, Result};
use crate::stream::Stream;
use crate::value::{Element, Sequence, Value, COMMENT_KEY};

/// A parsed XML document
///
/// The declaration (content of the leading `<?...?>` instruction) and the
/// doctype text are document-level scalars; they are not part of the tree.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Document {
    pub declaration: Option<String>,
    pub doctype: Option<String>,
    pub data: Element,
}

/// One open element awaiting its closing tag
///
/// `content` is the slot the element's resolved value is written into on
/// close: an empty map until the first child arrives, then the child's node
/// map, then a sequence of node maps once siblings repeat.
#[derive(Debug)]
struct Frame {
    tag: String,
    content: Value,
}

/// XML parser
///
/// Owns all in-progress state; [`parse`](Self::parse) consumes the parser,
/// so nothing survives beyond one pass.
#[derive(Debug)]
pub struct Parser<'a> {
    stream: Stream<'a>,
    root: Element,
    frames: Vec<Frame>,
    pending_text: String,
    pending_comments: Vec<String>,
    declaration: Option<String>,
    doctype: Option<String>,
}

impl<'a> Parser<'a> {
    /// Create a parser over the given source text (leading and trailing
    /// whitespace is ignored)
    pub fn new(input: &'a str) -> Self {
        Self {
            stream: Stream::new(input.trim()),
            root: Element::new(),
            frames: Vec::new(),
            pending_text: String::new(),
            pending_comments: Vec::new(),
            declaration: None,
            doctype: None,
        }
    }

    /// Parse the document
    ///
    /// One syntax error aborts the parse. Elements left open at the end of
    /// input are not an error; they unwind into their parents as empty maps.
    pub fn parse(mut self) -> Result<Document> {
        debug!("starting xml parse");

        while !self.stream.is_empty() {
            if self.stream.matches("<?") {
                self.read_declaration()?;
            } else if self.stream.matches("<!--") {
                self.read_comment()?;
            } else if self.stream.matches("<![CDATA[") {
                self.read_cdata()?;
            } else if self.stream.matches_ignore_ascii_case("<!doctype") {
                self.read_doctype()?;
            } else if self.stream.matches("</") {
                self.read_close_tag()?;
            } else if self.stream.matches("<") {
                self.read_open_tag()?;
            } else {
                self.pending_text = self.stream.read_to('<')?.to_string();
            }
        }

        while let Some(frame) = self.frames.pop() {
            self.store_in_parent(&frame.tag, frame.content);
        }

        debug!(entries = self.root.len(), "xml parse complete");
        Ok(Document {
            declaration: self.declaration,
            doctype: self.doctype,
            data: self.root,
        })
    }

    fn read_declaration(&mut self) -> Result<()> {
        self.stream.advance(2);
        let declaration = self.stream.read_to('?')?;
        self.stream.advance(2);
        self.declaration = Some(declaration.to_string());
        Ok(())
    }

    fn read_comment(&mut self) -> Result<()> {
        self.stream.advance(4);
        let body = self.read_until("-->")?;
        self.pending_comments.push(body.trim().to_string());
        Ok(())
    }

    fn read_cdata(&mut self) -> Result<()> {
        self.stream.advance(9);
        // raw passthrough: the body is never tokenized as markup
        self.pending_text = self.read_until("]]>")?;
        Ok(())
    }

    fn read_doctype(&mut self) -> Result<()> {
        self.stream.advance(9);
        let doctype = self.stream.read_to('>')?;
        self.stream.advance(1);
        self.doctype = Some(doctype.trim().to_string());
        Ok(())
    }

    fn read_close_tag(&mut self) -> Result<()> {
        self.stream.advance(2);
        let name = self.stream.read_to('>')?.trim_end().to_string();
        self.stream.advance(1);
        self.close_element(&name, false)
    }

    fn read_open_tag(&mut self) -> Result<()> {
        self.stream.advance(1);
        let element = self.stream.read_to('>')?;
        self.stream.advance(1);

        let (body, self_closing) = match element.strip_suffix('/') {
            Some(body) => (body, true),
            None => (element, false),
        };
        let body = body.trim();
        let (name, attribute_text) = match body.find(char::is_whitespace) {
            Some(split) => (&body[..split], &body[split..]),
            None => (body, ""),
        };
        trace!(tag = name, line = self.stream.line(), "open element");

        let mut node = Element::new();
        node.insert(name, Element::new());
        if !self.pending_comments.is_empty() {
            let comments: Sequence = self
                .pending_comments
                .drain(..)
                .map(Value::Text)
                .collect();
            node.insert(COMMENT_KEY, comments);
        }
        for (attribute, value) in self.parse_attributes(attribute_text)? {
            node.insert(format!("@{attribute}"), value);
        }

        self.open_element(name.to_string(), node)?;
        if self_closing {
            self.close_element(name, true)?;
        }
        Ok(())
    }

    /// Place a freshly opened element's node map into the current slot and
    /// push its frame
    fn open_element(&mut self, name: String, node: Element) -> Result<()> {
        match self.frames.last_mut() {
            None => {
                if !self.root.is_empty() {
                    warn!(tag = %name, "second root element");
                    return Err(Error::with_message(
                        ErrorKind::UnexpectedTag { tag: name },
                        self.stream.line(),
                        "document has more than one root element",
                    ));
                }
                self.root = node;
            }
            Some(frame) => {
                if let Value::Sequence(siblings) = &mut frame.content {
                    siblings.push(node);
                } else if frame.content.as_element().is_some_and(Element::is_empty) {
                    frame.content = Value::Element(node);
                } else {
                    // sibling promotion: a second direct child turns the
                    // slot into a sequence of per-occurrence node maps
                    let first = std::mem::take(&mut frame.content);
                    frame.content = Value::Sequence(Sequence::from(vec![first, node.into()]));
                }
            }
        }
        self.frames.push(Frame {
            tag: name,
            content: Value::Element(Element::new()),
        });
        Ok(())
    }

    /// Close the innermost open element, resolving its slot value
    fn close_element(&mut self, name: &str, self_closing: bool) -> Result<()> {
        let line = self.stream.line();
        trace!(tag = name, line, "close element");

        let Some(frame) = self.frames.pop() else {
            warn!(tag = name, line, "closing tag without open element");
            return Err(Error::new(
                ErrorKind::UnexpectedTag {
                    tag: name.to_string(),
                },
                line,
            ));
        };
        if frame.tag != name {
            warn!(open = %frame.tag, close = name, line, "mismatched closing tag");
            return Err(Error::with_message(
                ErrorKind::UnexpectedTag {
                    tag: name.to_string(),
                },
                line,
                format!("closing tag `{name}` does not match open element `{}`", frame.tag),
            ));
        }

        let resolved = match frame.content {
            Value::Element(map) if map.is_empty() => {
                let text = std::mem::take(&mut self.pending_text);
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    Value::Text(trimmed.to_string())
                } else if self_closing {
                    Value::Empty
                } else {
                    Value::Text(String::new())
                }
            }
            content => {
                self.pending_text.clear();
                content
            }
        };
        self.store_in_parent(name, resolved);
        Ok(())
    }

    /// Write a closed element's value into its entry in the parent node map
    fn store_in_parent(&mut self, tag: &str, value: Value) {
        let parent = match self.frames.last_mut() {
            None => Some(&mut self.root),
            Some(frame) => match &mut frame.content {
                Value::Element(map) => Some(map),
                Value::Sequence(siblings) => {
                    siblings.last_mut().and_then(Value::as_element_mut)
                }
                _ => None,
            },
        };
        // the entry exists by construction: open_element seeded it
        if let Some(slot) = parent.and_then(|map| map.get_mut(tag)) {
            *slot = value;
        }
    }

    /// Parse the attribute list of an open tag: repeated `name`,
    /// `name="value"`, `name='value'`, or `name=value` groups
    fn parse_attributes(&self, text: &str) -> Result<Vec<(String, Value)>> {
        let mut attributes = Vec::new();
        let mut rest = text.trim_start();

        while !rest.is_empty() {
            let name_end = rest
                .find(|c: char| c == '=' || c.is_whitespace())
                .unwrap_or(rest.len());
            let name = &rest[..name_end];
            if name.is_empty() {
                break;
            }
            rest = &rest[name_end..];

            if let Some(assigned) = rest.strip_prefix('=') {
                let (value, tail) = self.parse_attribute_value(assigned)?;
                attributes.push((name.to_string(), Value::Text(value.to_string())));
                rest = tail;
            } else {
                attributes.push((name.to_string(), Value::Bool(true)));
            }
            rest = rest.trim_start();
        }

        Ok(attributes)
    }

    /// Split one attribute value off the front of `text`, returning the
    /// value (quotes stripped, content unprocessed) and the remaining text
    fn parse_attribute_value<'t>(&self, text: &'t str) -> Result<(&'t str, &'t str)> {
        let mut chars = text.chars();
        match chars.next() {
            Some(quote @ ('"' | '\'')) => {
                let inner = chars.as_str();
                let end = inner.find(quote).ok_or_else(|| {
                    Error::new(
                        ErrorKind::UnterminatedToken {
                            delimiter: quote.to_string(),
                        },
                        self.stream.line(),
                    )
                })?;
                Ok((&inner[..end], &inner[end + quote.len_utf8()..]))
            }
            _ => {
                let end = text
                    .find(char::is_whitespace)
                    .unwrap_or(text.len());
                Ok((&text[..end], &text[end..]))
            }
        }
    }

    /// Consume through `terminator`, returning everything before it
    fn read_until(&mut self, terminator: &str) -> Result<String> {
        let mut body = String::new();
        while !self.stream.matches(terminator) {
            if self.stream.is_empty() {
                return Err(Error::new(
                    ErrorKind::UnterminatedToken {
                        delimiter: terminator.to_string(),
                    },
                    self.stream.line(),
                ));
            }
            body.push_str(self.stream.advance(1));
        }
        self.stream.advance(terminator.chars().count());
        Ok(body)
    }
}
