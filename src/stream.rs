//! Character stream over the unconsumed tail of an XML source

use crate::error::{Error, ErrorKind, Result};

/// Cursor over the remaining source text with 1-based line tracking
///
/// The cursor only ever moves forward; `pos` stays on a char boundary.
#[derive(Clone, Debug)]
pub struct Stream<'a> {
    input: &'a str,
    pos: usize,
    line: u32,
}

impl<'a> Stream<'a> {
    /// Create a stream over the given source text
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
        }
    }

    /// True iff the unconsumed text starts with `literal`. Does not consume.
    pub fn matches(&self, literal: &str) -> bool {
        self.remaining().starts_with(literal)
    }

    /// Case-folded variant of [`matches`](Self::matches) for ASCII literals
    pub fn matches_ignore_ascii_case(&self, literal: &str) -> bool {
        self.remaining()
            .as_bytes()
            .get(..literal.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(literal.as_bytes()))
    }

    /// The next unconsumed character without consuming it
    pub fn current(&self) -> Result<char> {
        self.remaining()
            .chars()
            .next()
            .ok_or_else(|| Error::new(ErrorKind::OutOfInput, self.line))
    }

    /// Consume and return `n` characters (fewer if fewer remain)
    pub fn advance(&mut self, n: usize) -> &'a str {
        let rest = self.remaining();
        let end = rest
            .char_indices()
            .nth(n)
            .map_or(rest.len(), |(idx, _)| idx);
        let consumed = &rest[..end];
        self.count_lines(consumed);
        self.pos += end;
        consumed
    }

    /// Consume and return everything up to (not including) `delimiter`
    ///
    /// Fails with `UnterminatedToken` when the delimiter never appears
    /// before the input is exhausted; nothing is consumed in that case.
    pub fn read_to(&mut self, delimiter: char) -> Result<&'a str> {
        let rest = self.remaining();
        let end = rest.find(delimiter).ok_or_else(|| {
            Error::new(
                ErrorKind::UnterminatedToken {
                    delimiter: delimiter.to_string(),
                },
                self.line,
            )
        })?;
        let consumed = &rest[..end];
        self.count_lines(consumed);
        self.pos += end;
        Ok(consumed)
    }

    /// True when no unconsumed text remains
    pub const fn is_empty(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// 1-based line number at the current consumption point
    pub const fn line(&self) -> u32 {
        self.line
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn count_lines(&mut self, consumed: &str) {
        for byte in consumed.bytes() {
            if byte == b'\n' {
                self.line += 1;
            }
        }
    }
}
