//! Error types for xmlmap

use std::fmt;
use thiserror::Error;

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A delimiter never appeared before the input ran out
    UnterminatedToken { delimiter: String },
    /// A closing tag that does not match any open element
    UnexpectedTag { tag: String },
    /// The stream was read past its end
    OutOfInput,
    /// A document could not be loaded from disk
    Io { path: String },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedToken { delimiter } => {
                write!(f, "unterminated token: no closing `{delimiter}`")
            }
            Self::UnexpectedTag { tag } => write!(f, "unexpected closing tag `{tag}`"),
            Self::OutOfInput => write!(f, "out of input"),
            Self::Io { path } => write!(f, "cannot read `{path}`"),
        }
    }
}

/// Main error type for xmlmap
///
/// Carries the error kind, the 1-based line number in the source where the
/// failure was detected (0 when no source position applies, e.g. I/O), and
/// a human-readable message.
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    line: u32,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, line: u32) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            line,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, line: u32, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// 1-based source line, 0 when the error has no source position
    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.message)
        } else {
            write!(f, "line {}: {}", self.line, self.message)
        }
    }
}

/// Result type alias for xmlmap
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::new(ErrorKind::OutOfInput, 3);
        assert_eq!(err.kind(), &ErrorKind::OutOfInput);
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn test_error_display_with_line() {
        let err = Error::new(
            ErrorKind::UnexpectedTag {
                tag: "b".to_string(),
            },
            7,
        );
        let display = err.to_string();
        assert!(display.contains("line 7"));
        assert!(display.contains("unexpected closing tag"));
    }

    #[test]
    fn test_error_display_without_line() {
        let err = Error::with_message(
            ErrorKind::Io {
                path: "missing.xml".to_string(),
            },
            0,
            "cannot read `missing.xml`",
        );
        assert_eq!(err.to_string(), "cannot read `missing.xml`");
    }

    #[test]
    fn test_unterminated_token_display() {
        let err = Error::new(
            ErrorKind::UnterminatedToken {
                delimiter: "-->".to_string(),
            },
            1,
        );
        assert!(err.to_string().contains("no closing `-->`"));
    }
}
