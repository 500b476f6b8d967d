//! Error types for konwert

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::format::Format;

/// Position in a source document
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }

    /// Derive a 1-based line/column from a byte offset into `input`.
    ///
    /// Offsets past the end are clamped to the input length.
    pub fn from_offset(input: &[u8], offset: usize) -> Self {
        let offset = offset.min(input.len());
        let mut line: u32 = 1;
        let mut col: u32 = 1;
        for byte in input.iter().take(offset) {
            if *byte == b'\n' {
                line = line.saturating_add(1);
                col = 1;
            } else if *byte & 0xC0 != 0x80 {
                // count chars, not UTF-8 continuation bytes
                col = col.saturating_add(1);
            }
        }
        Self { offset, line, col }
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The referenced path is not an existing regular file
    NotFound { path: PathBuf },
    /// The file extension is not one of the recognized ones
    UnsupportedFormat { extension: String },
    /// The content does not parse under the format's grammar
    Parse { format: Format },
    /// The file exists but could not be read
    Read,
    /// Serialization or the filesystem write failed
    Write,
    /// A mapping key or attribute name cannot be used as an XML name
    InvalidTagName { name: String },
    /// The document shape has no defined translation to the target format
    UnspecifiedConversion,
    MaxDepthExceeded { max: u16 },
    MaxSizeExceeded { max: usize },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "file '{}' does not exist", path.display()),
            Self::UnsupportedFormat { extension } if extension.is_empty() => {
                write!(f, "unsupported file type (no extension)")
            }
            Self::UnsupportedFormat { extension } => {
                write!(f, "unsupported file type '.{extension}'")
            }
            Self::Parse { format } => write!(f, "invalid {format} document"),
            Self::Read => write!(f, "failed to read input"),
            Self::Write => write!(f, "failed to write output"),
            Self::InvalidTagName { name } => write!(f, "'{name}' is not a valid XML name"),
            Self::UnspecifiedConversion => write!(f, "no defined conversion for this document"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max} bytes"),
        }
    }
}

/// Main error type for konwert
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    pos: Option<Pos>,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            pos: None,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            pos: None,
            message: message.into(),
        }
    }

    /// Attach a source position
    #[must_use]
    pub fn at(mut self, pos: Pos) -> Self {
        self.pos = Some(pos);
        self
    }

    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(ErrorKind::NotFound { path: path.into() })
    }

    pub fn unsupported(extension: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedFormat {
            extension: extension.into(),
        })
    }

    /// Parse failure carrying the underlying parser's diagnostic
    pub fn parse(format: Format, detail: impl fmt::Display) -> Self {
        Self::with_message(
            ErrorKind::Parse { format },
            format!("invalid {format} document: {detail}"),
        )
    }

    pub fn write(detail: impl fmt::Display) -> Self {
        Self::with_message(ErrorKind::Write, format!("failed to write output: {detail}"))
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn pos(&self) -> Option<Pos> {
        self.pos
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result type alias for konwert
pub type Result<T> = std::result::Result<T, Error>;
