//! Format detection from file extensions

use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

/// Document formats konwert can read and write
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Yaml,
    Xml,
}

impl Format {
    /// All supported formats
    pub const ALL: [Self; 3] = [Self::Json, Self::Yaml, Self::Xml];

    /// Extensions (lower-case, without the dot) recognized for this format
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Json => &["json"],
            Self::Yaml => &["yml", "yaml"],
            Self::Xml => &["xml"],
        }
    }

    /// Detect the format of `path`, failing with `UnsupportedFormat`
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        detect_format_from_path(path).ok_or_else(|| Error::unsupported(extension_of(path)))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
            Self::Xml => "XML",
        };
        f.write_str(name)
    }
}

/// Detect format from a path's extension, case-insensitively.
///
/// Pure function of the path; the filesystem is never touched.
pub fn detect_format_from_path(path: impl AsRef<Path>) -> Option<Format> {
    let ext = extension_of(path.as_ref());
    Format::ALL
        .into_iter()
        .find(|format| format.extensions().contains(&ext.as_str()))
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
