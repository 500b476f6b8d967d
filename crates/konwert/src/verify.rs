//! Syntax-only validation of files

use std::path::Path;

use tracing::{debug, instrument, warn};

use crate::convert::{parse_document, ConvertOptions, Document};
use crate::error::Result;
use crate::file::read_existing;
use crate::format::Format;

/// Read and parse `path` as `format`.
///
/// A path that is not an existing regular file fails with `NotFound` before
/// anything is opened.
pub fn load(path: &Path, format: Format, options: &ConvertOptions) -> Result<Document> {
    let input = read_existing(path)?;
    debug!(path = %path.display(), %format, bytes = input.len(), "parsing");
    parse_document(&input, format, options)
}

/// Check that `path` holds a well-formed `format` document
pub fn verify_file(path: impl AsRef<Path>, format: Format) -> Result<()> {
    verify_file_with_options(path, format, &ConvertOptions::default())
}

#[instrument(skip_all, fields(path = %path.as_ref().display(), %format))]
pub fn verify_file_with_options(
    path: impl AsRef<Path>,
    format: Format,
    options: &ConvertOptions,
) -> Result<()> {
    match load(path.as_ref(), format, options) {
        Ok(_) => {
            debug!("document is valid");
            Ok(())
        }
        Err(err) => {
            warn!(error = %err, "verification failed");
            Err(err)
        }
    }
}

pub fn verify_json(path: impl AsRef<Path>) -> bool {
    verify_file(path, Format::Json).is_ok()
}

pub fn verify_yaml(path: impl AsRef<Path>) -> bool {
    verify_file(path, Format::Yaml).is_ok()
}

pub fn verify_xml(path: impl AsRef<Path>) -> bool {
    verify_file(path, Format::Xml).is_ok()
}
