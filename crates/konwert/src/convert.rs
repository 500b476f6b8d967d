//! Format conversion: detect, parse, bridge, serialize, write

use std::path::PathBuf;

use tracing::{debug, info, instrument, warn};

use crate::bridge::{value_to_element, xml_to_value, DEFAULT_ROOT_TAG};
use crate::error::{Error, ErrorKind, Result};
use crate::file::write_atomic;
use crate::format::Format;
use crate::value::Value;
use crate::xml::Element;
use crate::{json, verify, xml, yaml};

/// What to do when an XML document has to become JSON or YAML
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum XmlSourcePolicy {
    /// Map elements to mappings (see [`crate::bridge::element_to_value`])
    #[default]
    Structured,
    /// Refuse with `UnspecifiedConversion`
    Reject,
}

/// Conversion options per format
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvertOptions {
    pub json: json::Config,
    pub yaml: yaml::Config,
    pub xml: xml::Config,
    /// Tag of the root element when a value is written as XML
    pub root_tag: String,
    pub xml_source: XmlSourcePolicy,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            json: json::Config::default(),
            yaml: yaml::Config::default(),
            xml: xml::Config::default(),
            root_tag: DEFAULT_ROOT_TAG.to_string(),
            xml_source: XmlSourcePolicy::default(),
        }
    }
}

/// A parsed document in its native tree
#[derive(Clone, Debug, PartialEq)]
pub enum Document {
    Value(Value),
    Element(Element),
}

/// Parse `input` as `format`
pub fn parse_document(input: &[u8], format: Format, options: &ConvertOptions) -> Result<Document> {
    match format {
        Format::Json => json::parse(input, &options.json).map(Document::Value),
        Format::Yaml => yaml::parse(input, &options.yaml).map(Document::Value),
        Format::Xml => xml::parse(input, &options.xml).map(Document::Element),
    }
}

/// Reshape a document into the tree `target` is serialized from
pub fn into_target(
    document: Document,
    target: Format,
    options: &ConvertOptions,
) -> Result<Document> {
    match (document, target) {
        (Document::Element(root), Format::Xml) => Ok(Document::Element(root)),
        (Document::Value(value), Format::Xml) => {
            value_to_element(&value, &options.root_tag).map(Document::Element)
        }
        (Document::Value(value), _) => Ok(Document::Value(value)),
        (Document::Element(root), _) => match options.xml_source {
            XmlSourcePolicy::Structured => Ok(Document::Value(xml_to_value(&root))),
            XmlSourcePolicy::Reject => Err(Error::with_message(
                ErrorKind::UnspecifiedConversion,
                format!("converting XML to {target} is disabled"),
            )),
        },
    }
}

/// Serialize a document that already has the shape `format` expects
pub fn serialize_document(
    document: &Document,
    format: Format,
    options: &ConvertOptions,
) -> Result<String> {
    match (document, format) {
        (Document::Value(value), Format::Json) => json::to_string(value, &options.json),
        (Document::Value(value), Format::Yaml) => yaml::to_string(value),
        (Document::Element(root), Format::Xml) => xml::to_string(root, &options.xml),
        (Document::Element(_), _) | (Document::Value(_), Format::Xml) => {
            Err(Error::with_message(
                ErrorKind::UnspecifiedConversion,
                format!("document must be reshaped before it can be written as {format}"),
            ))
        }
    }
}

/// Convert between supported formats
pub fn convert(input: &str, from: Format, to: Format) -> Result<String> {
    convert_with_options(input, from, to, &ConvertOptions::default())
}

/// Convert between supported formats with options.
///
/// Converting to the same format still parses and re-serializes the input.
pub fn convert_with_options(
    input: &str,
    from: Format,
    to: Format,
    options: &ConvertOptions,
) -> Result<String> {
    let document = parse_document(input.as_bytes(), from, options)?;
    let document = into_target(document, to, options)?;
    serialize_document(&document, to, options)
}

/// A single file conversion: formats come from the path extensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub options: ConvertOptions,
}

impl ConversionRequest {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            options: ConvertOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }
}

/// Outcome of a successful [`convert_file`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConversionReport {
    pub from: Format,
    pub to: Format,
    pub bytes_written: usize,
}

/// Convert `request.input` into `request.output`.
///
/// Nothing is written unless every step succeeds, and the output is replaced
/// atomically.
#[instrument(
    skip_all,
    fields(input = %request.input.display(), output = %request.output.display())
)]
pub fn convert_file(request: &ConversionRequest) -> Result<ConversionReport> {
    let result = run(request);
    match &result {
        Ok(report) => info!(
            from = %report.from,
            to = %report.to,
            bytes = report.bytes_written,
            "conversion complete"
        ),
        Err(err) => warn!(error = %err, "conversion failed"),
    }
    result
}

fn run(request: &ConversionRequest) -> Result<ConversionReport> {
    let from = Format::from_path(&request.input)?;
    let to = Format::from_path(&request.output)?;
    debug!(%from, %to, "formats detected");

    let document = verify::load(&request.input, from, &request.options)?;
    let document = into_target(document, to, &request.options)?;
    let output = serialize_document(&document, to, &request.options)?;

    write_atomic(&request.output, output.as_bytes())?;
    Ok(ConversionReport {
        from,
        to,
        bytes_written: output.len(),
    })
}
