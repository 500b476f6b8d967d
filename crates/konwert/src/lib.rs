//! konwert - validate and convert JSON, YAML and XML documents
//!
//! JSON and YAML parse into a [`Value`] tree, XML into an [`XmlElement`] tree.
//! The [`bridge`] module translates between the two when a conversion crosses
//! that line.
//!
//! # Quick Start
//!
//! ```
//! use konwert::{convert, Format};
//! # fn main() -> Result<(), konwert::Error> {
//! let xml = convert(r#"{"a": 1, "b": [2, 3]}"#, Format::Json, Format::Xml)?;
//! assert_eq!(xml, "<root><a>1</a><b><item>2</item><item>3</item></b></root>\n");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result};

pub mod config;
pub use config::Limits;

pub mod format;
pub use format::{detect_format_from_path, Format};

pub mod value;
pub use value::{Array, Number, Object, Value};

pub mod json;
pub mod xml;
pub mod yaml;
pub use xml::{Element as XmlElement, Parser as XmlParser};

pub mod bridge;
pub use bridge::{element_to_value, value_to_element, xml_to_value};

pub mod file;

pub mod convert;
pub use convert::{
    convert, convert_file, convert_with_options, ConversionReport, ConversionRequest,
    ConvertOptions, Document, XmlSourcePolicy,
};

pub mod verify;
pub use verify::{verify_file, verify_json, verify_xml, verify_yaml};

/// Parse JSON from string
pub fn from_str(s: &str) -> Result<Value> {
    json::parse(s.as_bytes(), &json::Config::default())
}

/// Parse YAML from string
pub fn from_yaml_str(s: &str) -> Result<Value> {
    yaml::parse(s.as_bytes(), &yaml::Config::default())
}

/// Parse XML from string
pub fn from_xml_str(s: &str) -> Result<XmlElement> {
    xml::parse(s.as_bytes(), &xml::Config::default())
}
