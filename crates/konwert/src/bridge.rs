//! Translation between the schema-less `Value` tree and the XML `Element` tree
//!
//! `Value -> Element`:
//! - mapping: one child per key, tagged with the key
//! - sequence: one `item` child per entry
//! - scalar: element text (`true`/`false`, numbers in decimal); null has no text
//!
//! `Element -> Value`:
//! - leaf without attributes: its text as a string, or null when it has none
//! - otherwise a mapping holding `@attributes`, `#text` and the children,
//!   where a repeated tag collects its values into a sequence
//!
//! The round trip is lossy: scalars come back as strings and sequences come
//! back as mappings of `item`.

use tracing::trace;

use crate::error::{Error, ErrorKind, Result};
use crate::value::{Array, Object, Value};
use crate::xml::{is_valid_name, Element};

/// Root tag used when a value has no natural name
pub const DEFAULT_ROOT_TAG: &str = "root";
/// Tag given to every sequence entry
pub const ITEM_TAG: &str = "item";
/// Mapping key holding element text next to attributes or children
pub const TEXT_KEY: &str = "#text";
/// Mapping key holding element attributes
pub const ATTRIBUTES_KEY: &str = "@attributes";

/// Returns true if `name` can be used as a tag for a mapping key.
///
/// Same as an XML name, minus `:` since namespaces are not supported.
pub fn is_valid_tag_name(name: &str) -> bool {
    is_valid_name(name) && !name.contains(':')
}

/// Build an element tree named `root_tag` from a value
pub fn value_to_element(value: &Value, root_tag: &str) -> Result<Element> {
    let mut root = Element::new(checked_name(root_tag)?);
    fill(&mut root, value)?;
    Ok(root)
}

fn fill(element: &mut Element, value: &Value) -> Result<()> {
    match value {
        Value::Object(obj) => {
            for (key, value) in obj {
                match key.as_str() {
                    TEXT_KEY => element.text = reserved_text(key, value)?,
                    ATTRIBUTES_KEY => fill_attributes(element, value)?,
                    _ => {
                        let mut child = Element::new(checked_name(key)?);
                        fill(&mut child, value)?;
                        element.children.push(child);
                    }
                }
            }
        }
        Value::Array(arr) => {
            for item in arr {
                let mut child = Element::new(ITEM_TAG);
                fill(&mut child, item)?;
                element.children.push(child);
            }
        }
        scalar => element.text = scalar.to_text(),
    }
    Ok(())
}

fn fill_attributes(element: &mut Element, value: &Value) -> Result<()> {
    let Value::Object(attrs) = value else {
        return Err(unspecified(format!(
            "'{ATTRIBUTES_KEY}' must hold a mapping of scalars"
        )));
    };
    for (key, value) in attrs {
        let name = checked_name(key)?;
        let text = reserved_text(key, value)?.unwrap_or_default();
        element.attributes.insert(name, text);
    }
    Ok(())
}

/// Text for a reserved key or an attribute: scalars only
fn reserved_text(key: &str, value: &Value) -> Result<Option<String>> {
    if !value.is_scalar() {
        return Err(unspecified(format!(
            "'{key}' holds a nested structure, which XML text cannot carry"
        )));
    }
    Ok(value.to_text())
}

fn checked_name(name: &str) -> Result<String> {
    if !is_valid_tag_name(name) {
        trace!(name, "rejected tag name");
        return Err(Error::new(ErrorKind::InvalidTagName {
            name: name.to_owned(),
        }));
    }
    Ok(name.to_owned())
}

fn unspecified(message: String) -> Error {
    Error::with_message(ErrorKind::UnspecifiedConversion, message)
}

/// Convert an element into a value, without its own tag
pub fn element_to_value(element: &Element) -> Value {
    if element.attributes.is_empty() && element.children.is_empty() {
        return element.text.clone().map_or(Value::Null, Value::String);
    }

    let mut obj = Object::new();
    if !element.attributes.is_empty() {
        let attrs: Object = element
            .attributes
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();
        obj.insert(ATTRIBUTES_KEY, attrs);
    }
    if let Some(text) = &element.text {
        obj.insert(TEXT_KEY, text.as_str());
    }

    for child in &element.children {
        let value = element_to_value(child);
        // element_to_value never yields an array, so an array here means a repeated tag
        match obj.get_mut(&child.name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = std::mem::take(existing);
                *existing = Value::Array(Array::from(vec![first, value]));
            }
            None => {
                obj.insert(child.name.as_str(), value);
            }
        }
    }
    Value::Object(obj)
}

/// Convert a whole document: `{ root.name: element_to_value(root) }`
pub fn xml_to_value(root: &Element) -> Value {
    let mut obj = Object::with_capacity(1);
    obj.insert(root.name.as_str(), element_to_value(root));
    Value::Object(obj)
}
